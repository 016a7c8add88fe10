//! Proof objects exchanged between prover and verifier

use crate::crypto::encoding::{point_serde, point_vec_serde, scalar_serde};
use crate::field::FieldUtils;
use crate::types::AggregationKind;
use halo2curves::bn256::{Fr as Field, G1Affine, G2Affine};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One aggregated opening per column, covering every answer row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectnessProof {
    #[serde(with = "point_vec_serde")]
    pub column_proofs: Vec<G1Affine>,
}

/// Aggregate proof with its claimed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AggregationProof {
    Count {
        #[serde(with = "point_serde")]
        proof: G2Affine,
        #[serde(with = "scalar_serde")]
        count: Field,
    },
    Sum {
        #[serde(with = "point_serde")]
        proof: G2Affine,
        #[serde(with = "scalar_serde")]
        count: Field,
        #[serde(with = "scalar_serde")]
        sum: Field,
    },
    Min {
        #[serde(with = "point_serde")]
        proof: G2Affine,
        #[serde(with = "scalar_serde")]
        min: Field,
    },
}

impl AggregationProof {
    /// The aggregate value the proof claims
    pub fn value(&self) -> Field {
        match self {
            AggregationProof::Count { count, .. } => *count,
            AggregationProof::Sum { sum, .. } => *sum,
            AggregationProof::Min { min, .. } => *min,
        }
    }

    /// The aggregation kind
    pub fn kind(&self) -> AggregationKind {
        match self {
            AggregationProof::Count { .. } => AggregationKind::Count,
            AggregationProof::Sum { .. } => AggregationKind::Sum,
            AggregationProof::Min { .. } => AggregationKind::Min,
        }
    }
}

/// Completeness evidence for one value of the answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessEntry {
    /// The value
    #[serde(with = "scalar_serde")]
    pub key: Field,

    /// Hash of the accumulator over the value's answer postings
    #[serde(with = "scalar_serde")]
    pub acc_hash: Field,

    /// Commitment to `[key, acc_hash]`
    #[serde(with = "point_serde")]
    pub pair_commitment: G1Affine,

    /// Aggregated opening of both positions of `pair_commitment`
    #[serde(with = "point_serde")]
    pub pair_proof: G1Affine,

    /// Opening of `key` at its slot in the top-level digest
    #[serde(with = "point_serde")]
    pub position_proof: G1Affine,
}

/// Completeness evidence for every value of the answer, in answer-index order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessProof {
    pub entries: Vec<CompletenessEntry>,
}

impl CompletenessProof {
    /// Entries keyed by value bytes
    ///
    /// Returns `None` if a value has more than one entry.
    pub fn by_key(&self) -> Option<HashMap<[u8; 32], &CompletenessEntry>> {
        let mut map = HashMap::with_capacity(self.entries.len());
        for entry in &self.entries {
            if map.insert(FieldUtils::to_bytes(&entry.key), entry).is_some() {
                return None;
            }
        }
        Some(map)
    }

    /// Number of values covered
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no value is covered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Aggregate proof bound to the column it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnAggregation {
    pub column: usize,
    pub proof: AggregationProof,
}

/// Everything the prover returns for one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryProof {
    /// Absent for a full-table aggregation, where the aggregate stands alone
    pub correctness: Option<CorrectnessProof>,

    pub completeness: CompletenessProof,

    pub aggregation: Option<ColumnAggregation>,
}

/// Outcome of checking a [`QueryProof`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// `None` when the request needs no correctness proof
    pub correctness: Option<bool>,

    pub completeness: bool,

    /// `None` when no aggregate was requested
    pub aggregation: Option<bool>,
}

impl VerificationReport {
    /// Conjunction of every check the request called for
    pub fn is_accepted(&self) -> bool {
        self.correctness.unwrap_or(true) && self.completeness && self.aggregation.unwrap_or(true)
    }
}
