//! Trusted setup
//!
//! Setup runs once on the data owner's side. It samples every trapdoor,
//! commits each column of the dataset, builds the aggregation accumulator of
//! each column and commits the inverted index. The result splits into the
//! prover's [`SetupRecord`] and the verifier's [`PublicSetup`].
//!
//! # Example
//!
//! ```rust
//! use attested_query::crypto::PairingContext;
//! use attested_query::proof::Setup;
//! use attested_query::types::Dataset;
//!
//! let ctx = PairingContext::new();
//! let dataset = Dataset::from_u64_rows(&[vec![1, 2], vec![3, 1], vec![1, 4]]).unwrap();
//! let record = Setup::run(&ctx, &dataset, 0).unwrap();
//!
//! assert_eq!(record.column_commitments.len(), 2);
//! assert_eq!(record.committed_index.len(), 4);
//! ```

use crate::accumulator::aggregation::{self, AggregationAccumulator};
use crate::accumulator::set::{self, SetAccumulator};
use crate::commitment::pointproofs::{self, Pointproofs};
use crate::crypto::encoding::{point_vec_serde, scalar_vec_serde};
use crate::crypto::{HashUtils, PairingContext};
use crate::error::Result;
use crate::index::{CommittedIndex, InvertedIndex};
use crate::types::Dataset;
use group::GroupEncoding;
use halo2curves::bn256::{Fr as Field, G1Affine};
use serde::{Deserialize, Serialize};

/// Trapdoors of every scheme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretKeys {
    pub vc: pointproofs::SecretKey,
    pub set: set::SecretKey,
    pub aggregation: aggregation::SecretKey,
}

/// Public parameters of every scheme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicKeys {
    pub vc: pointproofs::PublicKey,
    pub set: set::PublicKey,
    pub aggregation: aggregation::PublicKey,
}

/// Secret and public keys sampled together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyMaterial {
    pub secret: SecretKeys,
    pub public: PublicKeys,
}

impl KeyMaterial {
    /// Sample keys for vectors of length at most `capacity`, with MIN elements
    /// bound to `min_value`
    ///
    /// # Returns
    /// `Err(InvalidCapacity)` or `Err(DegenerateTrapdoor)` from key generation
    pub fn generate(ctx: &PairingContext, capacity: usize, min_value: Field) -> Result<Self> {
        let (vc_sk, vc_pk) = Pointproofs::generate_keys(ctx, capacity)?;
        let (set_sk, set_pk) = SetAccumulator::generate_keys(ctx)?;
        let (agg_sk, agg_pk) = AggregationAccumulator::generate_keys(ctx, min_value)?;

        Ok(Self {
            secret: SecretKeys {
                vc: vc_sk,
                set: set_sk,
                aggregation: agg_sk,
            },
            public: PublicKeys {
                vc: vc_pk,
                set: set_pk,
                aggregation: agg_pk,
            },
        })
    }
}

/// Everything the prover keeps after setup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupRecord {
    pub keys: KeyMaterial,

    /// Commitment to each column
    #[serde(with = "point_vec_serde")]
    pub column_commitments: Vec<G1Affine>,

    /// Secret-side aggregation accumulator `A(s)` of each column
    #[serde(with = "scalar_vec_serde")]
    pub column_accumulators: Vec<Field>,

    /// `g1^A(s)` of each column
    #[serde(with = "point_vec_serde")]
    pub published_accumulators: Vec<G1Affine>,

    pub committed_index: CommittedIndex,
}

impl SetupRecord {
    /// The part of the record a verifier receives
    pub fn public(&self) -> PublicSetup {
        PublicSetup {
            keys: self.keys.public.clone(),
            column_commitments: self.column_commitments.clone(),
            published_accumulators: self.published_accumulators.clone(),
            committed_index: self.committed_index.clone(),
        }
    }
}

/// Everything a verifier needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicSetup {
    pub keys: PublicKeys,

    #[serde(with = "point_vec_serde")]
    pub column_commitments: Vec<G1Affine>,

    #[serde(with = "point_vec_serde")]
    pub published_accumulators: Vec<G1Affine>,

    pub committed_index: CommittedIndex,
}

impl PublicSetup {
    /// SHA-256 fingerprint of every published commitment
    ///
    /// Lets a verifier compare the values it holds with the data owner's
    /// out of band.
    pub fn fingerprint(&self) -> String {
        let mut parts: Vec<Vec<u8>> = self
            .column_commitments
            .iter()
            .chain(&self.published_accumulators)
            .map(|p| p.to_bytes().as_ref().to_vec())
            .collect();
        parts.push(self.committed_index.digest.to_bytes().as_ref().to_vec());
        HashUtils::hash_commitments(&parts)
    }
}

/// Setup procedures
pub struct Setup;

impl Setup {
    /// Run the full setup over `dataset`
    ///
    /// MIN elements are bound to the minimum of `min_column`. The commitment
    /// capacity is the larger of the row count and the number of distinct
    /// values, and at least 2 for the `[value, acc_hash]` pair commitments.
    ///
    /// # Returns
    /// `Err(ColumnOutOfRange)` for an invalid `min_column`, or any error of
    /// key generation and commitment
    pub fn run(ctx: &PairingContext, dataset: &Dataset, min_column: usize) -> Result<SetupRecord> {
        let index = InvertedIndex::build(dataset)?;
        let capacity = dataset.num_rows().max(index.len()).max(2);
        let min_value = dataset.column_min(min_column)?;

        log::info!(
            "running setup: {} rows, {} columns, {} distinct values",
            dataset.num_rows(),
            dataset.num_columns(),
            index.len()
        );

        let keys = KeyMaterial::generate(ctx, capacity, min_value)?;
        Self::commit(ctx, keys, dataset, &index)
    }

    /// Commit `dataset` and `index` under existing keys
    pub fn commit(
        ctx: &PairingContext,
        keys: KeyMaterial,
        dataset: &Dataset,
        index: &InvertedIndex,
    ) -> Result<SetupRecord> {
        let columns = dataset.columns();
        let commit_column = |column: &Vec<Field>| -> Result<G1Affine> {
            Pointproofs::commit(&keys.public.vc, &keys.secret.vc, column)
        };

        #[cfg(feature = "parallel")]
        let column_commitments: Vec<G1Affine> = {
            use rayon::prelude::*;
            columns
                .par_iter()
                .map(commit_column)
                .collect::<Result<_>>()?
        };
        #[cfg(not(feature = "parallel"))]
        let column_commitments: Vec<G1Affine> = columns
            .iter()
            .map(commit_column)
            .collect::<Result<_>>()?;

        let column_accumulators: Vec<Field> = columns
            .iter()
            .map(|column| AggregationAccumulator::compute_accumulator(&keys.secret.aggregation, column))
            .collect();
        let published_accumulators = column_accumulators
            .iter()
            .map(|acc| AggregationAccumulator::publish_accumulator(&keys.public.aggregation, acc))
            .collect();

        let committed_index = CommittedIndex::build(
            ctx,
            &keys.public.vc,
            &keys.secret.vc,
            &keys.public.set,
            &keys.secret.set,
            index,
        )?;

        log::info!(
            "setup complete: {} column commitments, index digest over {} values",
            column_commitments.len(),
            committed_index.len()
        );

        Ok(SetupRecord {
            keys,
            column_commitments,
            column_accumulators,
            published_accumulators,
            committed_index,
        })
    }
}
