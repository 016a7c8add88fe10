//! Commitment to the inverted index
//!
//! Each `(value, postings)` entry is reduced to one scalar in two steps:
//! the posting list is compressed by the set accumulator and hashed
//! (`acc_hash`), then the pair `[value, acc_hash]` is committed with
//! Pointproofs and the commitment hashed (`h_value`). The ordered list of
//! per-value scalars is committed once more, giving the top-level digest.
//!
//! The entry order of the index fixes each value's slot in the digest.
//! [`CommittedIndex`] publishes that order alongside the digest so the
//! verifier resolves slots exactly as setup assigned them.

use crate::accumulator::set::{self, SetAccumulator};
use crate::commitment::pointproofs::{self, Pointproofs};
use crate::crypto::encoding::{point_serde, scalar_vec_serde};
use crate::crypto::PairingContext;
use crate::error::Result;
use crate::field::FieldUtils;
use crate::index::inverted::{IndexEntry, InvertedIndex};
use halo2curves::bn256::{Fr as Field, G1Affine};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A committed `[value, acc_hash]` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairCommitment {
    /// Hash of the posting-list accumulator
    pub acc_hash: Field,

    /// Pointproofs commitment to `[value, acc_hash]`
    pub commitment: G1Affine,
}

impl PairCommitment {
    /// Compress and commit one index entry
    pub fn commit(
        ctx: &PairingContext,
        vc_pk: &pointproofs::PublicKey,
        vc_sk: &pointproofs::SecretKey,
        set_pk: &set::PublicKey,
        set_sk: &set::SecretKey,
        entry: &IndexEntry,
    ) -> Result<Self> {
        let acc = SetAccumulator::compute_accumulator(set_sk, set_pk, &entry.posting_scalars());
        let acc_hash = SetAccumulator::accumulator_hash(ctx, &acc);
        let commitment = Pointproofs::commit(vc_pk, vc_sk, &[entry.key, acc_hash])?;
        Ok(Self {
            acc_hash,
            commitment,
        })
    }

    /// The two committed messages
    pub fn messages(&self, key: Field) -> [Field; 2] {
        [key, self.acc_hash]
    }
}

/// Public commitment to a full inverted index
#[derive(Debug, Clone, Serialize)]
pub struct CommittedIndex {
    /// Top-level Pointproofs digest
    #[serde(with = "point_serde")]
    pub digest: G1Affine,

    /// Values in slot order
    #[serde(with = "scalar_vec_serde")]
    keys: Vec<Field>,

    #[serde(skip)]
    positions: HashMap<[u8; 32], usize>,
}

impl<'de> Deserialize<'de> for CommittedIndex {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct CommittedIndexHelper {
            #[serde(with = "point_serde")]
            digest: G1Affine,
            #[serde(with = "scalar_vec_serde")]
            keys: Vec<Field>,
        }

        let helper = CommittedIndexHelper::deserialize(deserializer)?;
        Ok(CommittedIndex::from_parts(helper.digest, helper.keys))
    }
}

impl CommittedIndex {
    /// Commit to `index`
    ///
    /// # Returns
    /// `Err(VectorTooLong)` if the index has more distinct values than the
    /// commitment capacity
    pub fn build(
        ctx: &PairingContext,
        vc_pk: &pointproofs::PublicKey,
        vc_sk: &pointproofs::SecretKey,
        set_pk: &set::PublicKey,
        set_sk: &set::SecretKey,
        index: &InvertedIndex,
    ) -> Result<Self> {
        let commit_entry = |entry: &IndexEntry| -> Result<Field> {
            let pair = PairCommitment::commit(ctx, vc_pk, vc_sk, set_pk, set_sk, entry)?;
            Ok(ctx.hash_g1(&pair.commitment))
        };

        #[cfg(feature = "parallel")]
        let slots: Vec<Field> = {
            use rayon::prelude::*;
            index
                .entries()
                .par_iter()
                .map(commit_entry)
                .collect::<Result<_>>()?
        };
        #[cfg(not(feature = "parallel"))]
        let slots: Vec<Field> = index
            .entries()
            .iter()
            .map(commit_entry)
            .collect::<Result<_>>()?;

        let digest = Pointproofs::commit(vc_pk, vc_sk, &slots)?;
        log::debug!("committed inverted index with {} slots", slots.len());

        Ok(Self::from_parts(digest, index.keys()))
    }

    /// Reassemble a committed index from its digest and slot order
    pub fn from_parts(digest: G1Affine, keys: Vec<Field>) -> Self {
        let positions = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (FieldUtils::to_bytes(k), i))
            .collect();
        Self {
            digest,
            keys,
            positions,
        }
    }

    /// Slot of `key` in the digest
    pub fn position(&self, key: &Field) -> Option<usize> {
        self.positions.get(&FieldUtils::to_bytes(key)).copied()
    }

    /// Values in slot order
    pub fn keys(&self) -> &[Field] {
        &self.keys
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no value was committed
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
