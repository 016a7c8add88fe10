//! Polynomial set accumulator
//!
//! The accumulator of Papamanthou, Shi and Tamassia (CRYPTO 2011): a multiset
//! `X` is folded into `g1^(Π_{x ∈ X} (s + x))` for a secret trapdoor `s`.
//! Subset membership is proven by the quotient `g2^(Π_{x ∈ X ⊖ Y} (s + x))`.
//!
//! The inverted index uses the accumulator to compress a posting list of
//! arbitrary length into one G1 element, which is then hashed to a scalar.
//! Repeated elements multiply their factor in, so the semantics are those of
//! a multiset; posting lists never contain repeats, which makes the
//! distinction moot there.

use crate::crypto::encoding::{point_serde, scalar_serde};
use crate::crypto::PairingContext;
use crate::error::{ProtocolError, Result};
use crate::field::FieldUtils;
use ff::Field as _;
use group::Curve;
use halo2curves::bn256::{Fr as Field, G1Affine, G2Affine};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Secret trapdoor `s`
#[derive(Clone, Serialize, Deserialize)]
pub struct SecretKey {
    #[serde(with = "scalar_serde")]
    trapdoor: Field,
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Public generators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicKey {
    #[serde(with = "point_serde")]
    pub g1: G1Affine,

    #[serde(with = "point_serde")]
    pub g2: G2Affine,
}

/// Set accumulator operations
pub struct SetAccumulator;

impl SetAccumulator {
    /// Sample a trapdoor and two generators
    pub fn generate_keys(ctx: &PairingContext) -> Result<(SecretKey, PublicKey)> {
        let trapdoor = ctx.random_trapdoor()?;
        Ok((
            SecretKey { trapdoor },
            PublicKey {
                g1: ctx.random_g1(),
                g2: ctx.random_g2(),
            },
        ))
    }

    /// `Π (s + x)` over the elements
    fn characteristic(sk: &SecretKey, elements: &[Field]) -> Field {
        elements
            .iter()
            .fold(Field::ONE, |acc, x| acc * (sk.trapdoor + x))
    }

    /// Accumulate a multiset: `g1^(Π (s + x))`
    pub fn compute_accumulator(sk: &SecretKey, pk: &PublicKey, elements: &[Field]) -> G1Affine {
        (pk.g1 * Self::characteristic(sk, elements)).to_affine()
    }

    /// Witness that `subset ⊆ dataset`: `g2^(Π_{x ∈ dataset ⊖ subset} (s + x))`
    ///
    /// `⊖` is multiset difference, one occurrence removed per subset element.
    ///
    /// # Returns
    /// `Err(NotASubset)` if some subset element has no remaining occurrence
    pub fn generate_proof(
        sk: &SecretKey,
        pk: &PublicKey,
        dataset: &[Field],
        subset: &[Field],
    ) -> Result<G2Affine> {
        let mut remaining: HashMap<[u8; 32], usize> = HashMap::new();
        for x in dataset {
            *remaining.entry(FieldUtils::to_bytes(x)).or_insert(0) += 1;
        }
        for y in subset {
            match remaining.get_mut(&FieldUtils::to_bytes(y)) {
                Some(count) if *count > 0 => *count -= 1,
                _ => return Err(ProtocolError::NotASubset),
            }
        }

        let mut difference = Vec::with_capacity(dataset.len() - subset.len());
        for x in dataset {
            if let Some(count) = remaining.get_mut(&FieldUtils::to_bytes(x)) {
                if *count > 0 {
                    *count -= 1;
                    difference.push(*x);
                }
            }
        }

        Ok((pk.g2 * Self::characteristic(sk, &difference)).to_affine())
    }

    /// Check `e(acc_subset, proof) == e(acc_dataset, g2)`
    pub fn verify_proof(
        ctx: &PairingContext,
        pk: &PublicKey,
        proof: &G2Affine,
        acc_subset: &G1Affine,
        acc_dataset: &G1Affine,
    ) -> bool {
        ctx.pair(acc_subset, proof) == ctx.pair(acc_dataset, &pk.g2)
    }

    /// Compress an accumulator value into a scalar
    pub fn accumulator_hash(ctx: &PairingContext, acc: &G1Affine) -> Field {
        ctx.hash_g1(acc)
    }
}
