//! Aggregation accumulator (COUNT / SUM / MIN)
//!
//! A column `V` is accumulated as `A(s) = Σ_{v ∈ V} s^v`: each value is an
//! *exponent*, so `A` is a sparse polynomial whose monomials are the values
//! themselves. Evaluating at `x = 1` collapses every monomial:
//!
//! - `A(1) = |V|` (COUNT), since `(x - 1) | A(x) - A(1)`
//! - `A'(1) = Σ v` (SUM), since `(x - 1)² | A(x) - A(1) - A'(1)(x - 1)`
//!
//! and the quotients, evaluated at the trapdoor in G2, are constant-size
//! proofs checked with one pairing equation each.
//!
//! The MIN proof only certifies `A(s) = s^min + s^(min+1) · q(s)` for the
//! minimum bound into the keys. It does not by itself rule out smaller
//! values in the column.
//!
//! Proof generation re-evaluates `A(s)` from the column it is handed, never
//! from a caller-supplied accumulator, so a proof over a modified column does
//! not verify against the setup-time accumulator.

use crate::crypto::encoding::{point_serde, scalar_serde};
use crate::crypto::PairingContext;
use crate::error::{ProtocolError, Result};
use crate::field::FieldUtils;
use ff::Field as _;
use group::Curve;
use halo2curves::bn256::{Fr as Field, G1Affine, G2Affine, G1};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Secret trapdoor `s`, never 0 or 1
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

/// Public verification elements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicKey {
    #[serde(with = "point_serde")]
    pub g1: G1Affine,

    #[serde(with = "point_serde")]
    pub g2: G2Affine,

    /// `g1^(s - 1)`
    #[serde(with = "point_serde")]
    pub pk_count: G1Affine,

    /// `g1^((s - 1)²)`
    #[serde(with = "point_serde")]
    pub pk_sum: G1Affine,

    /// `g1^(s^min)`
    #[serde(with = "point_serde")]
    pub pk_min: G1Affine,

    /// `g1^(s^(min+1))`
    #[serde(with = "point_serde")]
    pub pk_min2: G1Affine,

    /// The minimum the MIN elements are bound to
    #[serde(with = "scalar_serde")]
    pub min_value: Field,
}

/// Aggregation accumulator operations
pub struct AggregationAccumulator;

impl AggregationAccumulator {
    /// Generate keys whose MIN elements are bound to `min_value`
    ///
    /// # Returns
    /// `Err(DegenerateTrapdoor)` if the sampled trapdoor is 0 or 1
    pub fn generate_keys(ctx: &PairingContext, min_value: Field) -> Result<(SecretKey, PublicKey)> {
        let g1 = ctx.random_g1();
        let g2 = ctx.random_g2();
        let s = ctx.random_trapdoor()?;

        let s_minus_one = s - Field::ONE;
        let s_min = FieldUtils::pow(&s, &min_value);
        let s_min2 = FieldUtils::pow(&s, &(min_value + Field::ONE));

        let public = PublicKey {
            g1,
            g2,
            pk_count: (g1 * s_minus_one).to_affine(),
            pk_sum: (g1 * s_minus_one.square()).to_affine(),
            pk_min: (g1 * s_min).to_affine(),
            pk_min2: (g1 * s_min2).to_affine(),
            min_value,
        };

        log::debug!("generated aggregation accumulator keys");
        Ok((SecretKey { trapdoor: s }, public))
    }

    /// `A(s) = Σ s^v` over the column
    pub fn compute_accumulator(sk: &SecretKey, column: &[Field]) -> Field {
        column
            .iter()
            .fold(Field::ZERO, |acc, v| acc + FieldUtils::pow(&sk.trapdoor, v))
    }

    /// The public accumulator value `g1^A(s)`
    pub fn publish_accumulator(pk: &PublicKey, acc: &Field) -> G1Affine {
        (pk.g1 * acc).to_affine()
    }

    /// COUNT proof `g2^((A(s) - A(1)) / (s - 1))` and the count `A(1)`
    pub fn generate_count_proof(
        sk: &SecretKey,
        pk: &PublicKey,
        column: &[Field],
    ) -> Result<(G2Affine, Field)> {
        let count = Field::from(column.len() as u64);
        let acc = Self::compute_accumulator(sk, column);
        let quotient = (acc - count) * invert(sk.trapdoor - Field::ONE)?;

        Ok(((pk.g2 * quotient).to_affine(), count))
    }

    /// Check `e(acc / g1^count, g2) == e(pk_count, proof)`
    pub fn verify_count_proof(
        ctx: &PairingContext,
        pk: &PublicKey,
        acc: &G1Affine,
        proof: &G2Affine,
        count: &Field,
    ) -> bool {
        let lhs_point = (G1::from(*acc) - pk.g1 * count).to_affine();
        ctx.pair(&lhs_point, &pk.g2) == ctx.pair(&pk.pk_count, proof)
    }

    /// SUM proof `g2^b(s)` with `b(x) = (A(x) - A(1) - A'(1)(x - 1)) / (x - 1)²`
    ///
    /// # Returns
    /// `(proof, count = A(1), sum = A'(1))`
    pub fn generate_sum_proof(
        sk: &SecretKey,
        pk: &PublicKey,
        column: &[Field],
    ) -> Result<(G2Affine, Field, Field)> {
        let count = Field::from(column.len() as u64);
        let sum = column.iter().fold(Field::ZERO, |acc, v| acc + v);
        let acc = Self::compute_accumulator(sk, column);

        let s_minus_one = sk.trapdoor - Field::ONE;
        let remainder = acc - count - sum * s_minus_one;
        let quotient = remainder * invert(s_minus_one.square())?;

        Ok(((pk.g2 * quotient).to_affine(), count, sum))
    }

    /// Check `e(acc, g2) == e(pk_sum, proof) · e(pk_count^sum · g1^count, g2)`
    pub fn verify_sum_proof(
        ctx: &PairingContext,
        pk: &PublicKey,
        acc: &G1Affine,
        proof: &G2Affine,
        count: &Field,
        sum: &Field,
    ) -> bool {
        let linear = (pk.pk_count * sum + pk.g1 * count).to_affine();
        let lhs = ctx.pair(acc, &pk.g2);
        let rhs = ctx.pair(&pk.pk_sum, proof) + ctx.pair(&linear, &pk.g2);
        lhs == rhs
    }

    /// MIN proof `g2^((A(s) - s^min) / s^(min+1))`
    ///
    /// # Returns
    /// `Err(MinNotBound)` if `min` is not the key's bound minimum
    pub fn generate_min_proof(
        sk: &SecretKey,
        pk: &PublicKey,
        column: &[Field],
        min: &Field,
    ) -> Result<G2Affine> {
        if *min != pk.min_value {
            return Err(ProtocolError::MinNotBound {
                claimed: FieldUtils::to_hex(min),
                bound: FieldUtils::to_hex(&pk.min_value),
            });
        }
        let acc = Self::compute_accumulator(sk, column);
        let s_min = FieldUtils::pow(&sk.trapdoor, min);
        let s_min2 = FieldUtils::pow(&sk.trapdoor, &(*min + Field::ONE));
        let quotient = (acc - s_min) * invert(s_min2)?;

        Ok((pk.g2 * quotient).to_affine())
    }

    /// Check `min` is the key's bound minimum and
    /// `e(acc, g2) == e(pk_min, g2) · e(pk_min2, proof)`
    pub fn verify_min_proof(
        ctx: &PairingContext,
        pk: &PublicKey,
        acc: &G1Affine,
        proof: &G2Affine,
        min: &Field,
    ) -> bool {
        if *min != pk.min_value {
            return false;
        }
        let lhs = ctx.pair(acc, &pk.g2);
        let rhs = ctx.pair(&pk.pk_min, &pk.g2) + ctx.pair(&pk.pk_min2, proof);
        lhs == rhs
    }
}

fn invert(x: Field) -> Result<Field> {
    Option::from(x.invert()).ok_or(ProtocolError::DegenerateTrapdoor)
}
