//! Pointproofs vector commitment
//!
//! This module implements the Pointproofs scheme (Lai, Malavolta, Schröder,
//! Thyagarajan, CCS 2020) over BN254 for committing ordered vectors of
//! scalars and opening individual positions.
//!
//! The scheme provides:
//! - Constant-size commitments and opening proofs (one G1 element each)
//! - Incremental updates of a commitment without recommitting
//! - Aggregation of many openings of one commitment into one G1 element,
//!   bound to the batch by Fiat–Shamir challenges
//!
//! # Parameters
//!
//! For capacity `N` the trapdoor `α` yields secret powers `α¹ … α^(2N)`.
//! Position `i` (0-based) is encoded by `α^(i+1)`. The public key publishes
//! `g1^(α^k)` for every `k ∈ [1, 2N]` except `k = N + 1`, the `g2^(α^k)` for
//! `k ∈ [1, N]` and `gt = e(g1, g2)^(α^(N+1))`. The missing G1 power is what
//! binds a commitment to its vector.

use crate::crypto::encoding::{point_serde, point_vec_serde, scalar_vec_serde};
use crate::crypto::PairingContext;
use crate::error::{ProtocolError, Result};
use crate::field::FieldUtils;
use ff::Field as _;
use group::{Curve, Group};
use halo2curves::bn256::{Fr as Field, G1Affine, G2Affine, Gt, G1, G2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Secret trapdoor powers `α¹ … α^(2N)`
#[derive(Clone, Serialize, Deserialize)]
pub struct SecretKey {
    #[serde(with = "scalar_vec_serde")]
    powers: Vec<Field>,
}

impl SecretKey {
    /// `α^exponent` for `exponent ∈ [1, 2N]`
    fn power(&self, exponent: usize) -> Field {
        self.powers[exponent - 1]
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("powers", &format_args!("<{} redacted>", self.powers.len()))
            .finish()
    }
}

/// Public parameters for capacity `N`
///
/// Note: `gt` is not serialized; it is recomputed from the published powers
/// on deserialization as `e(g1^α, g2^(α^N))`.
#[derive(Debug, Clone, Serialize)]
pub struct PublicKey {
    /// Maximum committable vector length `N`
    pub capacity: usize,

    #[serde(with = "point_serde")]
    pub g1: G1Affine,

    #[serde(with = "point_serde")]
    pub g2: G2Affine,

    /// `g1^(α^k)` for `k ∈ [1, 2N] \ {N + 1}`, in increasing `k`
    #[serde(with = "point_vec_serde")]
    pub g1_powers: Vec<G1Affine>,

    /// `g2^(α^k)` for `k ∈ [1, N]`
    #[serde(with = "point_vec_serde")]
    pub g2_powers: Vec<G2Affine>,

    /// `e(g1, g2)^(α^(N+1))`
    #[serde(skip)]
    pub gt: Gt,
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct PublicKeyHelper {
            capacity: usize,
            #[serde(with = "point_serde")]
            g1: G1Affine,
            #[serde(with = "point_serde")]
            g2: G2Affine,
            #[serde(with = "point_vec_serde")]
            g1_powers: Vec<G1Affine>,
            #[serde(with = "point_vec_serde")]
            g2_powers: Vec<G2Affine>,
        }

        let helper = PublicKeyHelper::deserialize(deserializer)?;
        let n = helper.capacity;
        if n == 0 || helper.g1_powers.len() != 2 * n - 1 || helper.g2_powers.len() != n {
            return Err(serde::de::Error::custom(
                "public key power tables do not match its capacity",
            ));
        }

        // Reconstruct gt = e(g1^α, g2^(α^N))
        let gt = PairingContext::new().pair(&helper.g1_powers[0], &helper.g2_powers[n - 1]);

        Ok(PublicKey {
            capacity: n,
            g1: helper.g1,
            g2: helper.g2,
            g1_powers: helper.g1_powers,
            g2_powers: helper.g2_powers,
            gt,
        })
    }
}

impl PublicKey {
    /// `g1^(α^exponent)`, or `None` for the withheld exponent `N + 1`
    pub fn g1_power(&self, exponent: usize) -> Option<&G1Affine> {
        let n = self.capacity;
        match exponent {
            e if e >= 1 && e <= n => self.g1_powers.get(e - 1),
            e if e > n + 1 && e <= 2 * n => self.g1_powers.get(e - 2),
            _ => None,
        }
    }

    /// `g2^(α^exponent)` for `exponent ∈ [1, N]`
    pub fn g2_power(&self, exponent: usize) -> Option<&G2Affine> {
        if exponent == 0 {
            return None;
        }
        self.g2_powers.get(exponent - 1)
    }

    /// The G2 element paired against commitments when checking position `index`
    fn verification_base(&self, index: usize) -> Option<&G2Affine> {
        if index >= self.capacity {
            return None;
        }
        self.g2_power(self.capacity - index)
    }
}

/// Pointproofs operations
pub struct Pointproofs;

impl Pointproofs {
    /// Generate keys for vectors of length at most `capacity`
    ///
    /// # Returns
    /// `Err(InvalidCapacity)` for a zero capacity, `Err(DegenerateTrapdoor)`
    /// if the sampled `α` is 0 or 1
    pub fn generate_keys(ctx: &PairingContext, capacity: usize) -> Result<(SecretKey, PublicKey)> {
        if capacity == 0 {
            return Err(ProtocolError::InvalidCapacity);
        }

        let g1 = ctx.random_g1();
        let g2 = ctx.random_g2();
        let alpha = ctx.random_trapdoor()?;

        let mut powers = Vec::with_capacity(2 * capacity);
        let mut current = alpha;
        for _ in 0..2 * capacity {
            powers.push(current);
            current *= alpha;
        }

        let g1_proj = G1::from(g1);
        let g1_powers_proj: Vec<G1> = powers
            .iter()
            .enumerate()
            .filter(|(k, _)| *k != capacity)
            .map(|(_, power)| g1_proj * power)
            .collect();
        let mut g1_powers = vec![G1Affine::default(); g1_powers_proj.len()];
        G1::batch_normalize(&g1_powers_proj, &mut g1_powers);

        let g2_proj = G2::from(g2);
        let g2_powers_proj: Vec<G2> = powers[..capacity].iter().map(|p| g2_proj * p).collect();
        let mut g2_powers = vec![G2Affine::default(); capacity];
        G2::batch_normalize(&g2_powers_proj, &mut g2_powers);

        let gt = ctx.pair(&g1, &g2) * powers[capacity];

        log::debug!("generated Pointproofs keys for capacity {}", capacity);

        Ok((
            SecretKey { powers },
            PublicKey {
                capacity,
                g1,
                g2,
                g1_powers,
                g2_powers,
                gt,
            },
        ))
    }

    /// Commit to `messages`: `g1^(Σ m_i · α^(i+1))`
    ///
    /// # Returns
    /// `Err(VectorTooLong)` if `messages` is longer than the capacity
    pub fn commit(pk: &PublicKey, sk: &SecretKey, messages: &[Field]) -> Result<G1Affine> {
        if messages.len() > pk.capacity {
            return Err(ProtocolError::VectorTooLong {
                len: messages.len(),
                capacity: pk.capacity,
            });
        }

        let exponent = messages
            .iter()
            .zip(&sk.powers)
            .fold(Field::ZERO, |acc, (m, power)| acc + *m * power);

        Ok((pk.g1 * exponent).to_affine())
    }

    /// Update a commitment in place of recommitting
    ///
    /// Computes `commit · g1^(Σ (new_i - old_i) · α^(idx_i + 1))`.
    pub fn update_commit(
        pk: &PublicKey,
        sk: &SecretKey,
        commit: &G1Affine,
        indices: &[usize],
        old_messages: &[Field],
        new_messages: &[Field],
    ) -> Result<G1Affine> {
        check_len("old messages", indices.len(), old_messages.len())?;
        check_len("new messages", indices.len(), new_messages.len())?;

        let mut delta = Field::ZERO;
        for ((&index, old), new) in indices.iter().zip(old_messages).zip(new_messages) {
            check_index(index, pk.capacity)?;
            delta += (*new - old) * sk.power(index + 1);
        }

        Ok((G1::from(*commit) + pk.g1 * delta).to_affine())
    }

    /// Opening proof for position `index` holding `value`
    ///
    /// Computes `(commit / g1^(value · α^(index+1)))^(α^(N - index))` with
    /// the trapdoor, which is cheaper than the public route when the prover
    /// holds the secret key.
    pub fn generate_proof(
        pk: &PublicKey,
        sk: &SecretKey,
        commit: &G1Affine,
        index: usize,
        value: &Field,
    ) -> Result<G1Affine> {
        check_index(index, pk.capacity)?;
        let base = pk
            .g1_power(index + 1)
            .ok_or(ProtocolError::IndexOutOfRange {
                index,
                capacity: pk.capacity,
            })?;

        let stripped = G1::from(*commit) - *base * value;
        Ok((stripped * sk.power(pk.capacity - index)).to_affine())
    }

    /// Opening proof for position `index` computed from public parameters only
    ///
    /// Computes `Π_{j ≠ index} (g1^(α^(N + 1 - index + j)))^(m_j)`.
    pub fn generate_proof_public(
        pk: &PublicKey,
        messages: &[Field],
        index: usize,
    ) -> Result<G1Affine> {
        if messages.len() > pk.capacity {
            return Err(ProtocolError::VectorTooLong {
                len: messages.len(),
                capacity: pk.capacity,
            });
        }
        check_index(index, pk.capacity)?;

        let mut proof = G1::identity();
        for (j, m) in messages.iter().enumerate() {
            if j == index {
                continue;
            }
            let exponent = pk.capacity + 1 + j - index;
            let base = pk
                .g1_power(exponent)
                .ok_or(ProtocolError::IndexOutOfRange {
                    index: j,
                    capacity: pk.capacity,
                })?;
            proof += *base * m;
        }
        Ok(proof.to_affine())
    }

    /// Check `e(commit, g2^(α^(N-index))) == e(proof, g2) · gt^value`
    pub fn verify_proof(
        ctx: &PairingContext,
        pk: &PublicKey,
        commit: &G1Affine,
        value: &Field,
        index: usize,
        proof: &G1Affine,
    ) -> bool {
        let base = match pk.verification_base(index) {
            Some(base) => base,
            None => return false,
        };

        let lhs = ctx.pair(commit, base);
        let rhs = ctx.pair(proof, &pk.g2) + pk.gt * value;
        lhs == rhs
    }

    /// Fiat–Shamir challenges `t_i = H(index_i ‖ commit ‖ message_i)`
    pub fn challenges(
        ctx: &PairingContext,
        commit: &G1Affine,
        messages: &[Field],
        indices: &[usize],
    ) -> Vec<Field> {
        let commit_bytes = ctx.serialize_g1(commit);
        indices
            .iter()
            .zip(messages)
            .map(|(&index, message)| {
                let index_bytes = FieldUtils::to_bytes(&Field::from(index as u64));
                let message_bytes = FieldUtils::to_bytes(message);
                ctx.hash_parts(&[&index_bytes, &commit_bytes, &message_bytes])
            })
            .collect()
    }

    /// Aggregate openings of one commitment into `Π proof_i^(t_i)`
    ///
    /// # Returns
    /// `Err` on mismatched lengths or a repeated index
    pub fn aggregate_proofs(
        ctx: &PairingContext,
        commit: &G1Affine,
        messages: &[Field],
        indices: &[usize],
        proofs: &[G1Affine],
    ) -> Result<G1Affine> {
        check_len("messages", indices.len(), messages.len())?;
        check_len("proofs", indices.len(), proofs.len())?;
        check_distinct(indices)?;

        let t = Self::challenges(ctx, commit, messages, indices);
        let aggregate = proofs
            .iter()
            .zip(&t)
            .fold(G1::identity(), |acc, (proof, t_i)| acc + *proof * t_i);

        Ok(aggregate.to_affine())
    }

    /// Check an aggregated proof
    ///
    /// `e(commit, Π (g2^(α^(N-idx_i)))^(t_i)) == e(aggregate, g2) · gt^(Σ m_i · t_i)`
    pub fn verify_aggregate_proofs(
        ctx: &PairingContext,
        pk: &PublicKey,
        commit: &G1Affine,
        messages: &[Field],
        indices: &[usize],
        aggregate: &G1Affine,
    ) -> bool {
        if messages.len() != indices.len() || check_distinct(indices).is_err() {
            return false;
        }

        let t = Self::challenges(ctx, commit, messages, indices);

        let mut combined = G2::identity();
        let mut exponent = Field::ZERO;
        for ((&index, message), t_i) in indices.iter().zip(messages).zip(&t) {
            let base = match pk.verification_base(index) {
                Some(base) => base,
                None => return false,
            };
            combined += *base * t_i;
            exponent += *message * t_i;
        }

        let lhs = ctx.pair(commit, &combined.to_affine());
        let rhs = ctx.pair(aggregate, &pk.g2) + pk.gt * exponent;
        lhs == rhs
    }
}

fn check_len(what: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(ProtocolError::LengthMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}

fn check_index(index: usize, capacity: usize) -> Result<()> {
    if index >= capacity {
        return Err(ProtocolError::IndexOutOfRange { index, capacity });
    }
    Ok(())
}

fn check_distinct(indices: &[usize]) -> Result<()> {
    let mut seen = HashSet::with_capacity(indices.len());
    for &index in indices {
        if !seen.insert(index) {
            return Err(ProtocolError::DuplicateIndex(index));
        }
    }
    Ok(())
}
