//! Pairing context
//!
//! A [`PairingContext`] is the explicit handle through which every component
//! reaches the BN254 pairing primitive: sampling, the bilinear map, hashing
//! into the scalar field and point serialization. Components receive it by
//! reference instead of touching a process-wide group object.

use crate::crypto::hash::HashUtils;
use crate::crypto::random::RandomUtils;
use crate::error::Result;
use group::GroupEncoding;
use halo2curves::bn256::{Bn256, Fr as Field, G1Affine, G2Affine, Gt};
use halo2curves::pairing::Engine;
use serde::{Deserialize, Serialize};

/// Domain tag used when no other is configured
pub const DEFAULT_DOMAIN: &[u8] = b"attested-query/v1";

/// Handle to the pairing-friendly curve library
///
/// The domain tag separates the hash-to-scalar outputs of independent
/// deployments; prover and verifier must share it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingContext {
    domain: Vec<u8>,
}

impl PairingContext {
    /// Create a context with the default domain tag
    pub fn new() -> Self {
        Self::with_domain(DEFAULT_DOMAIN)
    }

    /// Create a context with a custom domain tag
    pub fn with_domain(domain: &[u8]) -> Self {
        Self {
            domain: domain.to_vec(),
        }
    }

    /// Uniform random scalar
    pub fn random_scalar(&self) -> Field {
        RandomUtils::generate_field()
    }

    /// Random scalar outside `{0, 1}`, for trapdoors
    pub fn random_trapdoor(&self) -> Result<Field> {
        RandomUtils::generate_trapdoor()
    }

    /// Random non-identity element of G1
    pub fn random_g1(&self) -> G1Affine {
        RandomUtils::generate_g1()
    }

    /// Random non-identity element of G2
    pub fn random_g2(&self) -> G2Affine {
        RandomUtils::generate_g2()
    }

    /// The bilinear map `e: G1 × G2 → Gt`
    pub fn pair(&self, p: &G1Affine, q: &G2Affine) -> Gt {
        Bn256::pairing(p, q)
    }

    /// Hash arbitrary bytes into the scalar field
    pub fn hash_to_scalar(&self, data: &[u8]) -> Field {
        HashUtils::hash_to_scalar(&self.domain, data)
    }

    /// Hash several byte strings into the scalar field
    pub fn hash_parts(&self, parts: &[&[u8]]) -> Field {
        HashUtils::hash_parts_to_scalar(&self.domain, parts)
    }

    /// Hash a G1 element into the scalar field
    pub fn hash_g1(&self, point: &G1Affine) -> Field {
        self.hash_to_scalar(&self.serialize_g1(point))
    }

    /// Compressed encoding of a G1 element
    pub fn serialize_g1(&self, point: &G1Affine) -> Vec<u8> {
        point.to_bytes().as_ref().to_vec()
    }
}

impl Default for PairingContext {
    fn default() -> Self {
        Self::new()
    }
}
