//! Hash functions
//!
//! This module provides the hash functions used by the protocol:
//! hashing bytes and group elements into the scalar field (Blake2b-512 with
//! wide reduction) and SHA-256 digests for human-readable fingerprints.
//!
//! # Example
//!
//! ```rust
//! use attested_query::crypto::HashUtils;
//!
//! let a = HashUtils::hash_to_scalar(b"domain", b"Hello, World!");
//! let b = HashUtils::hash_to_scalar(b"domain", b"Hello, World!");
//! assert_eq!(a, b);
//! ```

use blake2::{Blake2b512, Digest as Blake2Digest};
use ff::FromUniformBytes;
use halo2curves::bn256::Fr as Field;
use sha2::{Digest, Sha256};

/// Hash utilities
///
/// Provides methods for computing cryptographic hashes.
pub struct HashUtils;

impl HashUtils {
    /// Hash bytes to a field element under a domain-separation tag
    ///
    /// The 64-byte Blake2b output is reduced modulo the field order, so the
    /// result is statistically close to uniform.
    pub fn hash_to_scalar(domain: &[u8], data: &[u8]) -> Field {
        Self::hash_parts_to_scalar(domain, &[data])
    }

    /// Hash a sequence of byte strings to a field element
    ///
    /// Each part is length-prefixed so that `("ab", "c")` and `("a", "bc")`
    /// hash differently.
    pub fn hash_parts_to_scalar(domain: &[u8], parts: &[&[u8]]) -> Field {
        let mut hasher = Blake2b512::new();
        Blake2Digest::update(&mut hasher, (domain.len() as u64).to_le_bytes());
        Blake2Digest::update(&mut hasher, domain);
        for part in parts {
            Blake2Digest::update(&mut hasher, (part.len() as u64).to_le_bytes());
            Blake2Digest::update(&mut hasher, part);
        }
        let digest = Blake2Digest::finalize(hasher);

        let mut wide = [0u8; 64];
        wide.copy_from_slice(&digest);
        Field::from_uniform_bytes(&wide)
    }

    /// Compute a fingerprint of several serialized commitments
    ///
    /// # Returns
    /// Hex-encoded SHA-256 hash string
    pub fn hash_commitments(commitments: &[Vec<u8>]) -> String {
        let mut hasher = Sha256::new();
        for commitment in commitments {
            Digest::update(&mut hasher, commitment);
        }
        hex::encode(Digest::finalize(hasher))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_to_scalar_deterministic() {
        let a = HashUtils::hash_to_scalar(b"test", b"payload");
        let b = HashUtils::hash_to_scalar(b"test", b"payload");
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_to_scalar_domain_separation() {
        let a = HashUtils::hash_to_scalar(b"one", b"payload");
        let b = HashUtils::hash_to_scalar(b"two", b"payload");
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_parts_are_length_prefixed() {
        let a = HashUtils::hash_parts_to_scalar(b"d", &[b"ab", b"c"]);
        let b = HashUtils::hash_parts_to_scalar(b"d", &[b"a", b"bc"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_commitments() {
        let commitments = vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8]];
        let hash = HashUtils::hash_commitments(&commitments);
        assert_eq!(hash.len(), 64);
        assert_ne!(hash, HashUtils::hash_commitments(&commitments[..1]));
    }
}
