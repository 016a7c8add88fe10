//! Vector commitment module
//!
//! This module provides commitments to ordered vectors of scalars using the
//! Pointproofs scheme on BN254.
//!
//! # Overview
//!
//! A commitment is a single G1 element binding a vector of length at most
//! `N`, the capacity fixed at key generation. Every position can be opened
//! with a constant-size proof, and openings of distinct positions of the
//! same commitment aggregate into one G1 element.
//!
//! Commitments serve two roles in the protocol:
//! - one commitment per dataset column, opened at the answer rows
//! - two-element `[value, posting-list hash]` commitments and the top-level
//!   digest of the inverted index
//!
//! # Example
//!
//! ```rust
//! use attested_query::commitment::Pointproofs;
//! use attested_query::crypto::PairingContext;
//! use halo2curves::bn256::Fr;
//!
//! let ctx = PairingContext::new();
//! let (sk, pk) = Pointproofs::generate_keys(&ctx, 4).unwrap();
//!
//! let messages = vec![Fr::from(1u64), Fr::from(2u64), Fr::from(3u64)];
//! let commit = Pointproofs::commit(&pk, &sk, &messages).unwrap();
//!
//! let proof = Pointproofs::generate_proof(&pk, &sk, &commit, 1, &messages[1]).unwrap();
//! assert!(Pointproofs::verify_proof(&ctx, &pk, &commit, &messages[1], 1, &proof));
//! ```

pub mod pointproofs;

// Re-export main types for convenience
pub use pointproofs::Pointproofs;
