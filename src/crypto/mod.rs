//! Cryptographic primitives module
//!
//! This module provides the boundary to the pairing-friendly curve library:
//! - `pairing`: the explicit [`PairingContext`] handle passed to every component
//! - `hash`: hashing into the scalar field and SHA-256 fingerprints
//! - `random`: sampling scalars, trapdoors and group generators
//! - `encoding`: serde helpers for points and scalars
//!
//! # Example
//!
//! ```rust
//! use attested_query::crypto::PairingContext;
//!
//! let ctx = PairingContext::new();
//! let g1 = ctx.random_g1();
//! let g2 = ctx.random_g2();
//! let gt = ctx.pair(&g1, &g2);
//! assert_eq!(gt, ctx.pair(&g1, &g2));
//! ```

pub mod encoding;
pub mod hash;
pub mod pairing;
pub mod random;

// Re-export main types for convenience
pub use hash::HashUtils;
pub use pairing::PairingContext;
pub use random::RandomUtils;
