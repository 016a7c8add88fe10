//! Setup persistence module
//!
//! - `storage`: saving and loading setup records in JSON or bincode
//!
//! The prover keeps the full [`SetupRecord`](crate::proof::SetupRecord),
//! trapdoors included. Only the [`PublicSetup`](crate::proof::PublicSetup)
//! is handed to verifiers.

pub mod storage;

// Re-export main types for convenience
pub use storage::{SetupStorage, StorageFormat};
