//! Setup, proof generation and verification module
//!
//! The protocol runs in three phases:
//! - `setup`: sample keys, commit the columns, accumulate each column and
//!   commit the inverted index
//! - `prover`: answer a query with correctness, completeness and aggregation
//!   proofs
//! - `verifier`: check those proofs against the published setup values
//!
//! `artifacts` holds the proof objects passed between the two sides.
//!
//! # Workflow
//!
//! 1. **Setup**: the data owner runs [`Setup::run`] and publishes
//!    [`PublicSetup`]
//! 2. **Proof Generation**: the prover answers with a [`QueryProof`]
//! 3. **Proof Verification**: the verifier checks it against its own
//!    [`QueryRequest`](crate::types::QueryRequest) and gets a
//!    [`VerificationReport`]

pub mod artifacts;
pub mod prover;
pub mod setup;
pub mod verifier;

// Re-export main types for convenience
pub use artifacts::{
    AggregationProof, ColumnAggregation, CompletenessEntry, CompletenessProof, CorrectnessProof,
    QueryProof, VerificationReport,
};
pub use prover::Prover;
pub use setup::{KeyMaterial, PublicKeys, PublicSetup, SecretKeys, Setup, SetupRecord};
pub use verifier::Verifier;
