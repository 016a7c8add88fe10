//! AttestedQuery: verifiable selection and aggregation queries over committed tables
//!
//! A data owner commits an integer table once. An untrusted prover then
//! answers queries over it, and a verifier holding only public values checks
//! that:
//! - every returned row is in the committed table (correctness)
//! - every returned value is bound to the committed inverted index
//!   (completeness)
//! - COUNT, SUM or MIN over a full column is what the prover claims
//!   (aggregation)
//!
//! # Building blocks
//!
//! - Pointproofs vector commitments with aggregatable openings
//! - A set accumulator compressing posting lists of the inverted index
//! - A value-as-exponent accumulator for aggregates
//!
//! All of them run on BN254 through an explicit [`PairingContext`].
//!
//! # Example
//!
//! ```rust
//! use attested_query::*;
//!
//! let ctx = PairingContext::new();
//! let dataset = Dataset::from_u64_rows(&[vec![1, 2], vec![3, 1], vec![1, 4]])?;
//!
//! // Setup: commit columns, accumulators and the inverted index
//! let record = Setup::run(&ctx, &dataset, 0)?;
//! let public = record.public();
//!
//! // Prover answers rows 0 and 2
//! let answer = Answer::select(&dataset, &[0, 2])?;
//! let proof = Prover::new(&ctx, &record.keys).prove_query(&record, &dataset, &answer, None)?;
//!
//! // Verifier checks against the published setup and its own request
//! let verifier = Verifier::new(&ctx, &public.keys);
//! let request = QueryRequest::selection();
//! assert!(verifier.verify_all(&public, &request, &answer, &proof).is_accepted());
//! # Ok::<(), attested_query::ProtocolError>(())
//! ```

/// AttestedQuery version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Main modules
pub mod accumulator;
pub mod commitment;
pub mod config;
pub mod crypto;
pub mod database;
pub mod error;
pub mod field;
pub mod index;
pub mod proof;
pub mod types;
pub mod utils;

// Re-export main types
pub use config::ProtocolConfig;
pub use crypto::PairingContext;
pub use error::{ProtocolError, Result};
pub use proof::{Prover, PublicSetup, QueryProof, Setup, SetupRecord, VerificationReport, Verifier};
pub use types::{AggregateQuery, AggregationKind, Answer, Dataset, QueryRequest};
