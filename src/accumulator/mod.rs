//! Accumulator module
//!
//! Two accumulator constructions over BN254:
//! - `set`: polynomial set accumulator `g1^(Π (s + x))` with subset proofs,
//!   used to compress posting lists of the inverted index
//! - `aggregation`: value-as-exponent accumulator `Σ s^v` with COUNT, SUM and
//!   MIN proofs over a full column
//!
//! # Example
//!
//! ```rust
//! use attested_query::accumulator::AggregationAccumulator;
//! use attested_query::crypto::PairingContext;
//! use halo2curves::bn256::Fr;
//!
//! let ctx = PairingContext::new();
//! let column = vec![Fr::from(5u64), Fr::from(5u64), Fr::from(7u64)];
//! let (sk, pk) = AggregationAccumulator::generate_keys(&ctx, Fr::from(5u64)).unwrap();
//!
//! let acc = AggregationAccumulator::compute_accumulator(&sk, &column);
//! let published = AggregationAccumulator::publish_accumulator(&pk, &acc);
//!
//! let (proof, count) = AggregationAccumulator::generate_count_proof(&sk, &pk, &column).unwrap();
//! assert!(AggregationAccumulator::verify_count_proof(&ctx, &pk, &published, &proof, &count));
//! ```

pub mod aggregation;
pub mod set;

// Re-export main types for convenience
pub use aggregation::AggregationAccumulator;
pub use set::SetAccumulator;
