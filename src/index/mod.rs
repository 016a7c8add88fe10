//! Inverted index module
//!
//! - `inverted`: the ordered value → posting list index, built over the
//!   full dataset at setup and over the answer rows per query
//! - `committed`: the two-level commitment linking every posting list to one
//!   top-level digest
//!
//! # Example
//!
//! ```rust
//! use attested_query::index::InvertedIndex;
//! use attested_query::types::Dataset;
//! use halo2curves::bn256::Fr;
//!
//! let dataset = Dataset::from_u64_rows(&[vec![1, 2], vec![3, 1], vec![1, 4]]).unwrap();
//! let index = InvertedIndex::build(&dataset).unwrap();
//!
//! assert_eq!(index.len(), 4);
//! assert_eq!(index.get(&Fr::from(1u64)).unwrap().len(), 3);
//! ```

pub mod committed;
pub mod inverted;

// Re-export main types for convenience
pub use committed::{CommittedIndex, PairCommitment};
pub use inverted::{IndexEntry, InvertedIndex};
