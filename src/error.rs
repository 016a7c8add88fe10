//! Error types
//!
//! Every fallible operation in the crate returns [`ProtocolError`]. Contract
//! violations (vectors longer than the key capacity, out-of-range indices,
//! mismatched argument lists) are reported here and are never retried.
//!
//! Verification is deliberately *not* fallible: a proof that does not check
//! out is a normal `false` outcome, never an error.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors raised at protocol call boundaries
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A vector longer than the commitment capacity `N`
    #[error("vector of length {len} exceeds commitment capacity {capacity}")]
    VectorTooLong { len: usize, capacity: usize },

    /// A position outside `[0, N)`
    #[error("index {index} is out of range for capacity {capacity}")]
    IndexOutOfRange { index: usize, capacity: usize },

    /// Parallel argument lists of different lengths
    #[error("length mismatch for {what}: expected {expected}, got {got}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// The same position listed twice in one batch
    #[error("index {0} appears more than once in the batch")]
    DuplicateIndex(usize),

    /// Key generation was asked for a zero-sized vector space
    #[error("commitment capacity must be at least 1")]
    InvalidCapacity,

    /// A sampled trapdoor makes a division identity undefined; keys must be resampled
    #[error("sampled trapdoor is degenerate (0 or 1); key generation must be resampled")]
    DegenerateTrapdoor,

    /// Subset proof requested for elements that are not in the dataset
    #[error("subset is not contained in the accumulated dataset")]
    NotASubset,

    /// Completeness proof requested for a value the committed index never saw
    #[error("value {0} is not registered in the committed inverted index")]
    KeyNotIndexed(String),

    /// MIN proof requested for a value other than the minimum the keys are bound to
    #[error("claimed minimum {claimed} differs from the bound minimum {bound}")]
    MinNotBound { claimed: String, bound: String },

    /// Column handed to the prover differs from the one committed at setup
    #[error("column {0} does not match its setup-time accumulator")]
    ColumnMismatch(usize),

    /// Answer refers to a row outside the dataset
    #[error("row {row} is out of range for a dataset of {rows} rows")]
    RowOutOfRange { row: usize, rows: usize },

    /// Answer lists a row twice
    #[error("row {0} is selected more than once")]
    DuplicateRow(usize),

    /// Column index outside the dataset
    #[error("column {column} is out of range for a dataset of {columns} columns")]
    ColumnOutOfRange { column: usize, columns: usize },

    /// Rows of differing width
    #[error("dataset rows must all have {expected} columns, row {row} has {got}")]
    RaggedDataset {
        row: usize,
        expected: usize,
        got: usize,
    },

    /// Dataset without rows or columns
    #[error("dataset must have at least one row and one column")]
    EmptyDataset,

    /// `(row, col)` pair too large for the positional encoding
    #[error("position ({row}, {col}) overflows the positional encoding")]
    PositionOverflow { row: u64, col: u64 },

    /// Configuration rejected by validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed hex or point/scalar bytes
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Filesystem failure
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Binary encoding failure
    #[error(transparent)]
    BincodeEncode(#[from] bincode::error::EncodeError),

    /// Binary decoding failure
    #[error(transparent)]
    BincodeDecode(#[from] bincode::error::DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ProtocolError::VectorTooLong {
            len: 5,
            capacity: 4,
        };
        assert_eq!(
            err.to_string(),
            "vector of length 5 exceeds commitment capacity 4"
        );

        let err = ProtocolError::LengthMismatch {
            what: "proofs",
            expected: 2,
            got: 3,
        };
        assert!(err.to_string().contains("proofs"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ProtocolError = io.into();
        assert!(matches!(err, ProtocolError::Io(_)));
    }
}
