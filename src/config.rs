//! Protocol run configuration
//!
//! A [`ProtocolConfig`] describes one demo or benchmark run: the shape of
//! the random dataset, the column aggregated and protected by the MIN key,
//! the aggregate requested and how many rows the query returns.
//!
//! # Example
//!
//! ```rust
//! use attested_query::config::ProtocolConfig;
//! use attested_query::types::AggregationKind;
//!
//! let config = ProtocolConfig {
//!     n_row: 100,
//!     answer_size: 10,
//!     aggregation: AggregationKind::Sum,
//!     ..ProtocolConfig::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{ProtocolError, Result};
use crate::types::{AggregationKind, QueryRequest};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Largest cell value the random dataset draws
pub const DEFAULT_MAX_VALUE: u64 = i64::MAX as u64;

/// Parameters of one protocol run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Number of dataset rows
    pub n_row: usize,

    /// Number of dataset columns
    pub n_col: usize,

    /// Column the aggregate runs over
    pub selected_column: usize,

    /// Aggregate to prove, if any
    pub aggregation: AggregationKind,

    /// Number of rows the query returns
    pub answer_size: usize,

    /// Cells are drawn from `[1, max_value]`
    pub max_value: u64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            n_row: 1_000,
            n_col: 10,
            selected_column: 0,
            aggregation: AggregationKind::None,
            answer_size: 1_000,
            max_value: DEFAULT_MAX_VALUE,
        }
    }
}

impl ProtocolConfig {
    /// Check the configuration describes a runnable query
    ///
    /// # Returns
    /// `Err(InvalidConfig)` naming the first offending field
    pub fn validate(&self) -> Result<()> {
        if self.n_row == 0 {
            return Err(ProtocolError::InvalidConfig("n_row must be positive".into()));
        }
        if self.n_col == 0 {
            return Err(ProtocolError::InvalidConfig("n_col must be positive".into()));
        }
        if self.selected_column >= self.n_col {
            return Err(ProtocolError::InvalidConfig(format!(
                "selected_column {} is not below n_col {}",
                self.selected_column, self.n_col
            )));
        }
        if self.answer_size > self.n_row {
            return Err(ProtocolError::InvalidConfig(format!(
                "answer_size {} exceeds n_row {}",
                self.answer_size, self.n_row
            )));
        }
        if self.max_value == 0 {
            return Err(ProtocolError::InvalidConfig(
                "max_value must be positive".into(),
            ));
        }
        Ok(())
    }

    /// The request a verifier of this run checks against
    ///
    /// An aggregate over every row needs no correctness proof.
    pub fn request(&self) -> QueryRequest {
        QueryRequest::aggregate(
            self.selected_column,
            self.aggregation,
            self.answer_size == self.n_row,
        )
    }

    /// Load and validate a configuration from a JSON file
    ///
    /// Missing fields take their default values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }
}
