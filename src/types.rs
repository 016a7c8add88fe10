//! Core types for the query protocol
//!
//! This module defines the core data structures used throughout the crate:
//! - The committed dataset and query answers
//! - Aggregation kinds, aggregation queries and the verifier's query request

use crate::error::{ProtocolError, Result};
use crate::field::FieldUtils;
use halo2curves::bn256::Fr as Field;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Immutable `n_row × n_col` matrix of scalars, stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    rows: Vec<Vec<Field>>,
    n_col: usize,
}

impl Dataset {
    /// Create a dataset from rows
    ///
    /// # Returns
    /// `Err(EmptyDataset)` without rows or columns, `Err(RaggedDataset)` if
    /// rows differ in width
    pub fn new(rows: Vec<Vec<Field>>) -> Result<Self> {
        let n_col = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || n_col == 0 {
            return Err(ProtocolError::EmptyDataset);
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_col {
                return Err(ProtocolError::RaggedDataset {
                    row: i,
                    expected: n_col,
                    got: row.len(),
                });
            }
        }
        Ok(Self { rows, n_col })
    }

    /// Create a dataset from integer rows
    pub fn from_u64_rows(rows: &[Vec<u64>]) -> Result<Self> {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|&v| Field::from(v)).collect())
                .collect(),
        )
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.n_col
    }

    /// Row `i`
    pub fn row(&self, i: usize) -> Option<&[Field]> {
        self.rows.get(i).map(Vec::as_slice)
    }

    /// All rows
    pub fn rows(&self) -> &[Vec<Field>] {
        &self.rows
    }

    /// Column `j` as a vector
    pub fn column(&self, j: usize) -> Result<Vec<Field>> {
        if j >= self.n_col {
            return Err(ProtocolError::ColumnOutOfRange {
                column: j,
                columns: self.n_col,
            });
        }
        Ok(self.rows.iter().map(|row| row[j]).collect())
    }

    /// All columns (the transposed dataset)
    pub fn columns(&self) -> Vec<Vec<Field>> {
        (0..self.n_col)
            .map(|j| self.rows.iter().map(|row| row[j]).collect())
            .collect()
    }

    /// Smallest value of column `j`, comparing canonical integer representatives
    pub fn column_min(&self, j: usize) -> Result<Field> {
        let column = self.column(j)?;
        column
            .into_iter()
            .min_by(compare_integers)
            .ok_or(ProtocolError::EmptyDataset)
    }
}

/// Order two scalars by their canonical integer representatives
pub fn compare_integers(a: &Field, b: &Field) -> Ordering {
    let la = FieldUtils::to_limbs(a);
    let lb = FieldUtils::to_limbs(b);
    la.iter().rev().cmp(lb.iter().rev())
}

/// Rows returned by a query, with their original row indices
///
/// Row selection happens outside the protocol; an `Answer` only records
/// which rows were chosen and what they contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    row_indexes: Vec<usize>,
    rows: Vec<Vec<Field>>,
    n_col: usize,
}

impl Answer {
    /// Select `rows` of `dataset`, in the given order
    ///
    /// # Returns
    /// `Err(RowOutOfRange)` or `Err(DuplicateRow)` for invalid selections
    pub fn select(dataset: &Dataset, rows: &[usize]) -> Result<Self> {
        let mut seen = HashSet::with_capacity(rows.len());
        let mut selected = Vec::with_capacity(rows.len());
        for &i in rows {
            if !seen.insert(i) {
                return Err(ProtocolError::DuplicateRow(i));
            }
            let row = dataset.row(i).ok_or(ProtocolError::RowOutOfRange {
                row: i,
                rows: dataset.num_rows(),
            })?;
            selected.push(row.to_vec());
        }
        Ok(Self {
            row_indexes: rows.to_vec(),
            rows: selected,
            n_col: dataset.num_columns(),
        })
    }

    /// Build an answer from raw parts, as received by a verifier
    pub fn from_parts(row_indexes: Vec<usize>, rows: Vec<Vec<Field>>, n_col: usize) -> Result<Self> {
        if row_indexes.len() != rows.len() {
            return Err(ProtocolError::LengthMismatch {
                what: "answer rows",
                expected: row_indexes.len(),
                got: rows.len(),
            });
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_col {
                return Err(ProtocolError::RaggedDataset {
                    row: i,
                    expected: n_col,
                    got: row.len(),
                });
            }
        }
        Ok(Self {
            row_indexes,
            rows,
            n_col,
        })
    }

    /// Original dataset index of every answer row
    pub fn row_indexes(&self) -> &[usize] {
        &self.row_indexes
    }

    /// Answer rows, in answer order
    pub fn rows(&self) -> &[Vec<Field>] {
        &self.rows
    }

    /// Number of answer rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the answer is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.n_col
    }

    /// The transposed answer: one vector per column
    pub fn columns(&self) -> Vec<Vec<Field>> {
        (0..self.n_col)
            .map(|j| self.rows.iter().map(|row| row[j]).collect())
            .collect()
    }
}

/// Which aggregate, if any, a query asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum AggregationKind {
    /// Plain selection
    #[default]
    None,

    /// COUNT(*)
    Count,

    /// SUM(column)
    Sum,

    /// MIN(column)
    Min,
}

/// An aggregate over one full column, carrying what each kind needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateQuery {
    Count,
    Sum,
    Min { value: Field },
}

impl AggregateQuery {
    /// Resolve a kind against the column it aggregates
    ///
    /// Returns `None` for [`AggregationKind::None`].
    pub fn for_column(kind: AggregationKind, dataset: &Dataset, column: usize) -> Result<Option<Self>> {
        Ok(match kind {
            AggregationKind::None => None,
            AggregationKind::Count => Some(AggregateQuery::Count),
            AggregationKind::Sum => Some(AggregateQuery::Sum),
            AggregationKind::Min => Some(AggregateQuery::Min {
                value: dataset.column_min(column)?,
            }),
        })
    }

    /// The kind of this query
    pub fn kind(&self) -> AggregationKind {
        match self {
            AggregateQuery::Count => AggregationKind::Count,
            AggregateQuery::Sum => AggregationKind::Sum,
            AggregateQuery::Min { .. } => AggregationKind::Min,
        }
    }
}

/// The query as the verifier posed it
///
/// The verifier fixes this on its own side, so the prover cannot choose
/// which checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    /// `(column, kind)` of the requested aggregate
    pub aggregate: Option<(usize, AggregationKind)>,

    /// Whether the query ranges over every row of the table
    pub full_table: bool,
}

impl QueryRequest {
    /// A plain selection
    pub fn selection() -> Self {
        Self::default()
    }

    /// An aggregate of `kind` over `column`
    ///
    /// [`AggregationKind::None`] yields a plain selection.
    pub fn aggregate(column: usize, kind: AggregationKind, full_table: bool) -> Self {
        Self {
            aggregate: (kind != AggregationKind::None).then_some((column, kind)),
            full_table,
        }
    }

    /// Whether the answer rows must be opened against the column commitments
    ///
    /// Only an aggregate over the full table stands alone.
    pub fn requires_correctness(&self) -> bool {
        !(self.full_table && self.aggregate.is_some())
    }
}
