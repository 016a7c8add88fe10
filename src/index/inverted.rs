//! Inverted index over dataset cells
//!
//! Maps every distinct cell value to the positions holding it. Entries are
//! kept in an explicit order (first appearance in a row-major scan) together
//! with a key → position map built once, so the positional index of a value
//! is reproducible wherever the index is rebuilt.

use crate::error::Result;
use crate::field::{EncodedPosition, FieldUtils};
use crate::types::{Answer, Dataset};
use halo2curves::bn256::Fr as Field;
use std::collections::HashMap;

/// One value and its posting list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub key: Field,
    pub postings: Vec<EncodedPosition>,
}

impl IndexEntry {
    /// The posting list as scalars, for accumulation
    pub fn posting_scalars(&self) -> Vec<Field> {
        self.postings.iter().map(EncodedPosition::to_scalar).collect()
    }
}

/// Ordered value → posting list mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    entries: Vec<IndexEntry>,
    positions: HashMap<[u8; 32], usize>,
}

impl InvertedIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every cell of the dataset under `encode(row, col)`
    pub fn build(dataset: &Dataset) -> Result<Self> {
        let mut index = Self::new();
        for (i, row) in dataset.rows().iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                index.insert(*value, EncodedPosition::encode(i as u64, j as u64)?);
            }
        }
        log::debug!(
            "built inverted index: {} distinct values over {} cells",
            index.len(),
            dataset.num_rows() * dataset.num_columns()
        );
        Ok(index)
    }

    /// Index the answer rows under `encode(answer-local row, col)`
    pub fn build_subset(answer: &Answer) -> Result<Self> {
        let mut index = Self::new();
        for (i, row) in answer.rows().iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                index.insert(*value, EncodedPosition::encode(i as u64, j as u64)?);
            }
        }
        Ok(index)
    }

    /// Append `position` to the posting list of `key`
    pub fn insert(&mut self, key: Field, position: EncodedPosition) {
        let slot = FieldUtils::to_bytes(&key);
        match self.positions.get(&slot) {
            Some(&p) => self.entries[p].postings.push(position),
            None => {
                self.positions.insert(slot, self.entries.len());
                self.entries.push(IndexEntry {
                    key,
                    postings: vec![position],
                });
            }
        }
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Keys in key order
    pub fn keys(&self) -> Vec<Field> {
        self.entries.iter().map(|e| e.key).collect()
    }

    /// Position of `key` in key order
    pub fn position(&self, key: &Field) -> Option<usize> {
        self.positions.get(&FieldUtils::to_bytes(key)).copied()
    }

    /// Posting list of `key`
    pub fn get(&self, key: &Field) -> Option<&[EncodedPosition]> {
        self.position(key)
            .map(|p| self.entries[p].postings.as_slice())
    }

    /// A copy with one posting of `key` removed
    ///
    /// A value left without postings disappears from the index. Models a
    /// prover that hides a cell before committing.
    pub fn without_position(&self, key: &Field, position: EncodedPosition) -> Self {
        let mut index = Self::new();
        for entry in &self.entries {
            for &p in &entry.postings {
                if entry.key == *key && p == position {
                    continue;
                }
                index.insert(entry.key, p);
            }
        }
        index
    }

    /// A copy with `key` and all its postings removed
    pub fn without_key(&self, key: &Field) -> Self {
        let mut index = Self::new();
        for entry in self.entries.iter().filter(|e| e.key != *key) {
            for &p in &entry.postings {
                index.insert(entry.key, p);
            }
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u64, col: u64) -> EncodedPosition {
        EncodedPosition::encode(row, col).unwrap()
    }

    fn sample() -> Dataset {
        Dataset::from_u64_rows(&[vec![1, 2], vec![3, 1], vec![1, 4]]).unwrap()
    }

    #[test]
    fn test_build_full_index() {
        let index = InvertedIndex::build(&sample()).unwrap();
        assert_eq!(index.len(), 4);
        assert_eq!(
            index.get(&Field::from(1u64)).unwrap(),
            &[pos(0, 0), pos(1, 1), pos(2, 0)]
        );
        assert_eq!(index.get(&Field::from(2u64)).unwrap(), &[pos(0, 1)]);
        assert_eq!(index.get(&Field::from(3u64)).unwrap(), &[pos(1, 0)]);
        assert_eq!(index.get(&Field::from(4u64)).unwrap(), &[pos(2, 1)]);
    }

    #[test]
    fn test_key_order_is_first_appearance() {
        let index = InvertedIndex::build(&sample()).unwrap();
        let expected: Vec<Field> = [1u64, 2, 3, 4].iter().map(|&v| Field::from(v)).collect();
        assert_eq!(index.keys(), expected);
        assert_eq!(index.position(&Field::from(3u64)), Some(2));
        assert_eq!(index.position(&Field::from(9u64)), None);
    }

    #[test]
    fn test_build_is_reproducible() {
        let a = InvertedIndex::build(&sample()).unwrap();
        let b = InvertedIndex::build(&sample()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_build_subset_uses_local_rows() {
        let answer = Answer::select(&sample(), &[0, 2]).unwrap();
        let index = InvertedIndex::build_subset(&answer).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(
            index.get(&Field::from(1u64)).unwrap(),
            &[pos(0, 0), pos(1, 0)]
        );
        assert_eq!(index.get(&Field::from(4u64)).unwrap(), &[pos(1, 1)]);
        assert!(index.get(&Field::from(3u64)).is_none());
    }

    #[test]
    fn test_without_position() {
        let index = InvertedIndex::build(&sample()).unwrap();
        let tampered = index.without_position(&Field::from(1u64), pos(1, 1));
        assert_eq!(
            tampered.get(&Field::from(1u64)).unwrap(),
            &[pos(0, 0), pos(2, 0)]
        );
        assert_eq!(tampered.keys(), index.keys());

        let gone = index.without_position(&Field::from(3u64), pos(1, 0));
        assert!(gone.get(&Field::from(3u64)).is_none());
        assert_eq!(gone.len(), 3);
    }

    #[test]
    fn test_without_key() {
        let index = InvertedIndex::build(&sample()).unwrap();
        let tampered = index.without_key(&Field::from(2u64));
        assert_eq!(tampered.len(), 3);
        assert_eq!(tampered.position(&Field::from(3u64)), Some(1));
    }
}
