//! Prover for query answers
//!
//! The prover holds every trapdoor and answers three kinds of obligations:
//!
//! 1. Correctness: each answer row sits at its claimed positions of the
//!    committed columns, one aggregated opening per column
//! 2. Completeness: every value of the answer is bound to the top-level
//!    index digest through its `[value, acc_hash]` pair commitment
//! 3. Aggregation: COUNT, SUM or MIN of a full committed column
//!
//! # Example
//!
//! ```rust
//! use attested_query::crypto::PairingContext;
//! use attested_query::proof::{Prover, Setup};
//! use attested_query::types::{Answer, Dataset};
//!
//! let ctx = PairingContext::new();
//! let dataset = Dataset::from_u64_rows(&[vec![1, 2], vec![3, 1], vec![1, 4]]).unwrap();
//! let record = Setup::run(&ctx, &dataset, 0).unwrap();
//!
//! let prover = Prover::new(&ctx, &record.keys);
//! let answer = Answer::select(&dataset, &[0, 2]).unwrap();
//! let proof = prover.prove_query(&record, &dataset, &answer, None).unwrap();
//! assert_eq!(proof.completeness.len(), 3);
//! ```

use crate::accumulator::AggregationAccumulator;
use crate::commitment::Pointproofs;
use crate::crypto::PairingContext;
use crate::error::{ProtocolError, Result};
use crate::field::FieldUtils;
use crate::index::{CommittedIndex, IndexEntry, InvertedIndex, PairCommitment};
use crate::proof::artifacts::{
    AggregationProof, ColumnAggregation, CompletenessEntry, CompletenessProof, CorrectnessProof,
    QueryProof,
};
use crate::proof::setup::{KeyMaterial, SetupRecord};
use crate::types::{AggregateQuery, Answer, Dataset};
use halo2curves::bn256::{Fr as Field, G1Affine};

/// Prover for correctness, completeness and aggregation proofs
#[derive(Debug, Clone)]
pub struct Prover {
    ctx: PairingContext,
    keys: KeyMaterial,
}

impl Prover {
    /// Create a new prover
    ///
    /// # Arguments
    /// * `ctx` - Pairing context shared with the verifier
    /// * `keys` - Key material produced by setup
    pub fn new(ctx: &PairingContext, keys: &KeyMaterial) -> Self {
        Self {
            ctx: ctx.clone(),
            keys: keys.clone(),
        }
    }

    /// Prove that every answer row is in the committed columns
    ///
    /// For column `j`, opens `column_commitments[j]` at every original row
    /// index of the answer and aggregates the openings.
    ///
    /// # Arguments
    /// * `column_commitments` - Commitment of each column, from setup
    /// * `answer` - The answer rows with their original row indices
    ///
    /// # Returns
    /// `Err(LengthMismatch)` if the answer and commitments disagree on the
    /// column count
    pub fn prove_correctness(
        &self,
        column_commitments: &[G1Affine],
        answer: &Answer,
    ) -> Result<CorrectnessProof> {
        if column_commitments.len() != answer.num_columns() {
            return Err(ProtocolError::LengthMismatch {
                what: "column commitments",
                expected: answer.num_columns(),
                got: column_commitments.len(),
            });
        }

        let columns = answer.columns();
        let prove_column = |(commit, values): (&G1Affine, &Vec<Field>)| -> Result<G1Affine> {
            self.prove_column(commit, values, answer.row_indexes())
        };

        #[cfg(feature = "parallel")]
        let column_proofs: Vec<G1Affine> = {
            use rayon::prelude::*;
            column_commitments
                .par_iter()
                .zip(columns.par_iter())
                .map(prove_column)
                .collect::<Result<_>>()?
        };
        #[cfg(not(feature = "parallel"))]
        let column_proofs: Vec<G1Affine> = column_commitments
            .iter()
            .zip(columns.iter())
            .map(prove_column)
            .collect::<Result<_>>()?;

        log::debug!(
            "correctness proof over {} rows and {} columns",
            answer.len(),
            column_proofs.len()
        );
        Ok(CorrectnessProof { column_proofs })
    }

    fn prove_column(
        &self,
        commit: &G1Affine,
        values: &[Field],
        row_indexes: &[usize],
    ) -> Result<G1Affine> {
        let (pk, sk) = (&self.keys.public.vc, &self.keys.secret.vc);
        let proofs = row_indexes
            .iter()
            .zip(values)
            .map(|(&row, value)| Pointproofs::generate_proof(pk, sk, commit, row, value))
            .collect::<Result<Vec<_>>>()?;
        Pointproofs::aggregate_proofs(&self.ctx, commit, values, row_indexes, &proofs)
    }

    /// Prove an aggregate over a full column
    ///
    /// # Arguments
    /// * `query` - The aggregate to prove
    /// * `column` - The committed column it ranges over
    pub fn prove_aggregation(
        &self,
        query: &AggregateQuery,
        column: &[Field],
    ) -> Result<AggregationProof> {
        let sk = &self.keys.secret.aggregation;
        let pk = &self.keys.public.aggregation;

        let proof = match query {
            AggregateQuery::Count => {
                let (proof, count) = AggregationAccumulator::generate_count_proof(sk, pk, column)?;
                AggregationProof::Count { proof, count }
            }
            AggregateQuery::Sum => {
                let (proof, count, sum) =
                    AggregationAccumulator::generate_sum_proof(sk, pk, column)?;
                AggregationProof::Sum { proof, count, sum }
            }
            AggregateQuery::Min { value } => {
                let proof = AggregationAccumulator::generate_min_proof(sk, pk, column, value)?;
                AggregationProof::Min { proof, min: *value }
            }
        };

        log::debug!(
            "{:?} proof over {} values, claimed {}",
            query.kind(),
            column.len(),
            FieldUtils::to_hex(&proof.value())
        );
        Ok(proof)
    }

    /// Prove every value of the answer index is committed in `committed`
    ///
    /// For each value the prover commits `[value, acc_hash]` over the
    /// answer's postings, aggregates the pair's two openings, and opens the
    /// value's slot in the top-level digest.
    ///
    /// # Arguments
    /// * `committed` - The committed full index the prover holds
    /// * `answer_index` - Inverted index over the answer rows
    ///
    /// # Returns
    /// `Err(KeyNotIndexed)` if a value of the answer has no slot in `committed`
    pub fn prove_completeness(
        &self,
        committed: &CommittedIndex,
        answer_index: &InvertedIndex,
    ) -> Result<CompletenessProof> {
        let keys = &self.keys;
        let prove_entry = |entry: &IndexEntry| -> Result<CompletenessEntry> {
            let position = committed
                .position(&entry.key)
                .ok_or_else(|| ProtocolError::KeyNotIndexed(FieldUtils::to_hex(&entry.key)))?;

            let pair = PairCommitment::commit(
                &self.ctx,
                &keys.public.vc,
                &keys.secret.vc,
                &keys.public.set,
                &keys.secret.set,
                entry,
            )?;
            let messages = pair.messages(entry.key);
            let openings = [
                Pointproofs::generate_proof(
                    &keys.public.vc,
                    &keys.secret.vc,
                    &pair.commitment,
                    0,
                    &messages[0],
                )?,
                Pointproofs::generate_proof(
                    &keys.public.vc,
                    &keys.secret.vc,
                    &pair.commitment,
                    1,
                    &messages[1],
                )?,
            ];
            let pair_proof = Pointproofs::aggregate_proofs(
                &self.ctx,
                &pair.commitment,
                &messages,
                &[0, 1],
                &openings,
            )?;

            let position_proof = Pointproofs::generate_proof(
                &keys.public.vc,
                &keys.secret.vc,
                &committed.digest,
                position,
                &entry.key,
            )?;

            Ok(CompletenessEntry {
                key: entry.key,
                acc_hash: pair.acc_hash,
                pair_commitment: pair.commitment,
                pair_proof,
                position_proof,
            })
        };

        #[cfg(feature = "parallel")]
        let entries: Vec<CompletenessEntry> = {
            use rayon::prelude::*;
            answer_index
                .entries()
                .par_iter()
                .map(prove_entry)
                .collect::<Result<_>>()?
        };
        #[cfg(not(feature = "parallel"))]
        let entries: Vec<CompletenessEntry> = answer_index
            .entries()
            .iter()
            .map(prove_entry)
            .collect::<Result<_>>()?;

        log::debug!("completeness proof over {} values", entries.len());
        Ok(CompletenessProof { entries })
    }

    /// Produce every proof one query needs
    ///
    /// The correctness proof is skipped for an aggregate over the full table,
    /// where the aggregate already covers every row. The aggregated column
    /// must still match the accumulator recorded at setup.
    ///
    /// # Arguments
    /// * `record` - Setup output held by the prover
    /// * `dataset` - The committed dataset
    /// * `answer` - The selected rows
    /// * `aggregate` - Optional `(column, query)` to aggregate
    ///
    /// # Returns
    /// `Err(ColumnMismatch)` if the aggregated column differs from setup, or
    /// `Err(MinNotBound)` for a MIN the keys are not bound to
    pub fn prove_query(
        &self,
        record: &SetupRecord,
        dataset: &Dataset,
        answer: &Answer,
        aggregate: Option<(usize, AggregateQuery)>,
    ) -> Result<QueryProof> {
        let full_table = answer.len() == dataset.num_rows();
        let correctness = match aggregate {
            Some(_) if full_table => None,
            _ => Some(self.prove_correctness(&record.column_commitments, answer)?),
        };

        let answer_index = InvertedIndex::build_subset(answer)?;
        let completeness = self.prove_completeness(&record.committed_index, &answer_index)?;

        let aggregation = match aggregate {
            Some((column, query)) => {
                let values = dataset.column(column)?;
                let acc = AggregationAccumulator::compute_accumulator(
                    &self.keys.secret.aggregation,
                    &values,
                );
                if record.column_accumulators.get(column) != Some(&acc) {
                    return Err(ProtocolError::ColumnMismatch(column));
                }
                Some(ColumnAggregation {
                    column,
                    proof: self.prove_aggregation(&query, &values)?,
                })
            }
            None => None,
        };

        Ok(QueryProof {
            correctness,
            completeness,
            aggregation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proof::Setup;
    use crate::types::AggregationKind;

    fn sample() -> Dataset {
        Dataset::from_u64_rows(&[vec![1, 2], vec![3, 1], vec![1, 4]]).unwrap()
    }

    #[test]
    fn test_prove_correctness_shape() {
        let ctx = PairingContext::new();
        let dataset = sample();
        let record = Setup::run(&ctx, &dataset, 0).unwrap();
        let prover = Prover::new(&ctx, &record.keys);

        let answer = Answer::select(&dataset, &[0, 2]).unwrap();
        let proof = prover
            .prove_correctness(&record.column_commitments, &answer)
            .unwrap();
        assert_eq!(proof.column_proofs.len(), 2);
    }

    #[test]
    fn test_prove_correctness_rejects_column_mismatch() {
        let ctx = PairingContext::new();
        let dataset = sample();
        let record = Setup::run(&ctx, &dataset, 0).unwrap();
        let prover = Prover::new(&ctx, &record.keys);

        let answer = Answer::select(&dataset, &[1]).unwrap();
        assert!(matches!(
            prover.prove_correctness(&record.column_commitments[..1], &answer),
            Err(ProtocolError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_prove_completeness_missing_key() {
        let ctx = PairingContext::new();
        let dataset = sample();
        let record = Setup::run(&ctx, &dataset, 0).unwrap();
        let prover = Prover::new(&ctx, &record.keys);

        // Commit an index that hides every occurrence of 4
        let full = InvertedIndex::build(&dataset).unwrap();
        let hidden = Setup::commit(
            &ctx,
            record.keys.clone(),
            &dataset,
            &full.without_key(&Field::from(4u64)),
        )
        .unwrap();

        let answer = Answer::select(&dataset, &[2]).unwrap();
        let answer_index = InvertedIndex::build_subset(&answer).unwrap();
        assert!(matches!(
            prover.prove_completeness(&hidden.committed_index, &answer_index),
            Err(ProtocolError::KeyNotIndexed(_))
        ));
    }

    #[test]
    fn test_prove_query_skips_correctness_for_full_table_aggregate() {
        let ctx = PairingContext::new();
        let dataset = sample();
        let record = Setup::run(&ctx, &dataset, 0).unwrap();
        let prover = Prover::new(&ctx, &record.keys);

        let answer = Answer::select(&dataset, &[0, 1, 2]).unwrap();
        let proof = prover
            .prove_query(&record, &dataset, &answer, Some((0, AggregateQuery::Count)))
            .unwrap();
        assert!(proof.correctness.is_none());
        assert_eq!(
            proof.aggregation.unwrap().proof.value(),
            Field::from(3u64)
        );

        let partial = Answer::select(&dataset, &[1]).unwrap();
        let proof = prover
            .prove_query(&record, &dataset, &partial, Some((1, AggregateQuery::Sum)))
            .unwrap();
        assert!(proof.correctness.is_some());
        assert_eq!(
            proof.aggregation.unwrap().proof.value(),
            Field::from(7u64)
        );
    }

    #[test]
    fn test_prove_aggregation_rejects_unbound_min() {
        let ctx = PairingContext::new();
        let dataset = Dataset::from_u64_rows(&[vec![4, 10], vec![9, 3], vec![2, 8]]).unwrap();
        let record = Setup::run(&ctx, &dataset, 0).unwrap();
        let prover = Prover::new(&ctx, &record.keys);

        // Keys are bound to the minimum of column 0
        let query = AggregateQuery::for_column(AggregationKind::Min, &dataset, 1)
            .unwrap()
            .unwrap();
        let column = dataset.column(1).unwrap();
        assert!(matches!(
            prover.prove_aggregation(&query, &column),
            Err(ProtocolError::MinNotBound { .. })
        ));

        let bound = AggregateQuery::for_column(AggregationKind::Min, &dataset, 0)
            .unwrap()
            .unwrap();
        let proof = prover
            .prove_aggregation(&bound, &dataset.column(0).unwrap())
            .unwrap();
        assert_eq!(proof.value(), Field::from(2u64));
    }

    #[test]
    fn test_prove_query_rejects_altered_column() {
        let ctx = PairingContext::new();
        let dataset = sample();
        let record = Setup::run(&ctx, &dataset, 0).unwrap();
        let prover = Prover::new(&ctx, &record.keys);

        let altered = Dataset::from_u64_rows(&[vec![1, 2], vec![3, 1], vec![1, 5]]).unwrap();
        let answer = Answer::select(&altered, &[0]).unwrap();
        assert!(matches!(
            prover.prove_query(&record, &altered, &answer, Some((1, AggregateQuery::Sum))),
            Err(ProtocolError::ColumnMismatch(1))
        ));

        // Column 0 is unchanged
        assert!(prover
            .prove_query(&record, &altered, &answer, Some((0, AggregateQuery::Sum)))
            .is_ok());
    }
}
