//! Verifier for query answers
//!
//! The verifier holds only public parameters and the published setup
//! values. Every check returns a plain `bool`: a malformed or mismatched
//! proof is a rejection, not an error.
//!
//! # Example
//!
//! ```rust
//! use attested_query::crypto::PairingContext;
//! use attested_query::proof::{Prover, Setup, Verifier};
//! use attested_query::types::{Answer, Dataset, QueryRequest};
//!
//! let ctx = PairingContext::new();
//! let dataset = Dataset::from_u64_rows(&[vec![1, 2], vec![3, 1], vec![1, 4]]).unwrap();
//! let record = Setup::run(&ctx, &dataset, 0).unwrap();
//! let public = record.public();
//!
//! let answer = Answer::select(&dataset, &[0, 2]).unwrap();
//! let proof = Prover::new(&ctx, &record.keys)
//!     .prove_query(&record, &dataset, &answer, None)
//!     .unwrap();
//!
//! let verifier = Verifier::new(&ctx, &public.keys);
//! let request = QueryRequest::selection();
//! assert!(verifier.verify_all(&public, &request, &answer, &proof).is_accepted());
//! ```

use crate::accumulator::AggregationAccumulator;
use crate::commitment::Pointproofs;
use crate::crypto::PairingContext;
use crate::field::FieldUtils;
use crate::index::{CommittedIndex, IndexEntry, InvertedIndex};
use crate::proof::artifacts::{
    AggregationProof, ColumnAggregation, CompletenessEntry, CompletenessProof, CorrectnessProof,
    QueryProof, VerificationReport,
};
use crate::proof::setup::{PublicKeys, PublicSetup};
use crate::types::{AggregationKind, Answer, QueryRequest};
use halo2curves::bn256::G1Affine;

/// Verifier for correctness, completeness and aggregation proofs
#[derive(Debug, Clone)]
pub struct Verifier {
    ctx: PairingContext,
    keys: PublicKeys,
}

impl Verifier {
    /// Create a new verifier
    ///
    /// # Arguments
    /// * `ctx` - Pairing context shared with the prover
    /// * `keys` - Public parameters from setup
    pub fn new(ctx: &PairingContext, keys: &PublicKeys) -> Self {
        Self {
            ctx: ctx.clone(),
            keys: keys.clone(),
        }
    }

    /// Check the answer rows against the column commitments
    ///
    /// # Arguments
    /// * `column_commitments` - Published commitment of each column
    /// * `answer` - The claimed answer
    /// * `proof` - One aggregated opening per column
    pub fn verify_correctness(
        &self,
        column_commitments: &[G1Affine],
        answer: &Answer,
        proof: &CorrectnessProof,
    ) -> bool {
        if column_commitments.len() != answer.num_columns()
            || proof.column_proofs.len() != answer.num_columns()
        {
            log::warn!("correctness proof does not cover every column");
            return false;
        }

        let columns = answer.columns();
        for (j, ((commit, values), aggregate)) in column_commitments
            .iter()
            .zip(&columns)
            .zip(&proof.column_proofs)
            .enumerate()
        {
            if !Pointproofs::verify_aggregate_proofs(
                &self.ctx,
                &self.keys.vc,
                commit,
                values,
                answer.row_indexes(),
                aggregate,
            ) {
                log::warn!("correctness check failed on column {}", j);
                return false;
            }
        }
        true
    }

    /// Check an aggregate against a column's published accumulator
    pub fn verify_aggregation(&self, published: &G1Affine, proof: &AggregationProof) -> bool {
        let pk = &self.keys.aggregation;
        let accepted = match proof {
            AggregationProof::Count { proof, count } => {
                AggregationAccumulator::verify_count_proof(&self.ctx, pk, published, proof, count)
            }
            AggregationProof::Sum { proof, count, sum } => AggregationAccumulator::verify_sum_proof(
                &self.ctx, pk, published, proof, count, sum,
            ),
            AggregationProof::Min { proof, min } => {
                AggregationAccumulator::verify_min_proof(&self.ctx, pk, published, proof, min)
            }
        };

        if !accepted {
            log::warn!(
                "{:?} proof rejected for claimed value {}",
                proof.kind(),
                FieldUtils::to_hex(&proof.value())
            );
        }
        accepted
    }

    /// Check every value of the answer is bound to the published index digest
    ///
    /// The verifier rebuilds the answer index itself, so a proof that skips
    /// or invents a value is rejected. Stops at the first failing value.
    ///
    /// # Arguments
    /// * `committed` - The published committed index
    /// * `answer` - The claimed answer
    /// * `proof` - Pair commitments and openings for every answer value
    pub fn verify_completeness(
        &self,
        committed: &CommittedIndex,
        answer: &Answer,
        proof: &CompletenessProof,
    ) -> bool {
        let answer_index = match InvertedIndex::build_subset(answer) {
            Ok(index) => index,
            Err(e) => {
                log::warn!("cannot index answer: {}", e);
                return false;
            }
        };

        if proof.len() != answer_index.len() {
            log::warn!(
                "completeness proof covers {} values, answer has {}",
                proof.len(),
                answer_index.len()
            );
            return false;
        }
        let evidence = match proof.by_key() {
            Some(evidence) => evidence,
            None => {
                log::warn!("completeness proof lists a value twice");
                return false;
            }
        };

        answer_index.entries().iter().all(|entry| {
            let accepted = evidence
                .get(&FieldUtils::to_bytes(&entry.key))
                .map(|e| self.verify_entry(committed, entry, e))
                .unwrap_or(false);
            if !accepted {
                log::warn!(
                    "completeness check failed for value {}",
                    FieldUtils::to_hex(&entry.key)
                );
            }
            accepted
        })
    }

    fn verify_entry(
        &self,
        committed: &CommittedIndex,
        entry: &IndexEntry,
        evidence: &CompletenessEntry,
    ) -> bool {
        let position = match committed.position(&entry.key) {
            Some(position) => position,
            None => return false,
        };

        let messages = [entry.key, evidence.acc_hash];
        Pointproofs::verify_aggregate_proofs(
            &self.ctx,
            &self.keys.vc,
            &evidence.pair_commitment,
            &messages,
            &[0, 1],
            &evidence.pair_proof,
        ) && Pointproofs::verify_proof(
            &self.ctx,
            &self.keys.vc,
            &committed.digest,
            &entry.key,
            position,
            &evidence.position_proof,
        )
    }

    /// Check a [`QueryProof`] against the query the verifier posed
    ///
    /// `request` decides which checks run. A correctness proof is required
    /// unless the request is a full-table aggregate, and a requested
    /// aggregate must cover the requested column with the requested kind.
    ///
    /// # Arguments
    /// * `setup` - Published setup values
    /// * `request` - The query as the verifier posed it
    /// * `answer` - The claimed answer
    /// * `proof` - The prover's proofs for this query
    pub fn verify_all(
        &self,
        setup: &PublicSetup,
        request: &QueryRequest,
        answer: &Answer,
        proof: &QueryProof,
    ) -> VerificationReport {
        let correctness = if request.requires_correctness() {
            Some(match &proof.correctness {
                Some(p) => self.verify_correctness(&setup.column_commitments, answer, p),
                None => {
                    log::warn!("query needs a correctness proof, none supplied");
                    false
                }
            })
        } else {
            None
        };

        let completeness =
            self.verify_completeness(&setup.committed_index, answer, &proof.completeness);

        let aggregation = match (request.aggregate, &proof.aggregation) {
            (None, None) => None,
            (None, Some(agg)) => {
                log::debug!(
                    "ignoring unrequested {:?} proof on column {}",
                    agg.proof.kind(),
                    agg.column
                );
                None
            }
            (Some((column, kind)), None) => {
                log::warn!("{:?} on column {} requested, no proof supplied", kind, column);
                Some(false)
            }
            (Some((column, kind)), Some(agg)) => {
                Some(self.verify_requested_aggregation(setup, column, kind, agg))
            }
        };

        let report = VerificationReport {
            correctness,
            completeness,
            aggregation,
        };
        log::info!(
            "verification {}: correctness={:?} completeness={} aggregation={:?}",
            if report.is_accepted() { "accepted" } else { "rejected" },
            report.correctness,
            report.completeness,
            report.aggregation
        );
        report
    }

    fn verify_requested_aggregation(
        &self,
        setup: &PublicSetup,
        column: usize,
        kind: AggregationKind,
        agg: &ColumnAggregation,
    ) -> bool {
        if agg.column != column || agg.proof.kind() != kind {
            log::warn!(
                "requested {:?} on column {}, proof covers {:?} on column {}",
                kind,
                column,
                agg.proof.kind(),
                agg.column
            );
            return false;
        }
        match setup.published_accumulators.get(column) {
            Some(published) => self.verify_aggregation(published, &agg.proof),
            None => {
                log::warn!("no published accumulator for column {}", column);
                false
            }
        }
    }
}
