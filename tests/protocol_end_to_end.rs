use attested_query::accumulator::AggregationAccumulator;
use attested_query::database::{SetupStorage, StorageFormat};
use attested_query::field::EncodedPosition;
use attested_query::index::{CommittedIndex, InvertedIndex};
use attested_query::proof::AggregationProof;
use attested_query::utils::Logger;
use attested_query::{
    AggregateQuery, AggregationKind, Answer, Dataset, PairingContext, ProtocolError, Prover,
    PublicSetup, QueryRequest, Setup, SetupRecord, Verifier,
};
use halo2curves::bn256::Fr;

struct Fixture {
    ctx: PairingContext,
    dataset: Dataset,
    record: SetupRecord,
    public: PublicSetup,
}

impl Fixture {
    fn new(rows: &[Vec<u64>], min_column: usize) -> Self {
        Logger::try_init();
        let ctx = PairingContext::new();
        let dataset = Dataset::from_u64_rows(rows).unwrap();
        let record = Setup::run(&ctx, &dataset, min_column).unwrap();
        let public = record.public();
        Self {
            ctx,
            dataset,
            record,
            public,
        }
    }

    fn sample() -> Self {
        Self::new(&[vec![1, 2], vec![3, 1], vec![1, 4]], 0)
    }

    fn prover(&self) -> Prover {
        Prover::new(&self.ctx, &self.record.keys)
    }

    fn verifier(&self) -> Verifier {
        Verifier::new(&self.ctx, &self.public.keys)
    }

    /// Commit `index` with the honest keys, as a dishonest prover would
    fn commit_index(&self, index: &InvertedIndex) -> CommittedIndex {
        let keys = &self.record.keys;
        CommittedIndex::build(
            &self.ctx,
            &keys.public.vc,
            &keys.secret.vc,
            &keys.public.set,
            &keys.secret.set,
            index,
        )
        .unwrap()
    }
}

fn fr(v: u64) -> Fr {
    Fr::from(v)
}

#[test]
fn test_selection_round_trip() {
    let f = Fixture::sample();
    let answer = Answer::select(&f.dataset, &[0, 2]).unwrap();

    let proof = f.prover().prove_query(&f.record, &f.dataset, &answer, None).unwrap();
    let report = f
        .verifier()
        .verify_all(&f.public, &QueryRequest::selection(), &answer, &proof);

    assert_eq!(report.correctness, Some(true));
    assert!(report.completeness);
    assert_eq!(report.aggregation, None);
    assert!(report.is_accepted());
}

#[test]
fn test_completeness_rejects_dropped_posting() {
    let f = Fixture::sample();
    let answer = Answer::select(&f.dataset, &[0, 2]).unwrap();
    let answer_index = InvertedIndex::build_subset(&answer).unwrap();

    // Hide cell (1, 1), which holds value 1
    let full = InvertedIndex::build(&f.dataset).unwrap();
    let hidden = full.without_position(&fr(1), EncodedPosition::encode(1, 1).unwrap());
    let dishonest = f.commit_index(&hidden);
    assert_ne!(dishonest.digest, f.public.committed_index.digest);

    let proof = f
        .prover()
        .prove_completeness(&dishonest, &answer_index)
        .unwrap();
    assert!(!f
        .verifier()
        .verify_completeness(&f.public.committed_index, &answer, &proof));

    let honest = f
        .prover()
        .prove_completeness(&f.record.committed_index, &answer_index)
        .unwrap();
    assert!(f
        .verifier()
        .verify_completeness(&f.public.committed_index, &answer, &honest));
}

#[test]
fn test_completeness_rejects_dropped_key() {
    let f = Fixture::sample();
    let answer = Answer::select(&f.dataset, &[0, 2]).unwrap();
    let answer_index = InvertedIndex::build_subset(&answer).unwrap();

    let full = InvertedIndex::build(&f.dataset).unwrap();
    let dishonest = f.commit_index(&full.without_key(&fr(4)));

    // The prover cannot open a value it never committed
    assert!(matches!(
        f.prover().prove_completeness(&dishonest, &answer_index),
        Err(ProtocolError::KeyNotIndexed(_))
    ));

    // Omitting the value from the proof is caught by the verifier's own index
    let mut proof = f
        .prover()
        .prove_completeness(&f.record.committed_index, &answer_index)
        .unwrap();
    proof.entries.retain(|e| e.key != fr(4));
    assert!(!f
        .verifier()
        .verify_completeness(&f.public.committed_index, &answer, &proof));

    // A verifier holding the dishonest digest has no slot for the value
    let honest = f
        .prover()
        .prove_completeness(&f.record.committed_index, &answer_index)
        .unwrap();
    assert!(!f.verifier().verify_completeness(&dishonest, &answer, &honest));
}

#[test]
fn test_correctness_rejects_forged_answer() {
    let f = Fixture::sample();
    let answer = Answer::select(&f.dataset, &[1]).unwrap();
    let proof = f.prover().prove_query(&f.record, &f.dataset, &answer, None).unwrap();

    // Same row index, different content
    let forged = Answer::from_parts(vec![1], vec![vec![fr(3), fr(9)]], 2).unwrap();
    let request = QueryRequest::selection();
    let report = f.verifier().verify_all(&f.public, &request, &forged, &proof);
    assert_eq!(report.correctness, Some(false));
    assert!(!report.is_accepted());

    // Real content, claimed at another row
    let moved = Answer::from_parts(vec![0], vec![vec![fr(3), fr(1)]], 2).unwrap();
    assert!(!f
        .verifier()
        .verify_all(&f.public, &request, &moved, &proof)
        .is_accepted());
}

#[test]
fn test_stripped_correctness_is_rejected() {
    let f = Fixture::sample();
    let answer = Answer::select(&f.dataset, &[0, 2]).unwrap();
    let mut proof = f.prover().prove_query(&f.record, &f.dataset, &answer, None).unwrap();
    proof.correctness = None;

    // Rewritten rows over the same distinct values {1, 2, 4}
    let forged = Answer::from_parts(vec![0, 2], vec![vec![fr(2), fr(1)], vec![fr(4), fr(4)]], 2)
        .unwrap();
    let report = f
        .verifier()
        .verify_all(&f.public, &QueryRequest::selection(), &forged, &proof);
    assert!(report.completeness);
    assert_eq!(report.correctness, Some(false));
    assert!(!report.is_accepted());

    // A partial aggregate still needs the rows opened
    let request = QueryRequest::aggregate(0, AggregationKind::Count, false);
    assert!(!f
        .verifier()
        .verify_all(&f.public, &request, &answer, &proof)
        .is_accepted());
}

#[test]
fn test_substituted_aggregate_is_rejected() {
    let f = Fixture::new(&[vec![2, 4], vec![3, 3]], 0);
    let answer = Answer::select(&f.dataset, &[0]).unwrap();
    let requested = QueryRequest::aggregate(0, AggregationKind::Sum, false);

    let honest = f
        .prover()
        .prove_query(&f.record, &f.dataset, &answer, Some((0, AggregateQuery::Sum)))
        .unwrap();
    assert_eq!(honest.aggregation.unwrap().proof.value(), fr(5));
    assert!(f
        .verifier()
        .verify_all(&f.public, &requested, &answer, &honest)
        .is_accepted());

    // Valid SUM, wrong column
    let other_column = f
        .prover()
        .prove_query(&f.record, &f.dataset, &answer, Some((1, AggregateQuery::Sum)))
        .unwrap();
    assert_eq!(other_column.aggregation.unwrap().proof.value(), fr(7));
    let report = f
        .verifier()
        .verify_all(&f.public, &requested, &answer, &other_column);
    assert_eq!(report.aggregation, Some(false));
    assert!(!report.is_accepted());

    // Valid aggregate, wrong kind
    let other_kind = f
        .prover()
        .prove_query(&f.record, &f.dataset, &answer, Some((0, AggregateQuery::Count)))
        .unwrap();
    let report = f.verifier().verify_all(&f.public, &requested, &answer, &other_kind);
    assert_eq!(report.aggregation, Some(false));

    // No aggregate at all
    let mut missing = honest.clone();
    missing.aggregation = None;
    let report = f.verifier().verify_all(&f.public, &requested, &answer, &missing);
    assert_eq!(report.aggregation, Some(false));
    assert!(!report.is_accepted());
}

#[test]
fn test_repeated_completeness_entry_is_rejected() {
    let f = Fixture::sample();
    let answer = Answer::select(&f.dataset, &[0, 2]).unwrap();
    let mut proof = f.prover().prove_query(&f.record, &f.dataset, &answer, None).unwrap();
    let last = proof.completeness.len() - 1;
    proof.completeness.entries[last] = proof.completeness.entries[0];

    let report = f
        .verifier()
        .verify_all(&f.public, &QueryRequest::selection(), &answer, &proof);
    assert_eq!(report.correctness, Some(true));
    assert!(!report.completeness);
    assert!(!report.is_accepted());
}

#[test]
fn test_count_scenario() {
    let f = Fixture::new(&[vec![5], vec![5], vec![7]], 0);
    let answer = Answer::select(&f.dataset, &[0, 1, 2]).unwrap();

    let proof = f
        .prover()
        .prove_query(&f.record, &f.dataset, &answer, Some((0, AggregateQuery::Count)))
        .unwrap();
    assert!(proof.correctness.is_none());

    let aggregation = proof.aggregation.unwrap();
    assert_eq!(aggregation.proof.value(), fr(3));
    let request = QueryRequest::aggregate(0, AggregationKind::Count, true);
    assert!(f
        .verifier()
        .verify_all(&f.public, &request, &answer, &proof)
        .is_accepted());

    let understated = match aggregation.proof {
        AggregationProof::Count { proof, .. } => AggregationProof::Count { proof, count: fr(2) },
        other => panic!("unexpected proof {:?}", other),
    };
    assert!(!f
        .verifier()
        .verify_aggregation(&f.public.published_accumulators[0], &understated));
}

#[test]
fn test_sum_and_min_over_column() {
    let f = Fixture::new(&[vec![4, 10], vec![9, 3], vec![2, 8], vec![6, 3]], 1);
    let column = f.dataset.column(1).unwrap();
    let published = &f.public.published_accumulators[1];

    let sum = f.prover().prove_aggregation(&AggregateQuery::Sum, &column).unwrap();
    assert_eq!(sum.value(), fr(24));
    assert!(f.verifier().verify_aggregation(published, &sum));

    let inflated = match sum {
        AggregationProof::Sum { proof, count, .. } => AggregationProof::Sum {
            proof,
            count,
            sum: fr(25),
        },
        other => panic!("unexpected proof {:?}", other),
    };
    assert!(!f.verifier().verify_aggregation(published, &inflated));

    let query = AggregateQuery::for_column(AggregationKind::Min, &f.dataset, 1)
        .unwrap()
        .unwrap();
    let min = f.prover().prove_aggregation(&query, &column).unwrap();
    assert_eq!(min.value(), fr(3));
    assert!(f.verifier().verify_aggregation(published, &min));
}

#[test]
fn test_aggregate_over_tampered_column_fails() {
    let f = Fixture::new(&[vec![5], vec![5], vec![7]], 0);

    // Proof built over a column the prover altered
    let (proof, count) = AggregationAccumulator::generate_count_proof(
        &f.record.keys.secret.aggregation,
        &f.record.keys.public.aggregation,
        &[fr(5), fr(6), fr(7)],
    )
    .unwrap();
    assert_eq!(count, fr(3));
    assert!(!f.verifier().verify_aggregation(
        &f.public.published_accumulators[0],
        &AggregationProof::Count { proof, count }
    ));
}

#[test]
fn test_partial_aggregate_keeps_correctness() {
    let f = Fixture::sample();
    let answer = Answer::select(&f.dataset, &[2, 1]).unwrap();
    let proof = f
        .prover()
        .prove_query(&f.record, &f.dataset, &answer, Some((1, AggregateQuery::Sum)))
        .unwrap();

    let request = QueryRequest::aggregate(1, AggregationKind::Sum, false);
    let report = f.verifier().verify_all(&f.public, &request, &answer, &proof);
    assert_eq!(report.correctness, Some(true));
    assert_eq!(report.aggregation, Some(true));
    assert!(report.is_accepted());
}

#[test]
fn test_empty_answer() {
    let f = Fixture::sample();
    let answer = Answer::select(&f.dataset, &[]).unwrap();
    let proof = f.prover().prove_query(&f.record, &f.dataset, &answer, None).unwrap();
    assert!(proof.completeness.is_empty());
    assert!(f
        .verifier()
        .verify_all(&f.public, &QueryRequest::selection(), &answer, &proof)
        .is_accepted());
}

#[test]
fn test_persisted_setup_still_verifies() {
    let f = Fixture::sample();
    let dir = tempfile::tempdir().unwrap();

    let json = SetupStorage::new(StorageFormat::Json);
    let binary = SetupStorage::new(StorageFormat::Binary);
    json.save_record(&f.record, dir.path().join("record.json")).unwrap();
    binary.save_public(&f.public, dir.path().join("public.bin")).unwrap();

    let record = json.load_record(dir.path().join("record.json")).unwrap();
    let public = binary.load_public(dir.path().join("public.bin")).unwrap();

    let answer = Answer::select(&f.dataset, &[0, 1]).unwrap();
    let proof = Prover::new(&f.ctx, &record.keys)
        .prove_query(&record, &f.dataset, &answer, Some((0, AggregateQuery::Count)))
        .unwrap();
    let request = QueryRequest::aggregate(0, AggregationKind::Count, false);
    let report = Verifier::new(&f.ctx, &public.keys).verify_all(&public, &request, &answer, &proof);
    assert!(report.is_accepted());
}

#[test]
fn test_query_proof_json_transport() {
    let f = Fixture::sample();
    let answer = Answer::select(&f.dataset, &[1, 2]).unwrap();
    let proof = f
        .prover()
        .prove_query(&f.record, &f.dataset, &answer, Some((0, AggregateQuery::Sum)))
        .unwrap();

    let wire = serde_json::to_string(&proof).unwrap();
    let received: attested_query::QueryProof = serde_json::from_str(&wire).unwrap();
    assert_eq!(received, proof);
    let request = QueryRequest::aggregate(0, AggregationKind::Sum, false);
    assert!(f
        .verifier()
        .verify_all(&f.public, &request, &answer, &received)
        .is_accepted());
}

#[test]
fn test_domain_separation() {
    let f = Fixture::sample();
    let answer = Answer::select(&f.dataset, &[0]).unwrap();
    let proof = f.prover().prove_query(&f.record, &f.dataset, &answer, None).unwrap();

    let other = PairingContext::with_domain(b"another-deployment");
    let report = Verifier::new(&other, &f.public.keys).verify_all(
        &f.public,
        &QueryRequest::selection(),
        &answer,
        &proof,
    );
    assert_eq!(report.correctness, Some(false));
    assert!(!report.is_accepted());
}
