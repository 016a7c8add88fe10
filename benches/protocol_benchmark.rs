use attested_query::commitment::Pointproofs;
use attested_query::config::ProtocolConfig;
use attested_query::index::InvertedIndex;
use attested_query::utils::Helpers;
use attested_query::{
    AggregateQuery, AggregationKind, Answer, Dataset, PairingContext, Prover, QueryRequest, Setup,
    Verifier,
};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

fn workload(n_row: usize) -> (Dataset, Answer) {
    let config = ProtocolConfig {
        n_row,
        n_col: 4,
        answer_size: n_row / 10 + 1,
        max_value: 1 << 32,
        ..ProtocolConfig::default()
    };
    let mut rng = rand::rng();
    let dataset = Helpers::random_dataset(&config, &mut rng).unwrap();
    let rows = Helpers::sample_rows(config.n_row, config.answer_size, &mut rng);
    let answer = Answer::select(&dataset, &rows).unwrap();
    (dataset, answer)
}

fn bench_commit(c: &mut Criterion) {
    let ctx = PairingContext::new();
    let mut group = c.benchmark_group("pointproofs_commit");
    for &size in &[64usize, 256, 1024] {
        let (sk, pk) = Pointproofs::generate_keys(&ctx, size).unwrap();
        let messages: Vec<_> = (0..size as u64).map(halo2curves::bn256::Fr::from).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &messages, |b, messages| {
            b.iter(|| Pointproofs::commit(&pk, &sk, messages).unwrap());
        });
    }
    group.finish();
}

fn bench_setup(c: &mut Criterion) {
    let ctx = PairingContext::new();
    let mut group = c.benchmark_group("setup");
    group.sample_size(10);
    for &size in &[32usize, 128] {
        let (dataset, _) = workload(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &dataset, |b, dataset| {
            b.iter(|| Setup::run(&ctx, dataset, 0).unwrap());
        });
    }
    group.finish();
}

fn bench_prove_verify(c: &mut Criterion) {
    let ctx = PairingContext::new();
    for &size in &[32usize, 128] {
        let (dataset, answer) = workload(size);
        let record = Setup::run(&ctx, &dataset, 0).unwrap();
        let public = record.public();
        let prover = Prover::new(&ctx, &record.keys);
        let verifier = Verifier::new(&ctx, &public.keys);

        let mut group = c.benchmark_group("prove_completeness");
        group.sample_size(10);
        group.bench_with_input(BenchmarkId::from_parameter(size), &answer, |b, answer| {
            b.iter_batched(
                || InvertedIndex::build_subset(answer).unwrap(),
                |index| prover.prove_completeness(&record.committed_index, &index).unwrap(),
                BatchSize::SmallInput,
            );
        });
        group.finish();

        let proof = prover
            .prove_query(&record, &dataset, &answer, Some((0, AggregateQuery::Sum)))
            .unwrap();
        let request = QueryRequest::aggregate(0, AggregationKind::Sum, false);
        let mut group = c.benchmark_group("verify_all");
        group.sample_size(10);
        group.bench_with_input(BenchmarkId::from_parameter(size), &proof, |b, proof| {
            b.iter(|| assert!(verifier.verify_all(&public, &request, &answer, proof).is_accepted()));
        });
        group.finish();
    }
}

criterion_group!(benches, bench_commit, bench_setup, bench_prove_verify);
criterion_main!(benches);
