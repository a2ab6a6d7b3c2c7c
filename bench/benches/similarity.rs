#![allow(clippy::unwrap_used, reason = "Benchmarks")]

use codspeed_criterion_compat::{criterion_group, criterion_main, Criterion};
use motif::similarity::{
    similarity, CompressedPatternGraph, CompressionRules, DistanceMatrix, LabelHierarchy,
    LabelWeights, SearchBudget,
};
use motif_bench::attachment_patterns;

fn compressed() -> Vec<CompressedPatternGraph> {
    let rules = CompressionRules::tmc();
    attachment_patterns()
        .iter()
        .map(|(_, pattern)| CompressedPatternGraph::compress(pattern, &rules))
        .collect()
}

fn pairwise(c: &mut Criterion) {
    let graphs = compressed();
    let weights = LabelWeights::idf(&graphs, &LabelHierarchy::tmc()).unwrap();
    let budget = SearchBudget::unlimited();
    let (first, last) = (&graphs[0], &graphs[graphs.len() - 1]);
    c.bench_function("similarity - largest vs smallest", |b| {
        b.iter(|| similarity(first, last, &weights, &budget));
    });
    c.bench_function("similarity - largest vs itself", |b| {
        b.iter(|| similarity(first, first, &weights, &budget));
    });
}

fn matrix(c: &mut Criterion) {
    let graphs = compressed();
    let weights = LabelWeights::tmc_fixed();
    c.bench_function("DistanceMatrix::compute", |b| {
        b.iter(|| DistanceMatrix::compute(&graphs, &weights, &SearchBudget::unlimited(), 2).unwrap());
    });
}

criterion_group!(similarity_benches, pairwise, matrix);
criterion_main!(similarity_benches);
