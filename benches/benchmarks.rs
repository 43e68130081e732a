//! Benchmarks for neurosig operations.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use neurosig::{
    Analyzer, Classifier, Config, FeatureExtractor, Metric, Normalizer, ReferenceAccumulator,
    Similarity, Simulator,
};

const CONDITIONS: [&str; 3] = ["schizophrenia", "bipolar", "control"];

fn benchmark_extract(c: &mut Criterion) {
    let m = Simulator::with_seed(1).generate("bipolar", 128, 8);

    c.bench_function("extract_128x8", |b| {
        b.iter(|| FeatureExtractor::extract(black_box(&m)))
    });
}

fn benchmark_normalize(c: &mut Criterion) {
    let m = Simulator::with_seed(1).generate("control", 128, 8);

    c.bench_function("normalize_128x8", |b| {
        b.iter(|| Normalizer::normalize(black_box(&m)))
    });
    c.bench_function("standardize_128x8", |b| {
        b.iter(|| Normalizer::standardize(black_box(&m)))
    });
    c.bench_function("smooth_128x8_w5", |b| {
        b.iter(|| Normalizer::smooth(black_box(&m), 5))
    });
}

fn benchmark_similarity(c: &mut Criterion) {
    let sim = Simulator::with_seed(1);
    let a = sim.generate("schizophrenia", 64, 8);
    let b_m = sim.generate("bipolar", 64, 8);

    let mut group = c.benchmark_group("similarity_64x8");
    for metric in [Metric::Euclidean, Metric::RowNormalized, Metric::CosineColumnMeans] {
        group.bench_function(format!("{:?}", metric), |b| {
            b.iter(|| Similarity::compute(black_box(&a), black_box(&b_m), metric))
        });
    }
    group.finish();
}

fn benchmark_classify(c: &mut Criterion) {
    let sim = Simulator::with_seed(1);
    let mut classifier = Classifier::new(Config::default());
    classifier
        .train(sim.training_set(&CONDITIONS, 10, 32, 4).unwrap())
        .unwrap();
    let probe = sim.sample("control", 32, 4, 99);

    c.bench_function("classify_30_patterns", |b| {
        b.iter(|| classifier.classify(black_box(&probe)))
    });
    c.bench_function("training_fit_30_patterns", |b| b.iter(|| classifier.accuracy()));
}

fn benchmark_detect(c: &mut Criterion) {
    let sim = Simulator::with_seed(1);
    let mut analyzer = Analyzer::default();
    for i in 0..10 {
        analyzer
            .add_reference("control", &sim.sample("control", 32, 4, i))
            .unwrap();
    }
    let probe = sim.sample("schizophrenia", 32, 4, 0);

    c.bench_function("detect_self_baseline", |b| {
        b.iter(|| analyzer.detect_anomalies(black_box(&probe), None))
    });
    c.bench_function("detect_reference_baseline", |b| {
        b.iter(|| analyzer.detect_anomalies(black_box(&probe), Some("control")))
    });
}

fn benchmark_accumulator(c: &mut Criterion) {
    let m = Simulator::with_seed(1).generate("control", 32, 4);

    c.bench_function("accumulator_add", |b| {
        b.iter(|| {
            let mut acc = ReferenceAccumulator::new();
            for _ in 0..100 {
                acc.add(black_box(&m));
            }
            acc
        })
    });
}

criterion_group!(
    benches,
    benchmark_extract,
    benchmark_normalize,
    benchmark_similarity,
    benchmark_classify,
    benchmark_detect,
    benchmark_accumulator,
);

criterion_main!(benches);
