use criterion::{criterion_group, criterion_main, Criterion};
use script_deobfuscator::config::PipelineConfig;
use script_deobfuscator::pipeline::{Mode, Pipeline};
use script_deobfuscator::property_access::{rewrite_property_access, KeyPolicy};
use script_deobfuscator::hex_literals::normalize_hex_literals;
use std::hint::black_box;
use std::time::Duration;

// Minified-bundle shaped inputs plus a few adversarial ones
fn get_corpus() -> Vec<String> {
    vec![
        "var _0x1c226f = document[\"querySelector\"](\".whatsapp-icon\"); ".repeat(2000),
        format!("x = 0x{};", "f".repeat(5000)),
        "0x".repeat(20000),
        format!("a{}", "[\"b\"]".repeat(500)),
        format!("a{}", "['b'][\"c\"]".repeat(250)),
        format!("{}[\"{}", "a".repeat(20000), "b".repeat(20000)),
        "normal text with no patterns ".repeat(1000),
    ]
}

fn benchmark_hex_literals(c: &mut Criterion) {
    let corpus = get_corpus();
    let mut group = c.benchmark_group("hex_literals");
    group.measurement_time(Duration::from_millis(1000));
    group.sample_size(50);

    for (i, input) in corpus.iter().enumerate() {
        group.bench_function(format!("hex_input_{}", i), |b| {
            b.iter(|| normalize_hex_literals(black_box(input)))
        });
    }
    group.finish();
}

fn benchmark_property_access(c: &mut Criterion) {
    let corpus = get_corpus();
    let mut group = c.benchmark_group("property_access");
    group.measurement_time(Duration::from_millis(1000));
    group.sample_size(50);

    for (i, input) in corpus.iter().enumerate() {
        group.bench_function(format!("property_input_{}", i), |b| {
            b.iter(|| rewrite_property_access(black_box(input), KeyPolicy::Permissive))
        });
    }
    group.finish();
}

fn benchmark_full_pipeline(c: &mut Criterion) {
    let corpus = get_corpus();
    let pipeline = Pipeline::new(&PipelineConfig {
        decode_escapes: true,
        fold_booleans: true,
        ..PipelineConfig::default()
    })
    .unwrap();

    c.bench_function("full_pipeline_bundle", |b| {
        b.iter(|| pipeline.run(black_box(&corpus[0]), Mode::Full))
    });
}

criterion_group!(
    benches,
    benchmark_hex_literals,
    benchmark_property_access,
    benchmark_full_pipeline
);
criterion_main!(benches);
