//! Indexing and comparison throughput over synthetic corpora.
//!
//! Run locally with `cargo bench --bench compare_bench`; not part of CI.

use std::fs;
use std::path::PathBuf;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use textmatch::{CompareOptions, Comparator, EngineConfig, MatchMode};

/// Deterministic filler text: cycles a vocabulary so shingles repeat across
/// documents without being identical.
fn synthetic_doc(words: usize, stride: usize) -> String {
    const VOCAB: &[&str] = &[
        "glacier", "meltwater", "moraine", "ridge", "valley", "boulder", "sediment", "channel",
        "delta", "plain", "gravel", "braided", "silt", "terrace", "outwash", "drumlin", "esker",
        "kettle", "till", "fjord",
    ];
    let mut out = String::new();
    for i in 0..words {
        if i > 0 {
            out.push(if i % 12 == 0 { '\n' } else { ' ' });
        }
        out.push_str(VOCAB[(i * stride + i / VOCAB.len()) % VOCAB.len()]);
    }
    out
}

fn setup_corpus(dir: &std::path::Path, files: usize, words: usize) -> Vec<PathBuf> {
    (0..files)
        .map(|i| {
            let path = dir.join(format!("ref{i}.txt"));
            fs::write(&path, synthetic_doc(words, i + 1)).expect("write corpus file");
            path
        })
        .collect()
}

fn bench_indexing(c: &mut Criterion) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let refs = setup_corpus(tmp.path(), 8, 2_000);

    c.bench_function("index_8x2k_words", |b| {
        b.iter_batched(
            || Comparator::new(EngineConfig::default()).expect("engine"),
            |mut engine| engine.add_references(&refs, None),
            BatchSize::SmallInput,
        );
    });
}

fn bench_compare(c: &mut Criterion) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let refs = setup_corpus(tmp.path(), 8, 2_000);
    let target = tmp.path().join("target.txt");
    fs::write(&target, synthetic_doc(2_000, 3)).expect("write target");

    let mut engine = Comparator::new(EngineConfig::default()).expect("engine");
    engine.add_references(&refs, None);

    c.bench_function("compare_exact_2k_words", |b| {
        b.iter(|| {
            engine
                .compare_document(&target, &CompareOptions::default(), None)
                .expect("compare")
        });
    });

    c.bench_function("compare_fuzzy_2k_words", |b| {
        let options = CompareOptions {
            mode: MatchMode::Fuzzy,
            use_alignment: false,
            ..CompareOptions::default()
        };
        b.iter(|| {
            engine
                .compare_document(&target, &options, None)
                .expect("compare")
        });
    });
}

criterion_group!(benches, bench_indexing, bench_compare);
criterion_main!(benches);
