use std::fs;
use std::path::{Path, PathBuf};

use super::*;
use crate::config::{CompareOptions, EngineConfig};

fn write_file(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write test file");
    path
}

fn engine() -> Comparator {
    Comparator::new(EngineConfig::default()).expect("engine")
}

const REF_TEXT: &str =
    "the quick brown fox jumps over the lazy dog while seven curious ravens watch silently";

#[test]
fn invalid_config_is_rejected_at_construction() {
    let config = EngineConfig {
        seed_size: 0,
        ..EngineConfig::default()
    };
    assert!(matches!(
        Comparator::new(config),
        Err(EngineError::Config(_))
    ));
}

#[test]
fn unreadable_reference_is_skipped_not_fatal() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let good = write_file(tmp.path(), "good.txt", REF_TEXT);
    let missing = tmp.path().join("missing.txt");

    let mut engine = engine();
    let summary = engine.add_references(&[good.clone(), missing], None);

    assert_eq!(summary.indexed, 1);
    assert_eq!(summary.skipped.len(), 1);
    assert!(summary.skipped[0].path.ends_with("missing.txt"));
    assert_eq!(engine.stats().reference_file_count, 1);

    // The surviving reference is fully usable.
    let outcome = engine
        .compare_document(&good, &CompareOptions::default(), None)
        .expect("compare");
    assert!(!outcome.coverage_by_source.is_empty());
}

#[test]
fn unreadable_target_is_fatal() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let reference = write_file(tmp.path(), "ref.txt", REF_TEXT);

    let mut engine = engine();
    engine.add_references(&[reference], None);

    let result = engine.compare_document(
        &tmp.path().join("missing.txt"),
        &CompareOptions::default(),
        None,
    );
    assert!(matches!(result, Err(EngineError::Extract(_))));
}

#[test]
fn reindex_replaces_previous_state() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let first = write_file(tmp.path(), "first.txt", REF_TEXT);
    let second = write_file(
        tmp.path(),
        "second.txt",
        "completely unrelated maritime navigation charts describe coastal winds",
    );

    let mut engine = engine();
    engine.add_references(&[first.clone()], None);
    assert_eq!(engine.stats().reference_file_count, 1);

    engine.add_references(&[second], None);
    assert_eq!(engine.stats().reference_file_count, 1);

    // The first file is no longer indexed, so comparing it finds nothing.
    let outcome = engine
        .compare_document(&first, &CompareOptions::default(), None)
        .expect("compare");
    assert!(outcome.coverage_by_source.is_empty());
}

#[test]
fn index_progress_counts_every_file_once() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let paths: Vec<PathBuf> = (0..5)
        .map(|i| {
            write_file(
                tmp.path(),
                &format!("ref{i}.txt"),
                &format!("{REF_TEXT} unique{i}"),
            )
        })
        .collect();

    let mut engine = engine();
    let mut ticks: Vec<(usize, usize)> = Vec::new();
    engine.add_references(&paths, Some(&mut |done, total| ticks.push((done, total))));

    assert_eq!(ticks.len(), 5);
    assert!(ticks.windows(2).all(|w| w[0].0 < w[1].0));
    assert!(ticks.iter().all(|&(_, total)| total == 5));
    assert_eq!(ticks.last(), Some(&(5, 5)));
}

#[test]
fn compare_progress_runs_from_zero_to_complete() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let reference = write_file(tmp.path(), "ref.txt", REF_TEXT);

    let mut engine = engine();
    engine.add_references(&[reference.clone()], None);

    let mut percents: Vec<u32> = Vec::new();
    engine
        .compare_document(
            &reference,
            &CompareOptions::default(),
            Some(&mut |pct, _msg| percents.push(pct)),
        )
        .expect("compare");

    assert_eq!(percents.first(), Some(&0));
    assert_eq!(percents.last(), Some(&100));
    assert!(percents.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn empty_target_yields_empty_outcome() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let reference = write_file(tmp.path(), "ref.txt", REF_TEXT);
    let empty = write_file(tmp.path(), "empty.txt", "");

    let mut engine = engine();
    engine.add_references(&[reference], None);

    let outcome = engine
        .compare_document(&empty, &CompareOptions::default(), None)
        .expect("compare");
    assert_eq!(outcome.total_word_count, 0);
    assert!(outcome.highlights_by_page.is_empty());
    assert!(outcome.coverage_by_source.is_empty());
}

#[test]
fn stopword_only_target_matches_nothing() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let reference = write_file(tmp.path(), "ref.txt", REF_TEXT);
    let target = write_file(tmp.path(), "stops.txt", "the and of to was were it");

    let mut engine = engine();
    engine.add_references(&[reference], None);

    let outcome = engine
        .compare_document(&target, &CompareOptions::default(), None)
        .expect("compare");
    // Raw words exist but none survive filtering.
    assert_eq!(outcome.total_word_count, 7);
    assert!(outcome.coverage_by_source.is_empty());
}
