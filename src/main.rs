use std::error::Error;
use std::path::PathBuf;
use std::process;

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use textmatch::{CompareOptions, Comparator, EngineConfig, MatchMode, SkippedFile};

const USAGE: &str = "\
Usage: textmatch [OPTIONS] <TARGET> <REFERENCE>...

Compare TARGET against one or more REFERENCE documents and print a JSON
overlap report.

Options:
  --fuzzy              Use fuzzy (edit-distance) matching instead of exact
  --no-align           Skip Smith-Waterman refinement of match blocks
  --expansion <N>      Alignment window expansion in words (default 1)
  --cache-dir <DIR>    Cache reference tokenizations under DIR
  --config <FILE>      Load engine configuration from a YAML file
";

struct CliArgs {
    target: PathBuf,
    references: Vec<PathBuf>,
    options: CompareOptions,
    config: EngineConfig,
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut options = CompareOptions::default();
    let mut config = EngineConfig::default();
    let mut positional: Vec<PathBuf> = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--fuzzy" => options.mode = MatchMode::Fuzzy,
            "--no-align" => options.use_alignment = false,
            "--expansion" => {
                let value = args.next().ok_or("--expansion requires a value")?;
                options.expansion = value
                    .parse()
                    .map_err(|_| format!("invalid --expansion value: {value}"))?;
            }
            "--cache-dir" => {
                let value = args.next().ok_or("--cache-dir requires a value")?;
                config.cache_dir = Some(PathBuf::from(value));
            }
            "--config" => {
                let value = args.next().ok_or("--config requires a value")?;
                let cache_dir = config.cache_dir.take();
                config = EngineConfig::from_yaml_file(&value)
                    .map_err(|err| format!("cannot load {value}: {err}"))?;
                // A --cache-dir given before --config still wins.
                if cache_dir.is_some() {
                    config.cache_dir = cache_dir;
                }
            }
            "--help" | "-h" => return Err(String::new()),
            other if other.starts_with('-') => {
                return Err(format!("unknown option: {other}"));
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    if positional.len() < 2 {
        return Err("expected a target and at least one reference".into());
    }
    let target = positional.remove(0);
    Ok(CliArgs {
        target,
        references: positional,
        options,
        config,
    })
}

#[derive(Serialize)]
struct SourceReport {
    path: String,
    covered_words: usize,
    percent: f64,
}

#[derive(Serialize)]
struct Report {
    total_words: usize,
    total_shingles: usize,
    reference_files: usize,
    skipped: Vec<SkippedFile>,
    pages_with_matches: usize,
    sources: Vec<SourceReport>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            if !message.is_empty() {
                eprintln!("error: {message}\n");
            }
            eprint!("{USAGE}");
            process::exit(2);
        }
    };

    let mut engine = Comparator::new(args.config)?;

    let summary = engine.add_references(
        &args.references,
        Some(&mut |done, total| eprintln!("indexed {done}/{total} references")),
    );
    for skipped in &summary.skipped {
        eprintln!("warning: skipped {}: {}", skipped.path, skipped.reason);
    }

    let outcome = engine.compare_document(
        &args.target,
        &args.options,
        Some(&mut |percent, message| eprintln!("[{percent:>3}%] {message}")),
    )?;

    let mut sources: Vec<SourceReport> = outcome
        .coverage_by_source
        .iter()
        .map(|(path, &covered_words)| SourceReport {
            path: path.clone(),
            covered_words,
            percent: outcome.coverage_percent(path),
        })
        .collect();
    sources.sort_by(|a, b| b.covered_words.cmp(&a.covered_words));

    let stats = engine.stats();
    let report = Report {
        total_words: outcome.total_word_count,
        total_shingles: stats.total_shingles,
        reference_files: stats.reference_file_count,
        skipped: summary.skipped,
        pages_with_matches: outcome.highlights_by_page.len(),
        sources,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
