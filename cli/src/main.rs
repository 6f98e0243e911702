//! obligo: extract regulatory obligations from plain-text documents.
//!
//! Usage:
//!   obligo extract pdpa.txt
//!   obligo extract pdpa.txt --rules rules/pdpa.toml --format table
//!   obligo rules --format json
//!   obligo check-rules rules/pdpa.toml
//!   obligo report pdpa.txt --tasks board.json
//!
//! `OBLIGO_RULES` may name a rule pack instead of `--rules`. Set
//! `RUST_LOG=debug` for per-record logging.

mod input;
mod output;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use obligo_contracts::error::{ObligoError, ObligoResult};
use obligo_core::{ExtractionMode, Extractor};
use obligo_report::{ReportBuilder, TaskOverlay};
use obligo_rules::{validate_rules, RulePack, RuleSet, DEFAULT_RULES};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Deterministic obligation extraction for regulatory text.
#[derive(Parser)]
#[command(
    name = "obligo",
    about = "Extract obligations from regulatory documents",
    long_about = "Splits a plain-text regulation into sentences, keeps the ones that read as\n\
                  obligations, and rates each one by severity and risk score."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract obligation records from a document.
    Extract {
        /// Plain-text document (UTF-8, or Latin-1 as a fallback).
        file: PathBuf,
        /// Rule pack (.toml or .json). Without one, the defaults apply with
        /// heuristic fallbacks.
        #[arg(long, env = "OBLIGO_RULES")]
        rules: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = RecordFormat::Json)]
        format: RecordFormat,
    },
    /// Print the built-in default rule set.
    Rules {
        #[arg(long, value_enum, default_value_t = PackFormat::Toml)]
        format: PackFormat,
    },
    /// Load a rule pack and report problems with its rules.
    CheckRules {
        pack: PathBuf,
    },
    /// Build a full extraction report as JSON.
    Report {
        file: PathBuf,
        #[arg(long, env = "OBLIGO_RULES")]
        rules: Option<PathBuf>,
        /// Reviewer task board (JSON with `columns` and `steps`).
        #[arg(long)]
        tasks: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RecordFormat {
    Json,
    Table,
}

#[derive(Clone, Copy, ValueEnum)]
enum PackFormat {
    Toml,
    Json,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Extract { file, rules, format } => run_extract(&file, rules.as_deref(), format),
        Command::Rules { format } => run_rules(format),
        Command::CheckRules { pack } => run_check_rules(&pack),
        Command::Report { file, rules, tasks } => run_report(&file, rules.as_deref(), tasks.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("obligo error: {}", e);
        std::process::exit(1);
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// A supplied pack runs strict unless it is structurally the default set.
fn extractor_for(rules: Option<&RuleSet>) -> Extractor<'_> {
    match rules {
        Some(set) => Extractor::new(set, ExtractionMode::for_rules(set)),
        None => Extractor::heuristic(),
    }
}

fn run_extract(file: &Path, rules: Option<&Path>, format: RecordFormat) -> ObligoResult<()> {
    let text = input::read_document(file)?;
    let rules = input::load_rules(rules)?;

    let (records, stats) = extractor_for(rules.as_ref()).extract_with_stats(&text);
    info!(
        file = %file.display(),
        sentences = stats.sentences,
        records = records.len(),
        "extract finished"
    );

    match format {
        RecordFormat::Json => println!("{}", to_json(&records)?),
        RecordFormat::Table => print!("{}", output::records_table(&records)),
    }
    Ok(())
}

fn run_rules(format: PackFormat) -> ObligoResult<()> {
    let pack = RulePack::from(&*DEFAULT_RULES);
    match format {
        PackFormat::Toml => print!("{}", pack.to_toml_string()?),
        PackFormat::Json => println!("{}", to_json(&pack)?),
    }
    Ok(())
}

fn run_check_rules(path: &Path) -> ObligoResult<()> {
    let pack = RulePack::from_file(path)?;
    let issues = validate_rules(&pack.rules);

    println!("{}: {} rule(s)", path.display(), pack.rules.len());
    print!("{}", output::issues_list(&issues));
    let is_default = pack.into_rule_set().is_default();
    println!(
        "matches built-in defaults: {}",
        if is_default { "yes (heuristic mode)" } else { "no (strict mode)" }
    );
    Ok(())
}

fn run_report(file: &Path, rules: Option<&Path>, tasks: Option<&Path>) -> ObligoResult<()> {
    let text = input::read_document(file)?;
    let rules = input::load_rules(rules)?;
    let extractor = extractor_for(rules.as_ref());
    let records = extractor.extract(&text);

    let source_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    let mut builder = ReportBuilder::new(source_name, &text, records, extractor);
    if let Some(tasks) = tasks {
        let json = std::fs::read_to_string(tasks).map_err(|e| ObligoError::Io {
            path: tasks.display().to_string(),
            reason: e.to_string(),
        })?;
        builder = builder.with_overlay(TaskOverlay::from_json_str(&json)?);
    }

    println!("{}", builder.build()?.to_json_pretty()?);
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> ObligoResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| ObligoError::SerializationError {
        reason: e.to_string(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
