//! CLI for gateway-bench.
//!
//! This crate wires argument parsing and file placement around the core
//! comparison engine: `report` runs the normalize/match/compare pipeline
//! and writes rendered reports, `baselines` inspects the registry, and
//! `watch` polls external sources for update candidates.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use gateway_bench_core::{BaselineRegistry, ComparisonRun};
use gateway_bench_reports::io::{write_reports, ReportFormat};
use gateway_bench_watcher::{
    attach_current_values, default_sources, render_apply_log, render_scan_summary,
    sources_for_registry, ScanState, Scanner,
};
use std::path::PathBuf;

/// gateway-bench CLI.
#[derive(Parser, Debug)]
#[command(name = "gateway-bench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format selection for the `report` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Markdown summary only.
    Md,
    /// HTML report only.
    Html,
    /// Both, plus the combined JSON document.
    Both,
}

impl From<Format> for ReportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Md => ReportFormat::Markdown,
            Format::Html => ReportFormat::Html,
            Format::Both => ReportFormat::Both,
        }
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize raw results and write baseline comparison reports.
    Report {
        /// Directory containing raw Fortio JSON results.
        results_dir: PathBuf,

        /// Baseline table file; the built-in published table when omitted.
        #[arg(short, long)]
        baselines: Option<PathBuf>,

        /// Directory to write report files into.
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Output format.
        #[arg(short, long, value_enum, default_value = "both")]
        format: Format,
    },

    /// List the registered baseline systems with provenance.
    Baselines {
        /// Baseline table file; the built-in published table when omitted.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Poll external sources for baseline update candidates.
    Watch {
        /// Baseline table file; restricts which sources are polled.
        #[arg(short, long)]
        baselines: Option<PathBuf>,

        /// Scan state file for cross-run payload digests.
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// Print a per-metric apply log alongside the summary.
        #[arg(long)]
        apply_log: bool,
    },
}

fn load_registry(file: Option<&PathBuf>) -> anyhow::Result<BaselineRegistry> {
    match file {
        Some(path) => BaselineRegistry::load_from_file(path)
            .with_context(|| format!("loading baseline table {}", path.display())),
        None => BaselineRegistry::builtin().context("loading built-in baseline table"),
    }
}

/// Run the CLI with the process arguments.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            results_dir,
            baselines,
            output_dir,
            format,
        } => {
            let registry = load_registry(baselines.as_ref())?;
            let output = ComparisonRun::new(&registry)
                .execute(&results_dir)
                .with_context(|| format!("processing results in {}", results_dir.display()))?;

            for failure in &output.failures {
                eprintln!("skipped {}: {}", failure.file, failure.message);
            }

            if output.is_empty() {
                bail!("no results found in {}", results_dir.display());
            }

            let paths = write_reports(&output_dir, &output, &registry, format.into())?;
            println!(
                "Processed {} results ({} compared, {} skipped)",
                output.results.len(),
                output.comparisons.len(),
                output.failures.len()
            );
            for path in [paths.html, paths.markdown, paths.json].into_iter().flatten() {
                println!("  wrote {}", path.display());
            }
            Ok(())
        }

        Commands::Baselines { file } => {
            let registry = load_registry(file.as_ref())?;
            for entry in registry.entries() {
                println!(
                    "{}: {} ({})",
                    entry.system_name, entry.source_citation, entry.measured_date
                );
                println!("  url: {}", entry.source_url);
                println!("  hardware: {}", entry.hardware_description);
                for (name, scenario) in &entry.scenarios {
                    println!(
                        "  scenario {}: p95 {:.1}ms, {:.0} qps",
                        name, scenario.metrics.p95_ms, scenario.metrics.qps
                    );
                }
            }
            Ok(())
        }

        Commands::Watch {
            baselines,
            state,
            apply_log,
        } => {
            let registry = load_registry(baselines.as_ref())?;
            let sources = sources_for_registry(&registry, default_sources());

            let scan_state = match &state {
                Some(path) => ScanState::load(path)
                    .with_context(|| format!("loading scan state {}", path.display()))?,
                None => ScanState::default(),
            };

            let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
            let mut scanner =
                Scanner::with_state(scan_state).context("building http client")?;
            let mut report = runtime.block_on(scanner.check_all(&sources));
            attach_current_values(&mut report, &registry);

            if let Some(path) = &state {
                scanner
                    .into_state()
                    .save(path)
                    .with_context(|| format!("saving scan state {}", path.display()))?;
            }

            print!("{}", render_scan_summary(&report));
            if apply_log {
                print!("{}", render_apply_log(&report));
            }
            for note in &report.notes {
                eprintln!("{}: {}", note.source, note.note);
            }
            Ok(())
        }
    }
}
