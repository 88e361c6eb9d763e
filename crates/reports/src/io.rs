// Copyright 2025 Gateway Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Writing report files to an output directory.

use crate::{html, markdown};
use gateway_bench_core::{BaselineRegistry, RunOutput};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default HTML report filename.
pub const HTML_REPORT_FILE: &str = "benchmark_comparison_report.html";

/// Default markdown summary filename.
pub const MARKDOWN_SUMMARY_FILE: &str = "benchmark_summary.md";

/// Combined JSON output filename.
pub const JSON_RESULTS_FILE: &str = "all_results.json";

/// Paths of the files one report run produced.
#[derive(Debug, Clone, Default)]
pub struct ReportPaths {
    /// The HTML report, when written.
    pub html: Option<PathBuf>,
    /// The markdown summary, when written.
    pub markdown: Option<PathBuf>,
    /// The combined JSON output, when written.
    pub json: Option<PathBuf>,
}

/// Which formats to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Markdown summary only.
    Markdown,
    /// HTML report only.
    Html,
    /// Both renderers plus the combined JSON document.
    Both,
}

/// Render and write reports for a run into `dir`.
///
/// Creates the directory if needed. The combined JSON document (the raw
/// [`RunOutput`]) is written alongside `Both`-format reports so downstream
/// tooling can consume the run without re-parsing the rendered files.
pub fn write_reports(
    dir: impl AsRef<Path>,
    output: &RunOutput,
    registry: &BaselineRegistry,
    format: ReportFormat,
) -> io::Result<ReportPaths> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut paths = ReportPaths::default();

    if matches!(format, ReportFormat::Markdown | ReportFormat::Both) {
        let path = dir.join(MARKDOWN_SUMMARY_FILE);
        fs::write(&path, markdown::render_summary(output, registry))?;
        tracing::info!(path = %path.display(), "wrote markdown summary");
        paths.markdown = Some(path);
    }

    if matches!(format, ReportFormat::Html | ReportFormat::Both) {
        let path = dir.join(HTML_REPORT_FILE);
        fs::write(&path, html::render_report(output, registry))?;
        tracing::info!(path = %path.display(), "wrote html report");
        paths.html = Some(path);
    }

    if format == ReportFormat::Both {
        let path = dir.join(JSON_RESULTS_FILE);
        let json = serde_json::to_string_pretty(output)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        fs::write(&path, json)?;
        paths.json = Some(path);
    }

    Ok(paths)
}
