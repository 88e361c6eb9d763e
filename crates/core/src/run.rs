// Copyright 2025 Gateway Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! The end-to-end comparison pipeline.
//!
//! Normalizes a directory of raw results, matches each test to a baseline,
//! and compares the metrics both sides publish. The output is the contract
//! consumed by the report renderers.

use crate::baseline::BaselineRegistry;
use crate::compare::{compare_records, ComparisonVerdict};
use crate::error::Result;
use crate::matcher::BaselineMatcher;
use crate::metrics::MetricRecord;
use crate::normalize::{load_results_dir, NormalizeFailure};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Baseline identity and per-metric verdicts for one test run.
#[derive(Debug, Clone, Serialize)]
pub struct TestComparison {
    /// System the baseline came from.
    pub baseline_system: String,
    /// Scenario the baseline numbers were published under.
    pub baseline_scenario: String,
    /// Whether the baseline only approximates the test's protocol.
    pub approximate: bool,
    /// Metric name to verdict.
    pub verdicts: BTreeMap<String, ComparisonVerdict>,
}

/// Everything one invocation produces for the renderers.
#[derive(Debug, Default, Serialize)]
pub struct RunOutput {
    /// Test name to normalized record.
    pub results: BTreeMap<String, MetricRecord>,
    /// Test name to its baseline comparison, for tests that matched one.
    pub comparisons: BTreeMap<String, TestComparison>,
    /// Documents that failed to normalize.
    pub failures: Vec<FailureRecord>,
}

/// A normalization failure in renderer-facing form.
#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord {
    /// File name of the failed document.
    pub file: String,
    /// Why it failed.
    pub message: String,
}

impl From<NormalizeFailure> for FailureRecord {
    fn from(f: NormalizeFailure) -> Self {
        Self {
            file: f.file,
            message: f.message,
        }
    }
}

impl RunOutput {
    /// Whether no document normalized successfully.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// One batch comparison run over a results directory.
pub struct ComparisonRun<'a> {
    registry: &'a BaselineRegistry,
}

impl<'a> ComparisonRun<'a> {
    /// Create a run against a loaded registry.
    pub fn new(registry: &'a BaselineRegistry) -> Self {
        Self { registry }
    }

    /// Normalize, match, and compare everything under `results_dir`.
    ///
    /// Per-document failures end up in [`RunOutput::failures`]; only a
    /// missing directory or unreadable registry aborts the run. Tests with
    /// no matching baseline appear in `results` but not in `comparisons`.
    pub fn execute(&self, results_dir: impl AsRef<Path>) -> Result<RunOutput> {
        let batch = load_results_dir(results_dir)?;
        let matcher = BaselineMatcher::new(self.registry);

        let mut output = RunOutput {
            failures: batch.failures.into_iter().map(FailureRecord::from).collect(),
            ..Default::default()
        };

        for (test_name, record) in batch.results {
            if let Some(m) = matcher.match_test(&test_name) {
                let verdicts = compare_records(&record, &m.record);
                tracing::debug!(
                    test = %test_name,
                    baseline = %m.system,
                    scenario = %m.scenario,
                    approximate = m.approximate,
                    "compared against baseline"
                );
                output.comparisons.insert(
                    test_name.clone(),
                    TestComparison {
                        baseline_system: m.system,
                        baseline_scenario: m.scenario,
                        approximate: m.approximate,
                        verdicts,
                    },
                );
            } else {
                tracing::debug!(test = %test_name, "no baseline rule fired");
            }
            output.results.insert(test_name, record);
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Classification;
    use serde_json::json;

    fn write_doc(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    fn fortio_body(p95_s: f64, qps: f64) -> String {
        json!({
            "ActualQPS": qps,
            "RequestedTotal": 10000,
            "DurationHistogram": {
                "Avg": p95_s * 0.6,
                "Percentiles": [
                    {"Percentile": 50, "Value": p95_s * 0.4},
                    {"Percentile": 95, "Value": p95_s},
                    {"Percentile": 99, "Value": p95_s * 1.8}
                ]
            }
        })
        .to_string()
    }

    #[test]
    fn end_to_end_with_one_malformed_document() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(dir.path(), "http_latency_test.json", &fortio_body(0.0018, 110000.0));
        write_doc(dir.path(), "mcp_stress.json", &fortio_body(0.0040, 42000.0));
        write_doc(dir.path(), "corrupt.json", "{{{");

        let registry = BaselineRegistry::builtin().unwrap();
        let output = ComparisonRun::new(&registry).execute(dir.path()).unwrap();

        assert_eq!(output.results.len(), 2);
        assert_eq!(output.failures.len(), 1);
        assert_eq!(output.failures[0].file, "corrupt.json");

        let http = &output.comparisons["http_latency_test"];
        assert_eq!(http.baseline_system, "nginx");
        assert_eq!(http.baseline_scenario, "plaintext");
        assert!(!http.approximate);
        // 1.8ms measured vs 2.1ms nginx plaintext p95.
        assert_eq!(
            http.verdicts["p95_ms"].classification,
            Classification::Better
        );

        let mcp = &output.comparisons["mcp_stress"];
        assert_eq!(mcp.baseline_system, "envoy");
        assert!(mcp.approximate);
    }

    #[test]
    fn unmatched_tests_keep_their_records() {
        let dir = tempfile::tempdir().unwrap();
        write_doc(dir.path(), "tcp_passthrough.json", &fortio_body(0.002, 90000.0));

        let registry = BaselineRegistry::builtin().unwrap();
        let output = ComparisonRun::new(&registry).execute(dir.path()).unwrap();

        assert!(output.results.contains_key("tcp_passthrough"));
        assert!(output.comparisons.is_empty());
    }

    #[test]
    fn empty_directory_yields_empty_output() {
        let dir = tempfile::tempdir().unwrap();
        let registry = BaselineRegistry::builtin().unwrap();
        let output = ComparisonRun::new(&registry).execute(dir.path()).unwrap();
        assert!(output.is_empty());
        assert!(output.failures.is_empty());
    }
}
