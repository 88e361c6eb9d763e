// Copyright 2025 Gateway Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Markdown summary generation.

use crate::mean_of;
use gateway_bench_core::{BaselineRegistry, RunOutput};
use std::fmt::Write;

/// Generate the markdown summary for one comparison run.
///
/// An empty run produces a distinct "No results found." document rather
/// than an empty table.
pub fn render_summary(output: &RunOutput, registry: &BaselineRegistry) -> String {
    let mut md = String::new();

    writeln!(md, "# Gateway Benchmark Results").unwrap();
    writeln!(md).unwrap();
    writeln!(md, "Generated: {}", chrono::Utc::now().to_rfc3339()).unwrap();
    writeln!(md).unwrap();

    if output.is_empty() {
        writeln!(md, "No results found.").unwrap();
        append_failures(&mut md, output);
        return md;
    }

    writeln!(md, "## Executive Summary").unwrap();
    writeln!(md).unwrap();
    if let Some(p95) = mean_of(output, |r| r.p95_ms) {
        writeln!(md, "- **Average p95 Latency**: {p95:.2}ms").unwrap();
    }
    if let Some(qps) = mean_of(output, |r| r.qps) {
        writeln!(md, "- **Average Throughput**: {qps:.0} QPS").unwrap();
    }
    writeln!(md, "- **Test Scenarios**: {}", output.results.len()).unwrap();
    writeln!(md).unwrap();

    writeln!(md, "## Detailed Results").unwrap();
    writeln!(md).unwrap();
    writeln!(
        md,
        "| Test Scenario | p50 (ms) | p95 (ms) | p99 (ms) | QPS | Success Rate |"
    )
    .unwrap();
    writeln!(
        md,
        "|---------------|----------|----------|----------|-----|--------------|"
    )
    .unwrap();
    for (name, record) in &output.results {
        writeln!(
            md,
            "| {} | {:.2} | {:.2} | {:.2} | {:.0} | {:.1}% |",
            name, record.p50_ms, record.p95_ms, record.p99_ms, record.qps, record.success_rate
        )
        .unwrap();
    }
    writeln!(md).unwrap();

    if !output.comparisons.is_empty() {
        writeln!(md, "## Baseline Comparisons").unwrap();
        writeln!(md).unwrap();
        writeln!(md, "| Test | Baseline | p95 | QPS |").unwrap();
        writeln!(md, "|------|----------|-----|-----|").unwrap();
        for (name, cmp) in &output.comparisons {
            let baseline = if cmp.approximate {
                format!(
                    "{}/{} (approximate baseline)",
                    cmp.baseline_system, cmp.baseline_scenario
                )
            } else {
                format!("{}/{}", cmp.baseline_system, cmp.baseline_scenario)
            };
            let p95 = cmp
                .verdicts
                .get("p95_ms")
                .map(|v| v.display_text.as_str())
                .unwrap_or("N/A");
            let qps = cmp
                .verdicts
                .get("qps")
                .map(|v| v.display_text.as_str())
                .unwrap_or("N/A");
            writeln!(md, "| {name} | {baseline} | {p95} | {qps} |").unwrap();
        }
        writeln!(md).unwrap();
    }

    writeln!(md, "## Baseline Sources").unwrap();
    writeln!(md).unwrap();
    for entry in registry.entries() {
        writeln!(
            md,
            "- **{}**: {} ({})",
            entry.system_name.to_uppercase(),
            entry.source_citation,
            entry.measured_date
        )
        .unwrap();
    }

    append_failures(&mut md, output);
    md
}

fn append_failures(md: &mut String, output: &RunOutput) {
    if output.failures.is_empty() {
        return;
    }
    writeln!(md).unwrap();
    writeln!(md, "## Skipped Documents").unwrap();
    writeln!(md).unwrap();
    for failure in &output.failures {
        writeln!(md, "- `{}`: {}", failure.file, failure.message).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway_bench_core::run::FailureRecord;
    use gateway_bench_core::{ComparisonRun, MetricRecord};
    use std::collections::BTreeMap;

    fn registry() -> BaselineRegistry {
        BaselineRegistry::builtin().unwrap()
    }

    #[test]
    fn empty_run_reports_no_results() {
        let output = RunOutput::default();
        let md = render_summary(&output, &registry());
        assert!(md.contains("No results found."));
        assert!(!md.contains("Executive Summary"));
    }

    #[test]
    fn summary_includes_results_and_sources() {
        let mut results = BTreeMap::new();
        results.insert(
            "http_latency_test".to_string(),
            MetricRecord {
                p50_ms: 0.7,
                p95_ms: 1.9,
                p99_ms: 3.8,
                qps: 130000.0,
                success_rate: 100.0,
                ..Default::default()
            },
        );
        let output = RunOutput {
            results,
            ..Default::default()
        };
        let md = render_summary(&output, &registry());
        assert!(md.contains("| http_latency_test | 0.70 | 1.90 | 3.80 | 130000 | 100.0% |"));
        assert!(md.contains("**NGINX**: TechEmpower Round 23"));
        assert!(md.contains("**Test Scenarios**: 1"));
    }

    #[test]
    fn approximate_baselines_are_annotated() {
        let dir = tempfile::tempdir().unwrap();
        let doc = serde_json::json!({
            "ActualQPS": 40000.0,
            "RequestedTotal": 1000,
            "DurationHistogram": {
                "Percentiles": [{"Percentile": 95, "Value": 0.004}]
            }
        });
        std::fs::write(dir.path().join("mcp_stress.json"), doc.to_string()).unwrap();
        let reg = registry();
        let output = ComparisonRun::new(&reg).execute(dir.path()).unwrap();
        let md = render_summary(&output, &reg);
        assert!(md.contains("envoy/http_proxy (approximate baseline)"));
    }

    #[test]
    fn failures_are_listed() {
        let output = RunOutput {
            failures: vec![FailureRecord {
                file: "broken.json".to_string(),
                message: "missing DurationHistogram object".to_string(),
            }],
            ..Default::default()
        };
        let md = render_summary(&output, &registry());
        assert!(md.contains("Skipped Documents"));
        assert!(md.contains("`broken.json`"));
    }
}
