// Copyright 2025 Gateway Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! CI-facing scan summary output.
//!
//! The `updated=`/`changes=` line format is consumed by the workflow that
//! opens review issues for proposed baseline changes.

use crate::scanner::ScanReport;
use std::fmt::Write;

/// Render the machine-readable scan summary.
pub fn render_scan_summary(report: &ScanReport) -> String {
    let mut out = String::new();
    writeln!(out, "updated={}", report.has_updates()).unwrap();

    if report.candidates.is_empty() {
        writeln!(out, "changes=No baseline changes detected").unwrap();
        return out;
    }

    let lines: Vec<String> = report
        .candidates
        .iter()
        .map(|c| {
            let system = c.system.as_deref().unwrap_or("multiple systems");
            format!(
                "- {}: {} (source: {}, confidence: {:.2})",
                system, c.evidence, c.source, c.confidence
            )
        })
        .collect();
    writeln!(out, "changes={}", lines.join("\\n")).unwrap();
    out
}

/// Render the human-readable apply log for a scan.
///
/// One `system: metric old -> proposed` line per candidate that resolved a
/// metric. Scans never have a confirmed new number, so the proposed side
/// reads `pending review`.
pub fn render_apply_log(report: &ScanReport) -> String {
    let mut out = String::new();
    for c in &report.candidates {
        let (Some(system), Some(metric)) = (&c.system, &c.metric) else {
            continue;
        };
        match c.old_value {
            Some(old) => {
                writeln!(out, "{system}: {metric} {old} -> pending review").unwrap()
            }
            None => writeln!(out, "{system}: {metric} unknown -> pending review").unwrap(),
        }
    }
    if out.is_empty() {
        out.push_str("no metric-level changes to apply\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::UpdateCandidate;

    #[test]
    fn empty_report_says_no_changes() {
        let report = ScanReport::default();
        let summary = render_scan_summary(&report);
        assert!(summary.contains("updated=false"));
        assert!(summary.contains("changes=No baseline changes detected"));
    }

    #[test]
    fn candidates_are_listed_with_provenance() {
        let report = ScanReport {
            candidates: vec![UpdateCandidate {
                system: Some("nginx".to_string()),
                metric: Some("qps".to_string()),
                old_value: Some(125000.0),
                evidence: "performance-related post: Tuning NGINX throughput".to_string(),
                source: "NGINX Blog".to_string(),
                confidence: 0.3,
            }],
            notes: Vec::new(),
        };
        let summary = render_scan_summary(&report);
        assert!(summary.contains("updated=true"));
        assert!(summary.contains("- nginx: performance-related post"));
        assert!(summary.contains("confidence: 0.30"));
    }

    #[test]
    fn apply_log_lists_metric_level_changes() {
        let report = ScanReport {
            candidates: vec![
                UpdateCandidate {
                    system: Some("nginx".to_string()),
                    metric: Some("qps".to_string()),
                    old_value: Some(125000.0),
                    evidence: "performance-related post: Tuning NGINX throughput".to_string(),
                    source: "NGINX Blog".to_string(),
                    confidence: 0.3,
                },
                UpdateCandidate {
                    system: None,
                    metric: None,
                    old_value: None,
                    evidence: "published dataset changed since last scan".to_string(),
                    source: "TechEmpower Framework Benchmarks".to_string(),
                    confidence: 0.2,
                },
            ],
            notes: Vec::new(),
        };
        let log = render_apply_log(&report);
        assert_eq!(log, "nginx: qps 125000 -> pending review\n");
    }

    #[test]
    fn apply_log_handles_empty_scan() {
        let report = ScanReport::default();
        assert_eq!(render_apply_log(&report), "no metric-level changes to apply\n");
    }
}
