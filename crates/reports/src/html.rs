// Copyright 2025 Gateway Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTML comparison report generation.
//!
//! Produces a single self-contained page: executive summary cards, the
//! detailed baseline comparison table, per-protocol sections, baseline
//! provenance, and recommendations. Verdict styling relies on the
//! better/worse/neutral CSS classes.

use crate::mean_of;
use gateway_bench_core::{BaselineRegistry, Classification, ComparisonVerdict, RunOutput};
use std::fmt::Write;

const STYLE: &str = r#"
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 40px; }
        .header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 30px; border-radius: 10px; margin-bottom: 30px; }
        .metric-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); gap: 20px; margin: 20px 0; }
        .metric-card { background: #f8f9fa; border: 1px solid #e9ecef; border-radius: 8px; padding: 20px; }
        .metric-value { font-size: 2em; font-weight: bold; color: #495057; }
        .metric-label { color: #6c757d; font-size: 0.9em; margin-bottom: 5px; }
        .comparison-table { width: 100%; border-collapse: collapse; margin: 20px 0; }
        .comparison-table th, .comparison-table td { padding: 12px; text-align: left; border-bottom: 1px solid #ddd; }
        .comparison-table th { background-color: #f8f9fa; font-weight: 600; }
        .better { color: #28a745; font-weight: bold; }
        .worse { color: #dc3545; font-weight: bold; }
        .neutral { color: #6c757d; }
        .approx { color: #856404; font-size: 0.85em; }
        .baseline-info { background: #e3f2fd; border-left: 4px solid #2196f3; padding: 15px; margin: 10px 0; }
        .chart-container { margin: 30px 0; padding: 20px; background: white; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
"#;

fn verdict_class(classification: Classification) -> &'static str {
    match classification {
        Classification::Better => "better",
        Classification::Worse => "worse",
        Classification::Neutral | Classification::NotApplicable => "neutral",
    }
}

/// Render the full HTML comparison report.
pub fn render_report(output: &RunOutput, registry: &BaselineRegistry) -> String {
    let mut html = String::new();

    writeln!(html, "<!DOCTYPE html>").unwrap();
    writeln!(html, "<html lang=\"en\">").unwrap();
    writeln!(html, "<head>").unwrap();
    writeln!(html, "    <meta charset=\"UTF-8\">").unwrap();
    writeln!(html, "    <title>Gateway Benchmark Comparison Report</title>").unwrap();
    writeln!(html, "    <style>{STYLE}    </style>").unwrap();
    writeln!(html, "</head>").unwrap();
    writeln!(html, "<body>").unwrap();
    writeln!(html, "    <div class=\"header\">").unwrap();
    writeln!(html, "        <h1>Gateway Benchmark Comparison Report</h1>").unwrap();
    writeln!(
        html,
        "        <p>Generated on {}</p>",
        chrono::Utc::now().to_rfc3339()
    )
    .unwrap();
    writeln!(
        html,
        "        <p>Comparing gateway performance against industry-standard proxies</p>"
    )
    .unwrap();
    writeln!(html, "    </div>").unwrap();

    summary_section(&mut html, output);
    comparison_section(&mut html, output, registry);
    protocol_sections(&mut html, output);
    baseline_section(&mut html, registry);
    recommendations_section(&mut html, output);

    writeln!(html, "</body>").unwrap();
    writeln!(html, "</html>").unwrap();
    html
}

fn summary_section(html: &mut String, output: &RunOutput) {
    if output.is_empty() {
        writeln!(
            html,
            "    <div class=\"metric-card\"><h2>No results found</h2></div>"
        )
        .unwrap();
        return;
    }

    writeln!(html, "    <div class=\"metric-grid\">").unwrap();
    let cards = [
        (
            "Average p95 Latency",
            mean_of(output, |r| r.p95_ms).map(|v| format!("{v:.2}ms")),
        ),
        (
            "Average Throughput",
            mean_of(output, |r| r.qps).map(|v| format!("{v:.0} QPS")),
        ),
        (
            "Success Rate",
            mean_of(output, |r| r.success_rate).map(|v| format!("{v:.1}%")),
        ),
        (
            "Test Scenarios",
            Some(output.results.len().to_string()),
        ),
    ];
    for (label, value) in cards {
        let value = value.unwrap_or_else(|| "N/A".to_string());
        writeln!(html, "        <div class=\"metric-card\">").unwrap();
        writeln!(html, "            <div class=\"metric-label\">{label}</div>").unwrap();
        writeln!(html, "            <div class=\"metric-value\">{value}</div>").unwrap();
        writeln!(html, "        </div>").unwrap();
    }
    writeln!(html, "    </div>").unwrap();
}

fn comparison_section(html: &mut String, output: &RunOutput, registry: &BaselineRegistry) {
    if output.comparisons.is_empty() {
        if !output.is_empty() {
            writeln!(
                html,
                "    <div class=\"metric-card\"><h2>No comparable baselines found</h2></div>"
            )
            .unwrap();
        }
        return;
    }

    writeln!(html, "    <div class=\"chart-container\">").unwrap();
    writeln!(html, "        <h2>Detailed Performance Comparison</h2>").unwrap();
    writeln!(html, "        <table class=\"comparison-table\">").unwrap();
    writeln!(html, "            <thead><tr>").unwrap();
    for header in [
        "Test Scenario",
        "Baseline",
        "Measured p95",
        "Baseline p95",
        "Latency Comparison",
        "Measured QPS",
        "Baseline QPS",
        "Throughput Comparison",
    ] {
        writeln!(html, "                <th>{header}</th>").unwrap();
    }
    writeln!(html, "            </tr></thead>").unwrap();
    writeln!(html, "            <tbody>").unwrap();

    for (name, cmp) in &output.comparisons {
        // A comparison without a matching result record has no measured
        // values to print; drop the row rather than panic.
        let Some(record) = output.results.get(name) else {
            continue;
        };
        let baseline = registry
            .scenario(&cmp.baseline_system, &cmp.baseline_scenario)
            .cloned()
            .unwrap_or_default();
        let baseline_label = if cmp.approximate {
            format!(
                "{} <span class=\"approx\">(approximate baseline)</span>",
                cmp.baseline_system
            )
        } else {
            cmp.baseline_system.clone()
        };
        let fallback = ComparisonVerdict {
            classification: Classification::NotApplicable,
            delta_percent: 0.0,
            display_text: "N/A".to_string(),
        };
        let p95 = cmp.verdicts.get("p95_ms").unwrap_or(&fallback);
        let qps = cmp.verdicts.get("qps").unwrap_or(&fallback);
        writeln!(html, "                <tr>").unwrap();
        writeln!(html, "                    <td>{name}</td>").unwrap();
        writeln!(html, "                    <td>{baseline_label}</td>").unwrap();
        writeln!(html, "                    <td>{:.2}ms</td>", record.p95_ms).unwrap();
        writeln!(html, "                    <td>{:.2}ms</td>", baseline.p95_ms).unwrap();
        writeln!(
            html,
            "                    <td class=\"{}\">{}</td>",
            verdict_class(p95.classification),
            p95.display_text
        )
        .unwrap();
        writeln!(html, "                    <td>{:.0}</td>", record.qps).unwrap();
        writeln!(html, "                    <td>{:.0}</td>", baseline.qps).unwrap();
        writeln!(
            html,
            "                    <td class=\"{}\">{}</td>",
            verdict_class(qps.classification),
            qps.display_text
        )
        .unwrap();
        writeln!(html, "                </tr>").unwrap();
    }
    writeln!(html, "            </tbody>").unwrap();
    writeln!(html, "        </table>").unwrap();
    writeln!(html, "    </div>").unwrap();
}

fn protocol_sections(html: &mut String, output: &RunOutput) {
    for (title, keyword) in [
        ("HTTP Proxy", "http"),
        ("MCP Protocol", "mcp"),
        ("A2A Protocol", "a2a"),
    ] {
        let group: Vec<(&String, &gateway_bench_core::MetricRecord)> = output
            .results
            .iter()
            .filter(|(name, _)| name.to_lowercase().contains(keyword))
            .collect();
        if group.is_empty() {
            continue;
        }

        writeln!(html, "    <div class=\"chart-container\">").unwrap();
        writeln!(html, "        <h2>{title} Performance Analysis</h2>").unwrap();
        writeln!(html, "        <table class=\"comparison-table\">").unwrap();
        writeln!(
            html,
            "            <thead><tr><th>Test</th><th>p50</th><th>p95</th><th>p99</th><th>QPS</th><th>Success Rate</th></tr></thead>"
        )
        .unwrap();
        writeln!(html, "            <tbody>").unwrap();
        for (name, record) in group {
            writeln!(
                html,
                "                <tr><td>{}</td><td>{:.2}ms</td><td>{:.2}ms</td><td>{:.2}ms</td><td>{:.0}</td><td>{:.1}%</td></tr>",
                name, record.p50_ms, record.p95_ms, record.p99_ms, record.qps, record.success_rate
            )
            .unwrap();
        }
        writeln!(html, "            </tbody>").unwrap();
        writeln!(html, "        </table>").unwrap();
        writeln!(html, "    </div>").unwrap();
    }
}

fn baseline_section(html: &mut String, registry: &BaselineRegistry) {
    writeln!(html, "    <div class=\"chart-container\">").unwrap();
    writeln!(html, "        <h2>Baseline Information</h2>").unwrap();
    writeln!(
        html,
        "        <p>Performance comparisons are based on published results from industry-standard benchmarks:</p>"
    )
    .unwrap();
    for entry in registry.entries() {
        writeln!(html, "        <div class=\"baseline-info\">").unwrap();
        writeln!(
            html,
            "            <h4>{}</h4>",
            entry.system_name.to_uppercase()
        )
        .unwrap();
        writeln!(
            html,
            "            <p><strong>Source:</strong> {} (<a href=\"{}\" target=\"_blank\">link</a>)</p>",
            entry.source_citation, entry.source_url
        )
        .unwrap();
        writeln!(
            html,
            "            <p><strong>Test Date:</strong> {}</p>",
            entry.measured_date
        )
        .unwrap();
        writeln!(
            html,
            "            <p><strong>Hardware:</strong> {}</p>",
            entry.hardware_description
        )
        .unwrap();
        writeln!(html, "        </div>").unwrap();
    }
    writeln!(html, "    </div>").unwrap();
}

fn recommendations_section(html: &mut String, output: &RunOutput) {
    let mut recommendations = Vec::new();

    if !output.is_empty() {
        let high_latency: Vec<&str> = output
            .results
            .iter()
            .filter(|(_, r)| r.p95_ms > 10.0)
            .map(|(n, _)| n.as_str())
            .collect();
        let low_throughput: Vec<&str> = output
            .results
            .iter()
            .filter(|(_, r)| r.qps > 0.0 && r.qps < 1000.0)
            .map(|(n, _)| n.as_str())
            .collect();

        if !high_latency.is_empty() {
            recommendations.push(format!(
                "High latency detected in: {}. Consider optimizing connection pooling and reducing processing overhead.",
                high_latency[..high_latency.len().min(3)].join(", ")
            ));
        }
        if !low_throughput.is_empty() {
            recommendations.push(format!(
                "Low throughput in: {}. Consider increasing worker threads and optimizing async operations.",
                low_throughput[..low_throughput.len().min(3)].join(", ")
            ));
        }
        if high_latency.is_empty() && low_throughput.is_empty() {
            recommendations
                .push("Performance looks good across all test scenarios.".to_string());
        }
    }

    if recommendations.is_empty() {
        recommendations
            .push("Run more comprehensive tests to generate specific recommendations.".to_string());
    }

    writeln!(html, "    <div class=\"chart-container\">").unwrap();
    writeln!(html, "        <h2>Performance Recommendations</h2>").unwrap();
    writeln!(html, "        <ul>").unwrap();
    for rec in recommendations {
        writeln!(html, "            <li>{rec}</li>").unwrap();
    }
    writeln!(html, "        </ul>").unwrap();
    writeln!(html, "    </div>").unwrap();
}
