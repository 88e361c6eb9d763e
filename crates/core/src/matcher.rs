// Copyright 2025 Gateway Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Baseline selection for a named test run.
//!
//! Matching is a fixed, ordered rule list rather than fuzzy scoring: a
//! wrong baseline silently poisons a comparison, so a test name that fires
//! no rule gets no baseline at all. MCP and A2A traffic has no published
//! third-party baseline, so those rules borrow envoy's plain HTTP proxy
//! numbers and mark the match approximate; renderers must surface that
//! distinction.

use crate::baseline::BaselineRegistry;
use crate::metrics::MetricRecord;

/// One keyword rule: all keywords must appear in the lowercased test name.
#[derive(Debug, Clone, Copy)]
struct MatchRule {
    keywords: &'static [&'static str],
    system: &'static str,
    scenario: &'static str,
    approximate: bool,
}

/// Ordered rule table; first match wins.
const RULES: &[MatchRule] = &[
    MatchRule {
        keywords: &["http", "latency"],
        system: "nginx",
        scenario: "plaintext",
        approximate: false,
    },
    MatchRule {
        keywords: &["http", "throughput"],
        system: "nginx",
        scenario: "json",
        approximate: false,
    },
    MatchRule {
        keywords: &["mcp"],
        system: "envoy",
        scenario: "http_proxy",
        approximate: true,
    },
    MatchRule {
        keywords: &["a2a"],
        system: "envoy",
        scenario: "http_proxy",
        approximate: true,
    },
];

/// The baseline selected for a test run.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineMatch {
    /// System the baseline belongs to.
    pub system: String,
    /// Scenario the baseline numbers were published under.
    pub scenario: String,
    /// The published numbers.
    pub record: MetricRecord,
    /// Whether the baseline is only an approximation of the test's protocol.
    pub approximate: bool,
}

/// Selects the best-fit baseline scenario for a test name.
pub struct BaselineMatcher<'a> {
    registry: &'a BaselineRegistry,
}

impl<'a> BaselineMatcher<'a> {
    /// Create a matcher over a loaded registry.
    pub fn new(registry: &'a BaselineRegistry) -> Self {
        Self { registry }
    }

    /// Select a baseline for `test_name`, or `None` when no rule fires.
    ///
    /// Keyword tests are case-insensitive substring checks. A rule whose
    /// target scenario is absent from the registry is skipped, falling
    /// through to later rules.
    pub fn match_test(&self, test_name: &str) -> Option<BaselineMatch> {
        let name = test_name.to_lowercase();
        for rule in RULES {
            if !rule.keywords.iter().all(|kw| name.contains(kw)) {
                continue;
            }
            match self.registry.scenario(rule.system, rule.scenario) {
                Some(record) => {
                    return Some(BaselineMatch {
                        system: rule.system.to_string(),
                        scenario: rule.scenario.to_string(),
                        record: record.clone(),
                        approximate: rule.approximate,
                    });
                }
                None => {
                    tracing::debug!(
                        system = rule.system,
                        scenario = rule.scenario,
                        "matched rule has no registry scenario, skipping"
                    );
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_latency_maps_to_nginx_plaintext() {
        let registry = BaselineRegistry::builtin().unwrap();
        let matcher = BaselineMatcher::new(&registry);
        let m = matcher.match_test("http_latency_test").unwrap();
        assert_eq!(m.system, "nginx");
        assert_eq!(m.scenario, "plaintext");
        assert!(!m.approximate);
        assert_eq!(m.record.p95_ms, 2.1);
    }

    #[test]
    fn http_throughput_maps_to_nginx_json() {
        let registry = BaselineRegistry::builtin().unwrap();
        let matcher = BaselineMatcher::new(&registry);
        let m = matcher.match_test("HTTP_Throughput_Run").unwrap();
        assert_eq!(m.system, "nginx");
        assert_eq!(m.scenario, "json");
        assert!(!m.approximate);
    }

    #[test]
    fn mcp_and_a2a_are_approximated_by_envoy() {
        let registry = BaselineRegistry::builtin().unwrap();
        let matcher = BaselineMatcher::new(&registry);
        for name in ["mcp_stress", "a2a_roundtrip"] {
            let m = matcher.match_test(name).unwrap();
            assert_eq!(m.system, "envoy");
            assert_eq!(m.scenario, "http_proxy");
            assert!(m.approximate, "{name} should be flagged approximate");
        }
    }

    #[test]
    fn unrelated_name_matches_nothing() {
        let registry = BaselineRegistry::builtin().unwrap();
        let matcher = BaselineMatcher::new(&registry);
        assert!(matcher.match_test("unrelated_test").is_none());
    }

    #[test]
    fn ordering_prefers_latency_rule() {
        // Contains the keywords of both http rules; the first must win.
        let registry = BaselineRegistry::builtin().unwrap();
        let matcher = BaselineMatcher::new(&registry);
        let m = matcher.match_test("http_latency_throughput").unwrap();
        assert_eq!(m.scenario, "plaintext");
    }

    #[test]
    fn rule_without_registry_scenario_falls_through() {
        // A registry that lacks nginx entirely: the http rules cannot fire.
        let doc = r#"[{
            "system_name": "envoy",
            "source_citation": "Envoy Proxy Benchmarks 2024",
            "source_url": "https://www.envoyproxy.io/docs/envoy/latest/faq/performance/",
            "measured_date": "2024-01-20",
            "hardware_description": "AWS c5.4xlarge",
            "scenarios": {"http_proxy": {"metrics": {"p95_ms": 3.1, "qps": 95000}}}
        }]"#;
        let registry = BaselineRegistry::from_json_str(doc).unwrap();
        let matcher = BaselineMatcher::new(&registry);
        assert!(matcher.match_test("http_latency_test").is_none());
        assert!(matcher.match_test("mcp_stress").is_some());
    }
}
