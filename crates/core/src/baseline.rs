// Copyright 2025 Gateway Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! The published-baseline registry.
//!
//! Baselines are third-party measurements (TechEmpower rounds, vendor
//! engineering blogs) that measured results are compared against. Every
//! entry must carry provenance: a citation, a source URL, and the date the
//! numbers were published. The loader fails closed — an entry missing any
//! of those registers zero scenarios and aborts the load, because a
//! provenance-less baseline would silently poison every comparison report.
//!
//! The registry document format is plain JSON (an array of entries), shared
//! with the watcher crate so both sides read the same table.

use crate::error::{Error, Result};
use crate::metrics::MetricRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// The hand-curated published baseline table shipped with the crate.
const BUILTIN_TABLE: &str = include_str!("../data/published_baselines.json");

/// A named test condition inside a baseline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineScenario {
    /// The published numbers for this scenario.
    pub metrics: MetricRecord,
    /// Free-text description of what the scenario measured.
    #[serde(default)]
    pub notes: String,
}

/// One published external measurement, with mandatory provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineEntry {
    /// The system that was measured (e.g. "nginx").
    pub system_name: String,
    /// Where the numbers were published.
    pub source_citation: String,
    /// Link to the publication.
    pub source_url: String,
    /// When the measurement was published.
    pub measured_date: NaiveDate,
    /// Hardware the measurement ran on.
    pub hardware_description: String,
    /// Scenario name to published numbers. Never empty after validation.
    pub scenarios: BTreeMap<String, BaselineScenario>,
}

/// Unvalidated entry shape as it appears in the registry document.
#[derive(Debug, Deserialize)]
struct RawBaselineEntry {
    #[serde(default)]
    system_name: String,
    #[serde(default)]
    source_citation: String,
    #[serde(default)]
    source_url: String,
    #[serde(default)]
    measured_date: Option<NaiveDate>,
    #[serde(default)]
    hardware_description: String,
    #[serde(default)]
    scenarios: BTreeMap<String, BaselineScenario>,
}

impl RawBaselineEntry {
    fn validate(self) -> Result<BaselineEntry> {
        let name = if self.system_name.is_empty() {
            "<unnamed>"
        } else {
            self.system_name.as_str()
        };
        if self.system_name.is_empty() {
            return Err(Error::invalid_baseline(name, "missing system_name"));
        }
        if self.source_citation.is_empty() {
            return Err(Error::invalid_baseline(name, "missing source_citation"));
        }
        if self.source_url.is_empty() {
            return Err(Error::invalid_baseline(name, "missing source_url"));
        }
        let measured_date = self
            .measured_date
            .ok_or_else(|| Error::invalid_baseline(name, "missing measured_date"))?;
        if self.scenarios.is_empty() {
            return Err(Error::invalid_baseline(name, "no scenarios"));
        }
        Ok(BaselineEntry {
            system_name: self.system_name,
            source_citation: self.source_citation,
            source_url: self.source_url,
            measured_date,
            hardware_description: self.hardware_description,
            scenarios: self.scenarios,
        })
    }
}

/// Read-only catalog of published baselines, keyed by system name.
///
/// Immutable for the lifetime of a report run; a new registry version is a
/// new document loaded by a new run, never an in-place mutation.
#[derive(Debug, Clone, Default)]
pub struct BaselineRegistry {
    entries: BTreeMap<String, BaselineEntry>,
}

impl BaselineRegistry {
    /// Build a registry from already-validated entries.
    pub fn from_entries(entries: Vec<BaselineEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| (e.system_name.clone(), e))
            .collect();
        Self { entries }
    }

    /// Parse and validate a registry document.
    ///
    /// Any entry failing provenance validation aborts the whole load with
    /// [`Error::InvalidBaselineEntry`]; no partial registry is produced.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: Vec<RawBaselineEntry> = serde_json::from_str(json)?;
        let mut entries = BTreeMap::new();
        for raw_entry in raw {
            let entry = raw_entry.validate()?;
            tracing::debug!(
                system = %entry.system_name,
                scenarios = entry.scenarios.len(),
                "registered baseline"
            );
            entries.insert(entry.system_name.clone(), entry);
        }
        Ok(Self { entries })
    }

    /// Load and validate a registry document from disk.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// The built-in published baseline table.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_TABLE)
    }

    /// Look up the published numbers for one system scenario.
    pub fn scenario(&self, system: &str, scenario: &str) -> Option<&MetricRecord> {
        self.entries
            .get(system)
            .and_then(|e| e.scenarios.get(scenario))
            .map(|s| &s.metrics)
    }

    /// Look up a full entry, provenance included.
    pub fn entry(&self, system: &str) -> Option<&BaselineEntry> {
        self.entries.get(system)
    }

    /// All registered system names, sorted.
    pub fn systems(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Scenario names published for one system, sorted.
    pub fn scenarios(&self, system: &str) -> Vec<&str> {
        self.entries
            .get(system)
            .map(|e| e.scenarios.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// All entries, sorted by system name.
    pub fn entries(&self) -> impl Iterator<Item = &BaselineEntry> {
        self.entries.values()
    }

    /// Number of registered systems.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no systems are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the registry back to the shared document format.
    pub fn to_json_string(&self) -> Result<String> {
        let entries: Vec<&BaselineEntry> = self.entries.values().collect();
        Ok(serde_json::to_string_pretty(&entries)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_loads_five_systems() {
        let registry = BaselineRegistry::builtin().unwrap();
        assert_eq!(registry.len(), 5);
        let systems: Vec<&str> = registry.systems().collect();
        assert_eq!(
            systems,
            vec!["envoy", "haproxy", "nginx", "pingora", "traefik"]
        );
    }

    #[test]
    fn builtin_entries_are_provenance_complete() {
        let registry = BaselineRegistry::builtin().unwrap();
        for entry in registry.entries() {
            assert!(!entry.source_citation.is_empty(), "{}", entry.system_name);
            assert!(!entry.source_url.is_empty(), "{}", entry.system_name);
            assert!(!entry.scenarios.is_empty(), "{}", entry.system_name);
        }
    }

    #[test]
    fn builtin_scenario_lookup() {
        let registry = BaselineRegistry::builtin().unwrap();
        let plaintext = registry.scenario("nginx", "plaintext").unwrap();
        assert_eq!(plaintext.p50_ms, 0.8);
        assert_eq!(plaintext.qps, 125000.0);
        assert!(registry.scenario("nginx", "grpc").is_none());
        assert!(registry.scenario("varnish", "plaintext").is_none());
    }

    #[test]
    fn missing_citation_fails_closed() {
        let doc = r#"[{
            "system_name": "nginx",
            "source_url": "https://example.com",
            "measured_date": "2024-03-15",
            "hardware_description": "test rig",
            "scenarios": {"plaintext": {"metrics": {"p95_ms": 2.1}}}
        }]"#;
        let err = BaselineRegistry::from_json_str(doc).unwrap_err();
        match err {
            Error::InvalidBaselineEntry { system, reason } => {
                assert_eq!(system, "nginx");
                assert!(reason.contains("source_citation"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_date_fails_closed() {
        let doc = r#"[{
            "system_name": "nginx",
            "source_citation": "TechEmpower Round 23",
            "source_url": "https://example.com",
            "hardware_description": "test rig",
            "scenarios": {"plaintext": {"metrics": {"p95_ms": 2.1}}}
        }]"#;
        assert!(BaselineRegistry::from_json_str(doc).is_err());
    }

    #[test]
    fn empty_scenarios_fail_closed() {
        let doc = r#"[{
            "system_name": "nginx",
            "source_citation": "TechEmpower Round 23",
            "source_url": "https://example.com",
            "measured_date": "2024-03-15",
            "hardware_description": "test rig",
            "scenarios": {}
        }]"#;
        assert!(BaselineRegistry::from_json_str(doc).is_err());
    }

    #[test]
    fn invalid_entry_registers_nothing() {
        let doc = r#"[{"system_name": "nginx"}]"#;
        assert!(BaselineRegistry::from_json_str(doc).is_err());
    }

    #[test]
    fn document_round_trip() {
        let registry = BaselineRegistry::builtin().unwrap();
        let json = registry.to_json_string().unwrap();
        let back = BaselineRegistry::from_json_str(&json).unwrap();
        assert_eq!(back.len(), registry.len());
        assert_eq!(
            back.scenario("envoy", "http_proxy"),
            registry.scenario("envoy", "http_proxy")
        );
    }
}
