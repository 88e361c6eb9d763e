// Copyright 2025 Gateway Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Polling external sources for baseline update candidates.
//!
//! The scanner only ever *proposes*: it emits [`UpdateCandidate`]s for a
//! human (or CI reviewer) to act on and never writes the baseline table. A
//! source that times out or errors is recorded as "no update detected" for
//! that source; one bad feed never aborts the scan.

use crate::source::{BaselineSource, SourceKind};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Keywords that mark a feed entry or release note as performance-related.
const PERFORMANCE_KEYWORDS: &[&str] = &[
    "performance",
    "benchmark",
    "speed",
    "latency",
    "throughput",
    "qps",
    "requests per second",
    "optimization",
    "faster",
];

/// How many recent releases to inspect per GitHub source.
const RELEASES_TO_CHECK: usize = 5;

/// How far back a release still counts as recent.
const RELEASE_WINDOW_DAYS: i64 = 180;

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fixed delay between source checks.
const INTER_SOURCE_DELAY: Duration = Duration::from_secs(1);

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<title>\s*(?:<!\[CDATA\[)?(.*?)(?:\]\]>)?\s*</title>").unwrap());

/// Errors from scan-state persistence.
#[derive(Debug, Error)]
pub enum ScanError {
    /// State file could not be read or written.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// State file is not valid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A proposed baseline change, for review only.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateCandidate {
    /// Registry system the candidate concerns, when known.
    pub system: Option<String>,
    /// Metric the evidence points at, when the text names one.
    pub metric: Option<String>,
    /// Currently published value for that metric, filled from the registry.
    pub old_value: Option<f64>,
    /// What was seen (feed title, release tag, payload digest change).
    pub evidence: String,
    /// Source name the evidence came from.
    pub source: String,
    /// Reviewer confidence hint in `[0, 1]`.
    pub confidence: f64,
}

/// Per-source note for sources that produced nothing actionable.
#[derive(Debug, Clone, Serialize)]
pub struct SourceNote {
    /// Source name.
    pub source: String,
    /// What happened ("no update detected", an error, a timeout).
    pub note: String,
}

/// Everything one scan produced.
#[derive(Debug, Default, Serialize)]
pub struct ScanReport {
    /// Proposed updates across all sources.
    pub candidates: Vec<UpdateCandidate>,
    /// Sources that yielded nothing, with the reason.
    pub notes: Vec<SourceNote>,
}

impl ScanReport {
    /// Whether any source proposed an update.
    pub fn has_updates(&self) -> bool {
        !self.candidates.is_empty()
    }
}

/// Persisted payload digests, keyed by source id.
///
/// Lets the API digest diff survive across invocations.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScanState {
    /// Source id to last-seen payload digest.
    #[serde(default)]
    pub digests: HashMap<String, String>,
}

impl ScanState {
    /// Load state from a JSON file; a missing file is empty state.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Persist state as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScanError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Whether a text mentions any performance keyword.
pub fn is_performance_related(text: &str) -> bool {
    let lower = text.to_lowercase();
    PERFORMANCE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Which registry metric a piece of evidence text points at, if any.
///
/// Latency wording maps to the p95 column (the headline latency metric in
/// the published tables), throughput wording to qps.
pub fn infer_metric(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    if lower.contains("latency") {
        Some("p95_ms")
    } else if lower.contains("throughput")
        || lower.contains("qps")
        || lower.contains("requests per second")
    {
        Some("qps")
    } else {
        None
    }
}

/// Fill in `old_value` for candidates whose system and metric resolve in a
/// loaded registry.
///
/// The current value is taken from the first scenario of the system that
/// publishes the metric. Candidates stay proposals either way; this only
/// gives the reviewer the number the change would displace.
pub fn attach_current_values(
    report: &mut ScanReport,
    registry: &gateway_bench_core::BaselineRegistry,
) {
    for candidate in &mut report.candidates {
        let (Some(system), Some(metric)) = (&candidate.system, &candidate.metric) else {
            continue;
        };
        if let Some(entry) = registry.entry(system) {
            candidate.old_value = entry
                .scenarios
                .values()
                .find_map(|s| s.metrics.value(metric));
        }
    }
}

/// Extract item titles from a raw RSS/Atom feed document.
///
/// The first title is the channel's own and is skipped.
pub fn extract_feed_titles(feed: &str) -> Vec<String> {
    TITLE_RE
        .captures_iter(feed)
        .skip(1)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// SHA-256 digest of a payload, hex-encoded.
pub fn payload_digest(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

/// Pull performance-related evidence from a GitHub releases listing.
///
/// Each hit carries the evidence line and the metric the release body
/// points at, when it names one.
pub fn scan_release_listing(
    releases: &Value,
    now: DateTime<Utc>,
) -> Vec<(String, Option<&'static str>)> {
    let cutoff = now - ChronoDuration::days(RELEASE_WINDOW_DAYS);
    let Some(list) = releases.as_array() else {
        return Vec::new();
    };

    let mut evidence = Vec::new();
    for release in list.iter().take(RELEASES_TO_CHECK) {
        let published = release
            .get("published_at")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc));
        let recent = published.is_some_and(|d| d > cutoff);
        if !recent {
            continue;
        }
        let body = release.get("body").and_then(Value::as_str).unwrap_or("");
        if is_performance_related(body) {
            let tag = release
                .get("tag_name")
                .and_then(Value::as_str)
                .unwrap_or("<untagged>");
            evidence.push((
                format!("performance-related release {tag}"),
                infer_metric(body),
            ));
        }
    }
    evidence
}

/// Sequentially polls a source catalog and collects update candidates.
pub struct Scanner {
    client: reqwest::Client,
    state: ScanState,
}

impl Scanner {
    /// Create a scanner with fresh state.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_state(ScanState::default())
    }

    /// Create a scanner over previously persisted state.
    ///
    /// Fails when the HTTP client cannot be built; requests always carry
    /// the per-request timeout.
    pub fn with_state(state: ScanState) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("gateway-bench-watcher/0.2")
            .build()?;
        Ok(Self { client, state })
    }

    /// The scan state after polling, for persistence.
    pub fn into_state(self) -> ScanState {
        self.state
    }

    /// Poll every source in order, with a fixed delay between sources.
    ///
    /// Network failures and timeouts become per-source notes; the scan
    /// always runs to completion.
    pub async fn check_all(&mut self, sources: &[BaselineSource]) -> ScanReport {
        let mut report = ScanReport::default();
        for (i, source) in sources.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(INTER_SOURCE_DELAY).await;
            }
            tracing::info!(source = %source.name, "checking source");
            match self.check_source(source).await {
                Ok(candidates) if candidates.is_empty() => {
                    report.notes.push(SourceNote {
                        source: source.name.clone(),
                        note: "no update detected".to_string(),
                    });
                }
                Ok(candidates) => report.candidates.extend(candidates),
                Err(err) => {
                    tracing::warn!(source = %source.name, error = %err, "source check failed");
                    report.notes.push(SourceNote {
                        source: source.name.clone(),
                        note: format!("check failed: {err}"),
                    });
                }
            }
        }
        report
    }

    async fn check_source(
        &mut self,
        source: &BaselineSource,
    ) -> Result<Vec<UpdateCandidate>, reqwest::Error> {
        match source.kind {
            SourceKind::Api => self.check_api(source).await,
            SourceKind::Rss => self.check_rss(source).await,
            SourceKind::GithubReleases => self.check_releases(source).await,
        }
    }

    async fn check_api(
        &mut self,
        source: &BaselineSource,
    ) -> Result<Vec<UpdateCandidate>, reqwest::Error> {
        let body = self
            .client
            .get(&source.url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        let digest = payload_digest(&body);
        let previous = self.state.digests.insert(source.id.clone(), digest.clone());

        match previous {
            Some(old) if old != digest => Ok(vec![UpdateCandidate {
                system: source.system.clone(),
                metric: None,
                old_value: None,
                evidence: "published dataset changed since last scan".to_string(),
                source: source.name.clone(),
                confidence: 0.2,
            }]),
            _ => Ok(Vec::new()),
        }
    }

    async fn check_rss(
        &self,
        source: &BaselineSource,
    ) -> Result<Vec<UpdateCandidate>, reqwest::Error> {
        let feed = self
            .client
            .get(&source.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(extract_feed_titles(&feed)
            .into_iter()
            .take(10)
            .filter(|title| is_performance_related(title))
            .map(|title| UpdateCandidate {
                system: source.system.clone(),
                metric: infer_metric(&title).map(str::to_string),
                old_value: None,
                evidence: format!("performance-related post: {title}"),
                source: source.name.clone(),
                confidence: 0.3,
            })
            .collect())
    }

    async fn check_releases(
        &self,
        source: &BaselineSource,
    ) -> Result<Vec<UpdateCandidate>, reqwest::Error> {
        let releases: Value = self
            .client
            .get(&source.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(scan_release_listing(&releases, Utc::now())
            .into_iter()
            .map(|(evidence, metric)| UpdateCandidate {
                system: source.system.clone(),
                metric: metric.map(str::to_string),
                old_value: None,
                evidence,
                source: source.name.clone(),
                confidence: 0.3,
            })
            .collect())
    }
}
