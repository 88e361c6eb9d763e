// Copyright 2025 Gateway Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! The catalog of external baseline sources.

use serde::{Deserialize, Serialize};

/// How a source is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A JSON API endpoint, diffed by payload digest.
    Api,
    /// An RSS/Atom feed, scanned for performance-related entry titles.
    Rss,
    /// A GitHub releases listing, scanned for performance notes.
    GithubReleases,
}

/// One external source of baseline data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineSource {
    /// Stable identifier used in scan state and summaries.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// URL to poll.
    pub url: String,
    /// Polling strategy.
    pub kind: SourceKind,
    /// Registry system this source speaks for, when there is exactly one.
    pub system: Option<String>,
}

impl BaselineSource {
    fn new(
        id: &str,
        name: &str,
        url: &str,
        kind: SourceKind,
        system: Option<&str>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            url: url.to_string(),
            kind,
            system: system.map(str::to_string),
        }
    }
}

/// The default source catalog, mirroring the systems in the built-in
/// baseline table.
pub fn default_sources() -> Vec<BaselineSource> {
    vec![
        BaselineSource::new(
            "techempower",
            "TechEmpower Framework Benchmarks",
            "https://www.techempower.com/benchmarks/data.json",
            SourceKind::Api,
            None,
        ),
        BaselineSource::new(
            "cloudflare_blog",
            "Cloudflare Engineering Blog",
            "https://blog.cloudflare.com/rss/",
            SourceKind::Rss,
            Some("pingora"),
        ),
        BaselineSource::new(
            "envoy_releases",
            "Envoy Proxy Releases",
            "https://api.github.com/repos/envoyproxy/envoy/releases",
            SourceKind::GithubReleases,
            Some("envoy"),
        ),
        BaselineSource::new(
            "nginx_blog",
            "NGINX Blog",
            "https://www.nginx.com/feed/",
            SourceKind::Rss,
            Some("nginx"),
        ),
        BaselineSource::new(
            "haproxy_releases",
            "HAProxy Releases",
            "https://api.github.com/repos/haproxy/haproxy/releases",
            SourceKind::GithubReleases,
            Some("haproxy"),
        ),
    ]
}

/// Restrict a source catalog to the systems a loaded registry actually
/// tracks.
///
/// Sources without a single associated system (aggregators like
/// TechEmpower) are always kept. Both sides read the same registry
/// document, so a trimmed per-deployment table automatically trims the
/// scan.
pub fn sources_for_registry(
    registry: &gateway_bench_core::BaselineRegistry,
    sources: Vec<BaselineSource>,
) -> Vec<BaselineSource> {
    sources
        .into_iter()
        .filter(|s| match &s.system {
            Some(system) => registry.entry(system).is_some(),
            None => true,
        })
        .collect()
}
