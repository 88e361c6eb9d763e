// Copyright 2025 Gateway Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! The canonical per-run metric record.
//!
//! Every raw load-test document is normalized into a [`MetricRecord`], and
//! every published baseline scenario is stored as one. Zero is the absent
//! sentinel throughout: a field the source did not supply stays at `0.0`,
//! and consumers must treat `0.0` as "not measured", never as a measured
//! zero-latency result.

use serde::{Deserialize, Serialize};

/// One canonical performance snapshot for a test run or baseline scenario.
///
/// Immutable after construction: the normalizer (or the registry loader)
/// builds it once and nothing downstream mutates it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricRecord {
    /// 50th percentile latency in milliseconds.
    #[serde(default)]
    pub p50_ms: f64,
    /// 90th percentile latency in milliseconds.
    #[serde(default)]
    pub p90_ms: f64,
    /// 95th percentile latency in milliseconds.
    #[serde(default)]
    pub p95_ms: f64,
    /// 99th percentile latency in milliseconds.
    #[serde(default)]
    pub p99_ms: f64,
    /// 99.9th percentile latency in milliseconds.
    #[serde(default)]
    pub p99_9_ms: f64,
    /// Measured throughput in queries per second.
    #[serde(default)]
    pub qps: f64,
    /// Requested (target) throughput in queries per second, if recorded.
    #[serde(default)]
    pub requested_qps: f64,
    /// Total requests the run attempted.
    #[serde(default)]
    pub total_requests: f64,
    /// Share of requests that succeeded, in `[0, 100]`.
    #[serde(default)]
    pub success_rate: f64,
    /// Mean latency in milliseconds.
    #[serde(default)]
    pub avg_ms: f64,
    /// Minimum observed latency in milliseconds.
    #[serde(default)]
    pub min_ms: f64,
    /// Maximum observed latency in milliseconds.
    #[serde(default)]
    pub max_ms: f64,
    /// Latency standard deviation in milliseconds.
    #[serde(default)]
    pub std_dev_ms: f64,
}

impl MetricRecord {
    /// Whether the populated percentile fields are non-decreasing.
    ///
    /// Zero fields are skipped (absent, not measured). The normalizer never
    /// reorders source values, so this holds whenever the source ordering
    /// held.
    pub fn percentiles_monotonic(&self) -> bool {
        let present: Vec<f64> = [
            self.p50_ms,
            self.p90_ms,
            self.p95_ms,
            self.p99_ms,
            self.p99_9_ms,
        ]
        .into_iter()
        .filter(|v| *v > 0.0)
        .collect();
        present.windows(2).all(|w| w[0] <= w[1])
    }

    /// Look up a field by its metric name, `None` for unknown names or
    /// fields left at the absent sentinel.
    pub fn value(&self, metric: &str) -> Option<f64> {
        let v = match metric {
            "p50_ms" => self.p50_ms,
            "p90_ms" => self.p90_ms,
            "p95_ms" => self.p95_ms,
            "p99_ms" => self.p99_ms,
            "p99_9_ms" => self.p99_9_ms,
            "qps" => self.qps,
            "requested_qps" => self.requested_qps,
            "success_rate" => self.success_rate,
            "avg_ms" => self.avg_ms,
            "min_ms" => self.min_ms,
            "max_ms" => self.max_ms,
            "std_dev_ms" => self.std_dev_ms,
            _ => return None,
        };
        (v > 0.0).then_some(v)
    }

    /// Whether any latency or throughput field was actually supplied.
    pub fn has_data(&self) -> bool {
        self.p50_ms > 0.0
            || self.p95_ms > 0.0
            || self.p99_ms > 0.0
            || self.qps > 0.0
            || self.avg_ms > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_all_absent() {
        let record = MetricRecord::default();
        assert!(!record.has_data());
        assert!(record.percentiles_monotonic());
    }

    #[test]
    fn monotonic_check_skips_absent_fields() {
        let record = MetricRecord {
            p50_ms: 1.0,
            p90_ms: 0.0,
            p95_ms: 2.5,
            p99_ms: 4.0,
            ..Default::default()
        };
        assert!(record.percentiles_monotonic());
    }

    #[test]
    fn monotonic_check_detects_inversion() {
        let record = MetricRecord {
            p50_ms: 3.0,
            p95_ms: 2.0,
            ..Default::default()
        };
        assert!(!record.percentiles_monotonic());
    }

    #[test]
    fn value_lookup_by_metric_name() {
        let record = MetricRecord {
            p95_ms: 2.1,
            qps: 125000.0,
            ..Default::default()
        };
        assert_eq!(record.value("p95_ms"), Some(2.1));
        assert_eq!(record.value("qps"), Some(125000.0));
        assert_eq!(record.value("p50_ms"), None);
        assert_eq!(record.value("nonsense"), None);
    }

    #[test]
    fn serde_round_trip_preserves_fields() {
        let record = MetricRecord {
            p50_ms: 0.8,
            p95_ms: 2.1,
            p99_ms: 4.2,
            qps: 125000.0,
            success_rate: 99.9,
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: MetricRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
