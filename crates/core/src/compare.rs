// Copyright 2025 Gateway Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Measured-vs-baseline metric comparison.
//!
//! Load-test percentiles are noisy run to run, so a comparison only counts
//! as better or worse outside a ±10% band around the baseline. The band is
//! a fixed constant: changing it would silently reclassify historical
//! reports.

use crate::metrics::MetricRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Half-width of the neutral band around a ratio of 1.0.
pub const NEUTRAL_BAND: f64 = 0.10;

/// Whether smaller values of a metric are preferable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Latency-like metrics.
    LowerIsBetter,
    /// Throughput-like metrics.
    HigherIsBetter,
}

/// Qualitative outcome of one metric comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Measured beats the baseline by more than the band.
    Better,
    /// Measured trails the baseline by more than the band.
    Worse,
    /// Within the noise band.
    Neutral,
    /// Baseline supplied no value for this metric.
    NotApplicable,
}

/// The classified, quantified result of comparing one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonVerdict {
    /// Qualitative classification.
    pub classification: Classification,
    /// Magnitude of the difference, in percent of the baseline value.
    pub delta_percent: f64,
    /// Ready-to-display summary, e.g. "12.5% better".
    pub display_text: String,
}

/// Compare one measured metric value against its baseline value.
///
/// A zero baseline means the baseline never published this metric, so the
/// verdict is [`Classification::NotApplicable`] — no division happens and
/// no spurious percentage is reported.
pub fn compare(measured: f64, baseline: f64, polarity: Polarity) -> ComparisonVerdict {
    if baseline == 0.0 {
        return ComparisonVerdict {
            classification: Classification::NotApplicable,
            delta_percent: 0.0,
            display_text: "N/A".to_string(),
        };
    }

    let ratio = measured / baseline;
    // Inclusive at the band edges: a full 10% swing is a real difference,
    // only strictly-inside ratios count as noise.
    let improved = match polarity {
        Polarity::LowerIsBetter => ratio <= 1.0 - NEUTRAL_BAND,
        Polarity::HigherIsBetter => ratio >= 1.0 + NEUTRAL_BAND,
    };
    let regressed = match polarity {
        Polarity::LowerIsBetter => ratio >= 1.0 + NEUTRAL_BAND,
        Polarity::HigherIsBetter => ratio <= 1.0 - NEUTRAL_BAND,
    };

    if improved {
        let delta = (ratio - 1.0).abs() * 100.0;
        ComparisonVerdict {
            classification: Classification::Better,
            delta_percent: delta,
            display_text: format!("{delta:.1}% better"),
        }
    } else if regressed {
        let delta = (ratio - 1.0).abs() * 100.0;
        ComparisonVerdict {
            classification: Classification::Worse,
            delta_percent: delta,
            display_text: format!("{delta:.1}% worse"),
        }
    } else {
        ComparisonVerdict {
            classification: Classification::Neutral,
            delta_percent: (ratio - 1.0).abs() * 100.0,
            display_text: "Similar".to_string(),
        }
    }
}

/// Compare the metrics a baseline publishes against a measured record.
///
/// Latency percentiles compare with [`Polarity::LowerIsBetter`], throughput
/// with [`Polarity::HigherIsBetter`]. Metrics the baseline leaves at the
/// zero sentinel come back `NotApplicable` via the zero-baseline rule.
pub fn compare_records(
    measured: &MetricRecord,
    baseline: &MetricRecord,
) -> BTreeMap<String, ComparisonVerdict> {
    let metrics = [
        ("p50_ms", measured.p50_ms, baseline.p50_ms, Polarity::LowerIsBetter),
        ("p95_ms", measured.p95_ms, baseline.p95_ms, Polarity::LowerIsBetter),
        ("p99_ms", measured.p99_ms, baseline.p99_ms, Polarity::LowerIsBetter),
        ("qps", measured.qps, baseline.qps, Polarity::HigherIsBetter),
    ];

    metrics
        .into_iter()
        .map(|(name, m, b, polarity)| (name.to_string(), compare(m, b, polarity)))
        .collect()
}
