// Copyright 2025 Gateway Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Report rendering for gateway-bench.
//!
//! Consumes the comparison engine's [`RunOutput`] and a loaded
//! [`BaselineRegistry`] and produces display strings only — all decision
//! logic stays in `gateway-bench-core`.
//!
//! # Modules
//!
//! - [`markdown`] - summary tables for documentation
//! - [`html`] - the full styled comparison report
//! - [`io`] - writing report files to an output directory

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod html;
pub mod io;
pub mod markdown;

use gateway_bench_core::{MetricRecord, RunOutput};

pub(crate) fn mean_of<F>(results: &RunOutput, field: F) -> Option<f64>
where
    F: Fn(&MetricRecord) -> f64,
{
    let values: Vec<f64> = results
        .results
        .values()
        .map(&field)
        .filter(|v| *v > 0.0)
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn mean_skips_absent_sentinels() {
        let mut results = BTreeMap::new();
        results.insert(
            "a".to_string(),
            MetricRecord {
                p95_ms: 2.0,
                ..Default::default()
            },
        );
        results.insert(
            "b".to_string(),
            MetricRecord {
                p95_ms: 0.0,
                ..Default::default()
            },
        );
        results.insert(
            "c".to_string(),
            MetricRecord {
                p95_ms: 4.0,
                ..Default::default()
            },
        );
        let output = RunOutput {
            results,
            ..Default::default()
        };
        assert_eq!(mean_of(&output, |r| r.p95_ms), Some(3.0));
        assert_eq!(mean_of(&output, |r| r.qps), None);
    }
}
