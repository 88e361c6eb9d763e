// Copyright 2025 Gateway Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Normalization of raw Fortio result documents.
//!
//! Fortio reports response times in seconds inside a `DurationHistogram`
//! object; everything here is converted to milliseconds so the rest of the
//! pipeline speaks one unit. Only the histogram itself is mandatory —
//! every other field defaults to the absent sentinel of zero.

use crate::error::{Error, Result};
use crate::metrics::MetricRecord;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A per-document normalization failure, recorded without aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeFailure {
    /// File name (not full path) of the document that failed.
    pub file: String,
    /// Human-readable reason.
    pub message: String,
}

/// The outcome of normalizing a directory of result documents.
///
/// `results` maps test name (filename stem) to its normalized record;
/// `failures` lists documents that could not be normalized. A batch with
/// failures is still a usable batch.
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    /// Successfully normalized records, keyed by test name.
    pub results: BTreeMap<String, MetricRecord>,
    /// Documents that failed to normalize.
    pub failures: Vec<NormalizeFailure>,
}

impl NormalizedBatch {
    /// Whether no document normalized successfully.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

fn num(value: Option<&Value>) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(0.0)
}

/// Normalize one raw Fortio JSON document into a [`MetricRecord`].
///
/// Fails with [`Error::MalformedResult`] only when the `DurationHistogram`
/// object is missing entirely; individual absent fields default to zero.
pub fn normalize_document(doc: &Value) -> Result<MetricRecord> {
    let hist = doc
        .get("DurationHistogram")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::malformed("missing DurationHistogram object"))?;

    let mut record = MetricRecord {
        qps: num(doc.get("ActualQPS")),
        requested_qps: num(doc.get("RequestedQPS")),
        avg_ms: num(hist.get("Avg")) * 1000.0,
        min_ms: num(hist.get("Min")) * 1000.0,
        max_ms: num(hist.get("Max")) * 1000.0,
        std_dev_ms: num(hist.get("StdDev")) * 1000.0,
        ..Default::default()
    };

    // Fortio calls the total request count RequestedTotal in newer output;
    // older documents only carry RequestedDuration for the same role.
    let requested_total = match doc.get("RequestedTotal") {
        Some(v) if v.is_number() => num(Some(v)),
        _ => num(doc.get("RequestedDuration")),
    };
    record.total_requests = requested_total;

    if let Some(percentiles) = hist.get("Percentiles").and_then(Value::as_array) {
        for pair in percentiles {
            let percentile = num(pair.get("Percentile"));
            let value_ms = num(pair.get("Value")) * 1000.0;
            // Exact label match; anything else is ignored, not an error.
            match percentile {
                p if (p - 50.0).abs() < f64::EPSILON => record.p50_ms = value_ms,
                p if (p - 90.0).abs() < f64::EPSILON => record.p90_ms = value_ms,
                p if (p - 95.0).abs() < f64::EPSILON => record.p95_ms = value_ms,
                p if (p - 99.0).abs() < f64::EPSILON => record.p99_ms = value_ms,
                p if (p - 99.9).abs() < 1e-9 => record.p99_9_ms = value_ms,
                _ => {}
            }
        }
    }

    let errors = num(
        doc.get("ErrorsDurationHistogram")
            .and_then(|h| h.get("Count")),
    );
    // Floor the denominator at 1 so a zero-request document cannot divide
    // by zero; clamp because error counts can exceed the recorded total.
    let success = (1.0 - errors / requested_total.max(1.0)) * 100.0;
    record.success_rate = success.clamp(0.0, 100.0);

    Ok(record)
}

/// Normalize every `*.json` document in `dir`.
///
/// Each file becomes one test run, keyed by its filename stem. A malformed
/// document is logged, recorded in the failure list, and skipped; it never
/// aborts the batch. A missing directory is [`Error::ResultsDirNotFound`].
pub fn load_results_dir(dir: impl AsRef<Path>) -> Result<NormalizedBatch> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::ResultsDirNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut batch = NormalizedBatch::default();
    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    entries.sort();

    for path in entries {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.clone());

        match fs::read_to_string(&path)
            .map_err(Error::from)
            .and_then(|text| serde_json::from_str::<Value>(&text).map_err(Error::from))
            .and_then(|doc| normalize_document(&doc))
        {
            Ok(record) => {
                batch.results.insert(stem, record);
            }
            Err(err) => {
                tracing::warn!(file = %file, error = %err, "skipping result document");
                batch.failures.push(NormalizeFailure {
                    file,
                    message: err.to_string(),
                });
            }
        }
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn fortio_doc() -> Value {
        json!({
            "ActualQPS": 8234.5,
            "RequestedQPS": "max",
            "RequestedTotal": 100000,
            "DurationHistogram": {
                "Avg": 0.0021,
                "Min": 0.0004,
                "Max": 0.0183,
                "StdDev": 0.0009,
                "Percentiles": [
                    {"Percentile": 50, "Value": 0.0018},
                    {"Percentile": 90, "Value": 0.0035},
                    {"Percentile": 95, "Value": 0.0042},
                    {"Percentile": 99, "Value": 0.0071},
                    {"Percentile": 99.9, "Value": 0.0152}
                ]
            },
            "ErrorsDurationHistogram": {"Count": 250}
        })
    }

    #[test]
    fn converts_seconds_to_milliseconds_exactly() {
        let record = normalize_document(&fortio_doc()).unwrap();
        assert_eq!(record.p50_ms, 1.8);
        assert_eq!(record.p90_ms, 3.5);
        assert_eq!(record.p95_ms, 4.2);
        assert_eq!(record.p99_ms, 7.1);
        assert_eq!(record.p99_9_ms, 15.2);
        assert_eq!(record.avg_ms, 2.1);
        assert_eq!(record.qps, 8234.5);
    }

    #[test]
    fn preserves_source_percentile_ordering() {
        let record = normalize_document(&fortio_doc()).unwrap();
        assert!(record.percentiles_monotonic());
    }

    #[test]
    fn missing_optional_fields_default_to_zero() {
        let doc = json!({
            "DurationHistogram": {
                "Percentiles": [{"Percentile": 95, "Value": 0.002}]
            }
        });
        let record = normalize_document(&doc).unwrap();
        assert_eq!(record.p95_ms, 2.0);
        assert_eq!(record.p50_ms, 0.0);
        assert_eq!(record.qps, 0.0);
        assert_eq!(record.avg_ms, 0.0);
    }

    #[test]
    fn unrecognized_percentile_labels_are_ignored() {
        let doc = json!({
            "DurationHistogram": {
                "Percentiles": [
                    {"Percentile": 75, "Value": 0.003},
                    {"Percentile": 50, "Value": 0.001}
                ]
            }
        });
        let record = normalize_document(&doc).unwrap();
        assert_eq!(record.p50_ms, 1.0);
        assert_eq!(record.p90_ms, 0.0);
    }

    #[test]
    fn missing_histogram_is_malformed() {
        let doc = json!({"ActualQPS": 100.0});
        let err = normalize_document(&doc).unwrap_err();
        assert!(matches!(err, Error::MalformedResult { .. }));
    }

    #[test]
    fn success_rate_derivation() {
        let record = normalize_document(&fortio_doc()).unwrap();
        // 250 errors out of 100000 requests.
        assert!((record.success_rate - 99.75).abs() < 1e-9);
    }

    #[test]
    fn success_rate_with_zero_requested_total_floors_denominator() {
        let doc = json!({
            "DurationHistogram": {"Percentiles": []},
            "RequestedTotal": 0,
            "ErrorsDurationHistogram": {"Count": 0}
        });
        let record = normalize_document(&doc).unwrap();
        assert_eq!(record.success_rate, 100.0);
    }

    #[test]
    fn success_rate_clamped_when_errors_exceed_total() {
        let doc = json!({
            "DurationHistogram": {"Percentiles": []},
            "RequestedTotal": 10,
            "ErrorsDurationHistogram": {"Count": 50}
        });
        let record = normalize_document(&doc).unwrap();
        assert_eq!(record.success_rate, 0.0);
    }

    #[test]
    fn falls_back_to_requested_duration() {
        let doc = json!({
            "DurationHistogram": {"Percentiles": []},
            "RequestedDuration": 5000,
            "ErrorsDurationHistogram": {"Count": 50}
        });
        let record = normalize_document(&doc).unwrap();
        assert_eq!(record.total_requests, 5000.0);
        assert!((record.success_rate - 99.0).abs() < 1e-9);
    }

    #[test]
    fn batch_skips_malformed_documents() {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in [
            ("http_latency.json", fortio_doc().to_string()),
            ("http_throughput.json", fortio_doc().to_string()),
            ("broken.json", "{not json".to_string()),
        ] {
            let mut f = std::fs::File::create(dir.path().join(name)).unwrap();
            f.write_all(body.as_bytes()).unwrap();
        }

        let batch = load_results_dir(dir.path()).unwrap();
        assert_eq!(batch.results.len(), 2);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].file, "broken.json");
        assert!(batch.results.contains_key("http_latency"));
    }

    #[test]
    fn missing_directory_is_reported() {
        let err = load_results_dir("/definitely/not/here").unwrap_err();
        assert!(matches!(err, Error::ResultsDirNotFound { .. }));
    }
}
