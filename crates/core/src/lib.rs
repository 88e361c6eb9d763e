// Copyright 2025 Gateway Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Result normalization and baseline comparison for gateway load tests.
//!
//! This crate is the decision core of gateway-bench: it converts raw
//! Fortio result documents into canonical [`MetricRecord`]s, keeps a
//! validated registry of published third-party baselines, selects the
//! best-fit baseline for each test by name, and classifies each metric
//! difference with a noise-tolerant neutral band.
//!
//! Rendering (markdown/HTML) and external-source polling live in the
//! sibling `gateway-bench-reports` and `gateway-bench-watcher` crates and
//! consume the [`run::RunOutput`] contract produced here.
//!
//! # Modules
//!
//! - [`metrics`] - the canonical `MetricRecord`
//! - [`normalize`] - Fortio document normalization and batch loading
//! - [`baseline`] - the provenance-validated baseline registry
//! - [`matcher`] - ordered keyword rules selecting a baseline per test
//! - [`compare`] - the banded measured-vs-baseline comparison
//! - [`run`] - the end-to-end pipeline and output contract

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod baseline;
pub mod compare;
pub mod error;
pub mod matcher;
pub mod metrics;
pub mod normalize;
pub mod run;

pub use baseline::{BaselineEntry, BaselineRegistry, BaselineScenario};
pub use compare::{compare, Classification, ComparisonVerdict, Polarity};
pub use error::{Error, Result};
pub use matcher::{BaselineMatch, BaselineMatcher};
pub use metrics::MetricRecord;
pub use normalize::{load_results_dir, normalize_document, NormalizedBatch};
pub use run::{ComparisonRun, RunOutput, TestComparison};
