// Copyright 2025 Gateway Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! External-source polling for gateway-bench baselines.
//!
//! Watches the feeds and APIs the published baselines came from and
//! proposes update candidates when they change. Proposals are review-only:
//! this crate has no write path to the baseline table. It reads the table
//! through `gateway-bench-core`'s shared registry document format, the same
//! file the comparison engine loads.
//!
//! # Modules
//!
//! - [`source`] - the source catalog
//! - [`scanner`] - polling, keyword scanning, digest diffing
//! - [`summary`] - CI-facing `updated=`/`changes=` output

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod scanner;
pub mod source;
pub mod summary;

pub use scanner::{
    attach_current_values, infer_metric, ScanReport, ScanState, Scanner, UpdateCandidate,
};
pub use source::{default_sources, sources_for_registry, BaselineSource, SourceKind};
pub use summary::{render_apply_log, render_scan_summary};
