// Copyright 2025 Gateway Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the comparison engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by normalization, registry loading, and the run pipeline.
///
/// A matcher that finds no baseline is not an error; it returns `None`.
#[derive(Debug, Error)]
pub enum Error {
    /// A raw result document lacks the minimum required structure.
    ///
    /// Localized to one document: the batch loader records it and moves on.
    #[error("malformed result document: {reason}")]
    MalformedResult {
        /// What was missing or unreadable.
        reason: String,
    },

    /// A baseline entry is missing mandatory provenance or scenarios.
    ///
    /// Fatal at load time: a provenance-less baseline undermines every
    /// comparison derived from it, so the registry refuses to load.
    #[error("invalid baseline entry for {system}: {reason}")]
    InvalidBaselineEntry {
        /// System the invalid entry describes.
        system: String,
        /// Which mandatory field was missing.
        reason: String,
    },

    /// The results directory does not exist.
    #[error("results directory not found: {path}")]
    ResultsDirNotFound {
        /// The directory that was requested.
        path: PathBuf,
    },

    /// JSON (de)serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::MalformedResult`].
    pub fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedResult {
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`Error::InvalidBaselineEntry`].
    pub fn invalid_baseline(system: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidBaselineEntry {
            system: system.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
