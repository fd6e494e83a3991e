//! Error types for actrender-core.

use thiserror::Error;

/// Errors surfaced while loading samples or producing a report.
///
/// Rendering itself only fails on I/O; label/argument mismatches are bugs and
/// panic instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Sample document could not be opened or read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing the report failed.
    #[error("write failed: {0}")]
    Write(#[from] std::io::Error),

    /// Sample document is not valid JSON for the expected shape.
    #[error("malformed sample document: {0}")]
    Json(#[from] serde_json::Error),

    /// Sample document parsed but violates a document-level rule.
    #[error("invalid sample document: {0}")]
    InvalidSampleFile(String),

    /// Activity name not recognised.
    #[error("unknown activity '{0}'")]
    UnknownActivity(String),

    /// Entity list such as `--cpus 0,2` could not be parsed.
    #[error("invalid selection '{0}'")]
    InvalidSelection(String),

    /// Report options are inconsistent.
    #[error("invalid report configuration: {0}")]
    InvalidConfig(String),
}
