// Error types for each stage of the upload pipeline.
//
// Manifest and config errors are fatal and abort the run. Photo and
// upload errors are scoped to a single row: the batch driver logs them
// and moves on.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the manifest file.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be opened.
    #[error("Failed to open manifest {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line did not contain exactly five fields.
    #[error("Malformed record on line {line}: expected {expected} fields, found {found}")]
    MalformedRecord {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// The CSV reader failed (I/O error, bad UTF-8, ...).
    #[error("Failed to read manifest record")]
    Read(#[from] csv::Error),
}

/// Errors raised while locating photos for a property.
#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("Failed to read photo directory {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while sending a single listing update.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The token cannot be used as an HTTP header value.
    #[error("Auth token is not a valid header value")]
    InvalidToken,

    /// Building the request or the network round trip failed.
    #[error("Upload request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Invalid values in the process environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}
