//! Error types for record stores, sinks and runs.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for corpus operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for corpus I/O and encoding.
#[derive(Error, Debug)]
pub enum Error {
    /// File system error tied to a specific path.
    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Delimited text error.
    #[error("tsv error: {0}")]
    Csv(#[from] csv::Error),

    /// A record does not fit the store it is written to.
    #[error("format mismatch: {0}")]
    FormatMismatch(String),
}

impl Error {
    /// Wraps an IO error with the path it happened on.
    pub fn file(path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::File {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns true if the underlying cause is a missing file.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::File { source, .. } | Error::Io(source) => {
                source.kind() == io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}

/// Terminal condition of a run that did not complete.
///
/// Commands propagate this with `?`; "limit reached" stays distinguishable
/// from genuine failures.
#[derive(Error, Debug)]
pub enum RunError {
    /// The per-run cap on successful commits was reached.
    #[error("limit reached at record {index}")]
    LimitReached { index: usize },

    /// A single record could not be processed; it has been requeued.
    #[error("record {index} failed: {cause:#}")]
    RowFailed { index: usize, cause: anyhow::Error },

    /// Input, sink or requeue I/O failed.
    #[error(transparent)]
    Fatal(#[from] Error),
}

impl RunError {
    /// Returns true if the run stopped on its limit rather than a failure.
    pub fn is_limit(&self) -> bool {
        matches!(self, RunError::LimitReached { .. })
    }
}
