//! Error types for the experiment client
//!
//! Every failure is raised to the caller immediately. Nothing is retried.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Experiment client error types
#[derive(Error, Debug)]
pub enum Error {
    /// User-supplied model group, data group or application has the wrong shape
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation invoked before the state it depends on was set
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// `finalize` called while part of the definition is still missing
    #[error("Incomplete experiment definition: {missing} not defined, use '{hint}'")]
    IncompleteDefinition {
        /// Name of the missing piece
        missing: &'static str,
        /// Builder method that sets it
        hint: &'static str,
    },

    /// Declared but unimplemented feature
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// The orchestrator has no further runs for this experiment
    #[error("Experiment '{0}' concluded: no further runs available")]
    ExperimentConcluded(String),

    /// Run session operation invoked in the wrong lifecycle state
    #[error("Invalid run state: {0}")]
    InvalidState(String),

    /// Network failure, timeout or non-2xx response from an external service
    #[error("Transport error: {0}")]
    Transport(String),

    /// Catalog returned a response that could not be interpreted
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}
