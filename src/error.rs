use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by a validation engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {path} - {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Failure(#[from] anyhow::Error),
}

/// Outcomes of [`ValidatorAdapter::validate`](crate::adapter::ValidatorAdapter::validate)
/// that produce no report. A failing document is not one of these.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("IO error when opening {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to verify document '{path}'")]
    NoResult { path: String },

    #[error("Validation engine failed on '{path}'")]
    Engine {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AdapterError {
    /// Map an engine error for `path` into the adapter's vocabulary
    pub fn from_engine(path: &str, err: EngineError) -> Self {
        match err {
            EngineError::Io { source, .. } => AdapterError::Io {
                path: path.to_string(),
                source,
            },
            EngineError::Failure(source) => AdapterError::Engine {
                path: path.to_string(),
                source,
            },
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Engine result type alias
pub type EngineResult<T> = std::result::Result<T, EngineError>;
