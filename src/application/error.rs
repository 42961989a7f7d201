//! Application-level errors (wraps domain errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::StoreError;

/// Application errors wrap store errors and add dataset-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("dataset not found: {0}")]
    DatasetNotFound(PathBuf),

    #[error("dataset already exists: {0}")]
    DatasetExists(PathBuf),

    #[error("invalid dataset {path}: {source}")]
    InvalidDataset {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialization failed: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("I/O failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
