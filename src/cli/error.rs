//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::StoreError;
use crate::exitcode;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("selection failed: {0}")]
    Selection(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Application(ApplicationError::Store(e))
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => exitcode::USAGE,
            CliError::Selection(_) => exitcode::SOFTWARE,
            CliError::Application(e) => match e {
                ApplicationError::Store(_) => exitcode::DATAERR,
                ApplicationError::DatasetNotFound(_) => exitcode::NOINPUT,
                ApplicationError::DatasetExists(_) => exitcode::CANTCREAT,
                ApplicationError::InvalidDataset { .. } => exitcode::DATAERR,
                ApplicationError::Serialize { .. } => exitcode::SOFTWARE,
                ApplicationError::Config { .. } => exitcode::CONFIG,
                ApplicationError::Io { .. } => exitcode::IOERR,
            },
        }
    }
}
