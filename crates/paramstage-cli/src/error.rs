//! CLI error types.

use paramstage_config::ConfigError;
use paramstage_storage::StorageError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// An assignment is not of the form `category.name=value`.
    #[error("Invalid assignment: {0}. Use category.name=value.")]
    InvalidAssignment(String),

    /// Unknown category.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// The new values did not pass validation.
    #[error("{0} setting(s) rejected, nothing was saved")]
    Rejected(usize),

    /// The medium refused to delete some category files.
    #[error("{0} category file(s) could not be deleted")]
    ResetFailed(usize),

    /// No config directory could be determined.
    #[error("Could not determine config directory; use --db")]
    NoConfigDir,

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
