//! Configuration error types.

use paramstage_storage::StorageError;
use thiserror::Error;

use crate::session::SessionState;
use crate::validation::ChainedValidationResults;

/// Configuration operation result type.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error types.
///
/// Ordinary invalid input is not an error: it is reported through
/// [`ChainedValidationResults`]. The variants here terminate the current
/// operation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Storage error while probing the medium.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A configuration file exists but cannot be opened, parsed or written.
    /// The medium is assumed to be corrupted.
    #[error("Storage inconsistency in '{file}': {source}")]
    StorageInconsistency {
        /// The file that failed.
        file: String,
        /// The underlying storage failure.
        source: StorageError,
    },

    /// Validation failed.
    #[error("Validation failed:\n{0}")]
    Validation(ChainedValidationResults),

    /// The session already reached a terminal state.
    #[error("Session already finished ({0:?})")]
    SessionFinished(SessionState),

    /// The front-end failed to collect input.
    #[error("Front-end error: {0}")]
    FrontEnd(String),
}

impl ConfigError {
    /// Creates a storage inconsistency error for `file`.
    pub fn inconsistency(file: impl Into<String>, source: StorageError) -> Self {
        let file = file.into();
        tracing::error!(file = %file, error = %source, "Configuration storage is inconsistent");
        ConfigError::StorageInconsistency { file, source }
    }

    /// Returns true if the error signals a corrupted medium.
    pub fn is_inconsistency(&self) -> bool {
        matches!(self, ConfigError::StorageInconsistency { .. })
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::FrontEnd(err.to_string())
    }
}
