//! Storage error types.

use thiserror::Error;

use crate::types::ValueKind;

/// Storage operation result type.
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage error types.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from the underlying storage engine.
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// File does not exist on the medium.
    #[error("File not found: '{0}'")]
    FileNotFound(String),

    /// The medium refused to open the file.
    #[error("Cannot open file '{file}': {reason}")]
    OpenFailed {
        /// Name of the file.
        file: String,
        /// Why the open was refused.
        reason: String,
    },

    /// A second file was opened while another one is still open.
    #[error("File '{open}' is still open; only one file may be open at a time")]
    AlreadyOpen {
        /// The file currently holding the medium.
        open: String,
    },

    /// Read or write without an open file.
    #[error("No file is open")]
    NotOpen,

    /// Write attempted on a file opened for reading.
    #[error("File '{0}' is open read-only")]
    ReadOnly(String),

    /// The stored value has a different primitive kind than requested.
    #[error("Type mismatch for key '{key}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Key being read.
        key: String,
        /// Requested kind.
        expected: ValueKind,
        /// Kind actually stored.
        found: ValueKind,
    },

    /// A float that is NaN or infinite cannot be stored.
    #[error("Value for key '{0}' is not a finite number")]
    NonFinite(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<redb::Error> for StorageError {
    fn from(err: redb::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<redb::DatabaseError> for StorageError {
    fn from(err: redb::DatabaseError) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<redb::TableError> for StorageError {
    fn from(err: redb::TableError) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<redb::TransactionError> for StorageError {
    fn from(err: redb::TransactionError) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<redb::CommitError> for StorageError {
    fn from(err: redb::CommitError) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<redb::StorageError> for StorageError {
    fn from(err: redb::StorageError) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() {
            StorageError::Deserialization(err.to_string())
        } else {
            StorageError::Serialization(err.to_string())
        }
    }
}
