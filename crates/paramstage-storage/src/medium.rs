//! Storage medium trait definition.
//!
//! This module defines the core `StorageMedium` trait that all storage
//! backends must implement.

use crate::error::StorageResult;
use crate::handle::FileHandle;
use crate::types::{FileMode, StoredValue};

/// Core storage medium trait.
///
/// A medium stores named files, each holding typed key/value pairs. At most
/// one file is open at a time; reads and writes go to that file. Backends
/// implement the primitive operations, while the provided methods apply the
/// guards every caller relies on (empty names never exist, completeness
/// implies existence, deleting a missing file succeeds).
///
/// # Example
///
/// ```rust
/// use paramstage_storage::{FileMode, InMemoryMedium, StorageMedium};
///
/// let mut medium = InMemoryMedium::new();
/// {
///     let mut file = medium.open("wifi", FileMode::Write).unwrap();
///     file.write("ssid", "home".to_string()).unwrap();
///     file.dispose().unwrap();
/// }
/// assert!(medium.is_complete("wifi", &["ssid"]).unwrap());
/// ```
pub trait StorageMedium {
    /// Returns the backend name for logging.
    fn backend_name(&self) -> &'static str;

    // =========================================================================
    // BACKEND PRIMITIVES
    // =========================================================================

    /// Opens `file_name` in the given mode.
    ///
    /// Fails if another file is still open, if `mode` is [`FileMode::Read`]
    /// and the file does not exist, or if the medium cannot open it.
    fn open_file(&mut self, file_name: &str, mode: FileMode) -> StorageResult<()>;

    /// Closes the open file, committing pending writes as one unit. Closing
    /// with no open file is a no-op.
    fn close_file(&mut self) -> StorageResult<()>;

    /// Closes the open file and drops its pending writes, leaving the file
    /// as it was before it was opened. A no-op with no open file.
    fn discard_file(&mut self) -> StorageResult<()>;

    /// Checks whether a file exists.
    fn file_exists(&self, file_name: &str) -> StorageResult<bool>;

    /// Checks whether an existing file holds every one of `keys`.
    fn file_contains(&self, file_name: &str, keys: &[&str]) -> StorageResult<bool>;

    /// Removes an existing file. Returns false if the medium declined.
    fn remove_file(&mut self, file_name: &str) -> StorageResult<bool>;

    /// Reads a key from the open file.
    fn read_raw(&self, key: &str) -> StorageResult<Option<StoredValue>>;

    /// Writes a key to the open file. Non-finite floats are rejected with
    /// [`StorageError::NonFinite`](crate::StorageError::NonFinite).
    fn write_raw(&mut self, key: &str, value: StoredValue) -> StorageResult<()>;

    // =========================================================================
    // GUARDED OPERATIONS
    // =========================================================================

    /// Checks if a file named `file_name` exists on this medium.
    fn exists(&self, file_name: &str) -> StorageResult<bool> {
        if file_name.is_empty() {
            return Ok(false);
        }
        self.file_exists(file_name)
    }

    /// Checks that the file exists and contains all the given keys.
    fn is_complete(&self, file_name: &str, keys: &[&str]) -> StorageResult<bool> {
        if !self.exists(file_name)? {
            return Ok(false);
        }
        self.file_contains(file_name, keys)
    }

    /// Deletes a file.
    ///
    /// Returns true if the file was deleted or never existed, and false if
    /// the medium refused to delete it.
    fn delete(&mut self, file_name: &str) -> StorageResult<bool> {
        if !self.exists(file_name)? {
            return Ok(true);
        }
        self.remove_file(file_name)
    }

    /// Opens a file and returns a handle. Writes are committed by
    /// [`FileHandle::dispose`] and dropped if the handle is dropped instead.
    fn open(&mut self, file_name: &str, mode: FileMode) -> StorageResult<FileHandle<'_>>
    where
        Self: Sized,
    {
        FileHandle::open(self, file_name, mode)
    }
}
