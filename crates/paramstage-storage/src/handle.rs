//! Scoped file handles.

use crate::error::{StorageError, StorageResult};
use crate::medium::StorageMedium;
use crate::types::{FileMode, StorageValue, StoredValue};

/// An open file on a [`StorageMedium`].
///
/// The handle mutably borrows its medium, so no second file can be opened
/// while it lives. [`FileHandle::dispose`] closes the file and commits its
/// writes. A handle dropped without being disposed, for instance on an
/// early `?` return, closes the file and discards every pending write, so
/// a failed save leaves the previous contents in place.
pub struct FileHandle<'a> {
    medium: &'a mut dyn StorageMedium,
    file_name: String,
    mode: FileMode,
    disposed: bool,
}

impl<'a> FileHandle<'a> {
    /// Opens `file_name` on `medium`.
    pub fn open(
        medium: &'a mut dyn StorageMedium,
        file_name: &str,
        mode: FileMode,
    ) -> StorageResult<Self> {
        medium.open_file(file_name, mode)?;
        Ok(Self {
            medium,
            file_name: file_name.to_string(),
            mode,
            disposed: false,
        })
    }

    /// Name of the open file.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Mode the file was opened with.
    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// Reads a typed value, returning `default` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::TypeMismatch`] if the key holds a value of a
    /// different kind.
    pub fn read<T: StorageValue>(&self, key: &str, default: T) -> StorageResult<T> {
        Ok(self.read_optional(key)?.unwrap_or(default))
    }

    /// Reads a typed value, returning `None` if the key is absent.
    pub fn read_optional<T: StorageValue>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.medium.read_raw(key)? {
            None => Ok(None),
            Some(value) => {
                let found = value.kind();
                T::from_stored(value)
                    .map(Some)
                    .ok_or_else(|| StorageError::TypeMismatch {
                        key: key.to_string(),
                        expected: T::KIND,
                        found,
                    })
            }
        }
    }

    /// Reads a value of any kind.
    pub fn read_raw(&self, key: &str) -> StorageResult<Option<StoredValue>> {
        self.medium.read_raw(key)
    }

    /// Writes a typed value.
    pub fn write<T: StorageValue>(&mut self, key: &str, value: T) -> StorageResult<()> {
        self.write_raw(key, value.into_stored())
    }

    /// Writes a value of any kind.
    pub fn write_raw(&mut self, key: &str, value: StoredValue) -> StorageResult<()> {
        if !self.mode.is_writable() {
            return Err(StorageError::ReadOnly(self.file_name.clone()));
        }
        self.medium.write_raw(key, value)
    }

    /// Closes the file, committing its writes, and reports whether the
    /// commit succeeded.
    pub fn dispose(mut self) -> StorageResult<()> {
        self.disposed = true;
        self.medium.close_file()
    }
}

impl Drop for FileHandle<'_> {
    fn drop(&mut self) {
        if self.disposed {
            return;
        }
        if self.mode.is_writable() {
            tracing::debug!(file = %self.file_name, "Discarding uncommitted writes");
        }
        if let Err(e) = self.medium.discard_file() {
            tracing::error!(file = %self.file_name, error = %e, "Failed to close file");
        }
    }
}

impl std::fmt::Debug for FileHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileHandle")
            .field("backend", &self.medium.backend_name())
            .field("file_name", &self.file_name)
            .field("mode", &self.mode)
            .finish()
    }
}
