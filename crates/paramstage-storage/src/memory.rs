//! In-memory storage medium.
//!
//! Provides a simple in-memory implementation of the StorageMedium trait.
//! Useful for testing and development. Data is not persisted across restarts.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{StorageError, StorageResult};
use crate::medium::StorageMedium;
use crate::types::{FileMode, StoredValue};

type FileContents = BTreeMap<String, StoredValue>;

#[derive(Debug)]
struct OpenFile {
    name: String,
    mode: FileMode,
    // Writes land here until the file is closed; `None` for reads.
    pending: Option<FileContents>,
}

/// In-memory storage medium.
///
/// Files are ordered maps from key to [`StoredValue`]. A file opened for
/// [`FileMode::Write`] starts empty, [`FileMode::Append`] starts from its
/// current contents, and [`FileMode::Read`] requires it to exist. Writes
/// are buffered and replace the stored file only when it is closed with a
/// commit.
///
/// A file can be marked as damaged with [`InMemoryMedium::damage`]; the
/// medium then refuses to open or remove it, which is how a corrupted
/// storage device presents itself.
///
/// # Example
///
/// ```rust
/// use paramstage_storage::{InMemoryMedium, StorageMedium, StoredValue};
///
/// let medium = InMemoryMedium::new()
///     .with_file("display", [("brightness", StoredValue::U8(7))]);
/// assert!(medium.exists("display").unwrap());
/// assert!(!medium.exists("network").unwrap());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryMedium {
    files: BTreeMap<String, FileContents>,
    damaged: BTreeSet<String>,
    open: Option<OpenFile>,
}

impl InMemoryMedium {
    /// Creates a new empty in-memory medium.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a file with the given entries.
    pub fn with_file<K, I>(mut self, file_name: &str, entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, StoredValue)>,
    {
        self.files.insert(
            file_name.to_string(),
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        );
        self
    }

    /// Marks a file as damaged: it still exists, but can be neither opened
    /// nor removed.
    pub fn damage(&mut self, file_name: &str) {
        self.damaged.insert(file_name.to_string());
    }

    /// Returns true while a file is open.
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Returns the names of all files, in order.
    pub fn file_names(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    /// Returns the contents of a file.
    pub fn file(&self, file_name: &str) -> Option<&BTreeMap<String, StoredValue>> {
        self.files.get(file_name)
    }

    /// Clears all files.
    pub fn clear(&mut self) {
        self.files.clear();
        self.damaged.clear();
        self.open = None;
    }

    fn current(&self) -> StorageResult<&OpenFile> {
        self.open.as_ref().ok_or(StorageError::NotOpen)
    }
}

impl StorageMedium for InMemoryMedium {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn open_file(&mut self, file_name: &str, mode: FileMode) -> StorageResult<()> {
        if let Some(open) = &self.open {
            return Err(StorageError::AlreadyOpen {
                open: open.name.clone(),
            });
        }
        if self.damaged.contains(file_name) {
            return Err(StorageError::OpenFailed {
                file: file_name.to_string(),
                reason: "file is damaged".to_string(),
            });
        }

        let pending = match mode {
            FileMode::Read => {
                if !self.files.contains_key(file_name) {
                    return Err(StorageError::FileNotFound(file_name.to_string()));
                }
                None
            }
            FileMode::Write => Some(FileContents::new()),
            FileMode::Append => Some(self.files.get(file_name).cloned().unwrap_or_default()),
        };

        self.open = Some(OpenFile {
            name: file_name.to_string(),
            mode,
            pending,
        });
        Ok(())
    }

    fn close_file(&mut self) -> StorageResult<()> {
        if let Some(OpenFile {
            name,
            pending: Some(contents),
            ..
        }) = self.open.take()
        {
            self.files.insert(name, contents);
        }
        Ok(())
    }

    fn discard_file(&mut self) -> StorageResult<()> {
        self.open = None;
        Ok(())
    }

    fn file_exists(&self, file_name: &str) -> StorageResult<bool> {
        Ok(self.files.contains_key(file_name))
    }

    fn file_contains(&self, file_name: &str, keys: &[&str]) -> StorageResult<bool> {
        Ok(self
            .files
            .get(file_name)
            .map(|contents| keys.iter().all(|key| contents.contains_key(*key)))
            .unwrap_or(false))
    }

    fn remove_file(&mut self, file_name: &str) -> StorageResult<bool> {
        if self.damaged.contains(file_name) {
            return Ok(false);
        }
        if self.open.as_ref().is_some_and(|open| open.name == file_name) {
            return Err(StorageError::AlreadyOpen {
                open: file_name.to_string(),
            });
        }
        Ok(self.files.remove(file_name).is_some())
    }

    fn read_raw(&self, key: &str) -> StorageResult<Option<StoredValue>> {
        let open = self.current()?;
        let contents = match &open.pending {
            Some(pending) => Some(pending),
            None => self.files.get(&open.name),
        };
        Ok(contents.and_then(|contents| contents.get(key)).cloned())
    }

    fn write_raw(&mut self, key: &str, value: StoredValue) -> StorageResult<()> {
        let open = self.open.as_mut().ok_or(StorageError::NotOpen)?;
        let Some(pending) = open.pending.as_mut() else {
            return Err(StorageError::ReadOnly(open.name.clone()));
        };
        if !value.is_storable() {
            return Err(StorageError::NonFinite(key.to_string()));
        }
        pending.insert(key.to_string(), value);
        Ok(())
    }
}
