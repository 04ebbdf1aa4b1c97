//! RedbMedium implementation.
//!
//! Implements the StorageMedium trait using redb as the underlying database.

use std::collections::BTreeMap;
use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};

use crate::error::{StorageError, StorageResult};
use crate::medium::StorageMedium;
use crate::types::{FileMode, StoredValue};

// Table definitions
const FILES_TABLE: TableDefinition<&str, u64> = TableDefinition::new("files");
const VALUES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("values");

/// Separates the file name from the key in `VALUES_TABLE` keys.
const KEY_SEPARATOR: char = '\u{1f}';

#[derive(Debug)]
struct OpenFile {
    name: String,
    mode: FileMode,
    entries: BTreeMap<String, StoredValue>,
}

/// Redb-based storage medium.
///
/// Each file is a set of rows in one values table keyed by
/// `<file><US><key>`, plus a marker row in the files table. Opening a file
/// takes a snapshot of its rows; writes are buffered and committed in a
/// single transaction by `close_file`, or dropped by `discard_file`, so a
/// file is never left half-written.
///
/// # Example
///
/// ```rust,ignore
/// use paramstage_storage::{FileMode, RedbMedium, StorageMedium};
///
/// let mut medium = RedbMedium::open("./settings.redb")?;
/// let mut file = medium.open("network", FileMode::Write)?;
/// file.write("port", 8080u16)?;
/// file.dispose()?;
/// ```
pub struct RedbMedium {
    db: Database,
    open: Option<OpenFile>,
}

impl RedbMedium {
    /// Opens or creates a database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let medium = Self { db, open: None };
        medium.initialize_tables()?;
        Ok(medium)
    }

    /// Initializes all required tables.
    fn initialize_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(FILES_TABLE)?;
            let _ = write_txn.open_table(VALUES_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Creates the prefix shared by all rows of a file.
    fn file_prefix(file_name: &str) -> String {
        format!("{}{}", file_name, KEY_SEPARATOR)
    }

    /// Creates the composite key for one entry.
    fn entry_key(file_name: &str, key: &str) -> String {
        format!("{}{}{}", file_name, KEY_SEPARATOR, key)
    }

    /// Reads all entries of a file.
    fn load_entries(&self, file_name: &str) -> StorageResult<BTreeMap<String, StoredValue>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(VALUES_TABLE)?;
        let prefix = Self::file_prefix(file_name);

        let mut entries = BTreeMap::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            if let Some(name) = key.value().strip_prefix(&prefix) {
                let stored: StoredValue = serde_json::from_slice(value.value())?;
                entries.insert(name.to_string(), stored);
            }
        }
        Ok(entries)
    }

    /// Replaces all rows of a file in one transaction.
    fn commit_file(&self, file: &OpenFile) -> StorageResult<()> {
        let prefix = Self::file_prefix(&file.name);
        let write_txn = self.db.begin_write()?;
        {
            let mut values = write_txn.open_table(VALUES_TABLE)?;

            let mut stale = Vec::new();
            for entry in values.iter()? {
                let (key, _) = entry?;
                if key.value().starts_with(&prefix) {
                    stale.push(key.value().to_string());
                }
            }
            for key in &stale {
                values.remove(key.as_str())?;
            }

            for (key, value) in &file.entries {
                let data = serde_json::to_vec(value)?;
                let row_key = Self::entry_key(&file.name, key);
                values.insert(row_key.as_str(), data.as_slice())?;
            }

            let mut files = write_txn.open_table(FILES_TABLE)?;
            files.insert(file.name.as_str(), file.entries.len() as u64)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn current(&self) -> StorageResult<&OpenFile> {
        self.open.as_ref().ok_or(StorageError::NotOpen)
    }
}

impl StorageMedium for RedbMedium {
    fn backend_name(&self) -> &'static str {
        "redb"
    }

    fn open_file(&mut self, file_name: &str, mode: FileMode) -> StorageResult<()> {
        if let Some(open) = &self.open {
            return Err(StorageError::AlreadyOpen {
                open: open.name.clone(),
            });
        }

        let entries = match mode {
            FileMode::Read => {
                if !self.file_exists(file_name)? {
                    return Err(StorageError::FileNotFound(file_name.to_string()));
                }
                self.load_entries(file_name)?
            }
            FileMode::Write => BTreeMap::new(),
            FileMode::Append => self.load_entries(file_name)?,
        };

        self.open = Some(OpenFile {
            name: file_name.to_string(),
            mode,
            entries,
        });
        Ok(())
    }

    fn close_file(&mut self) -> StorageResult<()> {
        match self.open.take() {
            Some(file) if file.mode.is_writable() => self.commit_file(&file),
            _ => Ok(()),
        }
    }

    fn discard_file(&mut self) -> StorageResult<()> {
        self.open = None;
        Ok(())
    }

    fn file_exists(&self, file_name: &str) -> StorageResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(FILES_TABLE)?;
        let exists = table.get(file_name)?.is_some();
        Ok(exists)
    }

    fn file_contains(&self, file_name: &str, keys: &[&str]) -> StorageResult<bool> {
        let entries = self.load_entries(file_name)?;
        Ok(keys.iter().all(|key| entries.contains_key(*key)))
    }

    fn remove_file(&mut self, file_name: &str) -> StorageResult<bool> {
        if self.open.as_ref().is_some_and(|open| open.name == file_name) {
            return Err(StorageError::AlreadyOpen {
                open: file_name.to_string(),
            });
        }

        let prefix = Self::file_prefix(file_name);
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut values = write_txn.open_table(VALUES_TABLE)?;
            let mut stale = Vec::new();
            for entry in values.iter()? {
                let (key, _) = entry?;
                if key.value().starts_with(&prefix) {
                    stale.push(key.value().to_string());
                }
            }
            for key in &stale {
                values.remove(key.as_str())?;
            }

            let mut files = write_txn.open_table(FILES_TABLE)?;
            let result = files.remove(file_name)?;
            result.is_some()
        };
        write_txn.commit()?;
        Ok(removed)
    }

    fn read_raw(&self, key: &str) -> StorageResult<Option<StoredValue>> {
        Ok(self.current()?.entries.get(key).cloned())
    }

    fn write_raw(&mut self, key: &str, value: StoredValue) -> StorageResult<()> {
        let open = self.open.as_mut().ok_or(StorageError::NotOpen)?;
        if !open.mode.is_writable() {
            return Err(StorageError::ReadOnly(open.name.clone()));
        }
        // serde_json turns NaN and infinities into null, which never reads back
        if !value.is_storable() {
            return Err(StorageError::NonFinite(key.to_string()));
        }
        open.entries.insert(key.to_string(), value);
        Ok(())
    }
}

impl std::fmt::Debug for RedbMedium {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbMedium")
            .field("open", &self.open.as_ref().map(|o| o.name.as_str()))
            .finish()
    }
}
