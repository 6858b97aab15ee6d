#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use log::debug;
use crate::common::{StorageError, StorageReadError};
use crate::transaction::Transaction;

/// Key under which the whole transaction collection is stored.
pub(crate) const STORAGE_KEY: &str = "expenseTrackerData";

/// Minimal string key-value storage, the same shape as a browser's local storage.
pub(crate) trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Stores each key as `<dir>/<key>.json`.
pub(crate) struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub(crate) fn new(dir: &Path) -> FileStorage {
        FileStorage { dir: dir.to_path_buf() }
    }

    pub(crate) fn path_of(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_of(key);
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    debug!("Unable to read {}: {}", path.display(), e);
                }
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io { key: key.to_string(), source };

        fs::create_dir_all(&self.dir).map_err(io_err)?;
        // Write a sibling file, then rename it over the target
        let path = self.path_of(key);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value).map_err(io_err)?;
        fs::rename(&tmp_path, &path).map_err(io_err)?;
        Ok(())
    }
}

#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemoryStorage {
    pub(crate) entries: HashMap<String, String>,
    /// When set, every `set` fails as a full disk would
    pub(crate) fail_writes: bool,
}

#[cfg(test)]
impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            let source = std::io::Error::new(ErrorKind::Other, "no space left on device");
            return Err(StorageError::Io { key: key.to_string(), source });
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and writes the whole transaction collection as one JSON array.
pub(crate) struct Store<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> Store<S> {
    pub(crate) fn new(storage: S) -> Store<S> {
        Store { storage }
    }

    /// Load all transactions. Missing or corrupt data gives an empty collection.
    pub(crate) fn load(&self) -> Vec<Transaction> {
        match self.read() {
            Ok(transactions) => transactions,
            Err(e) => {
                debug!("Starting with no transactions: {e}");
                vec![]
            }
        }
    }

    fn read(&self) -> Result<Vec<Transaction>, StorageReadError> {
        let raw = self.storage.get(STORAGE_KEY).ok_or_else(|| StorageReadError::Missing(STORAGE_KEY.to_string()))?;
        Ok(serde_json::from_str::<Vec<Transaction>>(&raw)?)
    }

    /// Overwrite the stored collection with `transactions`.
    pub(crate) fn save(&mut self, transactions: &[Transaction]) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(transactions)?;
        self.storage.set(STORAGE_KEY, &encoded)
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &S {
        &self.storage
    }

    #[cfg(test)]
    pub(crate) fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}
