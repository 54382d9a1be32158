//! File-backed key-value store.
//!
//! Each key is a file in the data directory (`~/.velocollab/` by default)
//! holding the raw value. Every call touches the file system; nothing is
//! cached in memory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::StoreConfig;
use crate::error::{PersistenceError, PersistenceResult};
use crate::traits::KeyValueStore;

/// File-backed [`KeyValueStore`].
///
/// # Example
///
/// ```ignore
/// use velocollab::adapters::FileKeyValueStore;
/// use velocollab::traits::KeyValueStore;
///
/// let store = FileKeyValueStore::with_dir("/tmp/velocollab");
/// store.write("velocollab-theme", "dark")?;
/// ```
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store for the directory configured in `config`.
    ///
    /// # Returns
    /// The store, or an error if no directory is configured and the home
    /// directory cannot be determined.
    pub fn new(config: &StoreConfig) -> PersistenceResult<Self> {
        config
            .resolve_data_dir()
            .map(Self::with_dir)
            .ok_or_else(|| {
                PersistenceError::Unavailable("Failed to determine home directory".to_string())
            })
    }

    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the value files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Map a key to its file, rejecting keys that could escape the directory.
    fn path_for(&self, key: &str) -> PersistenceResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn read(&self, key: &str) -> PersistenceResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> PersistenceResult<()> {
        let path = self.path_for(key)?;
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        // Readers never observe a partially written value
        let tmp = self.dir.join(format!(".{}.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn erase(&self, key: &str) -> PersistenceResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
