//! Key-value storage backends for persisted table state.
//!
//! [`FileStore`] keeps one JSON document per key and writes through a
//! temporary file followed by a rename, so a crash mid-write leaves the
//! previous value intact.

use std::collections::HashMap;
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    /// The backend refuses all access (e.g. storage disabled).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage quota exceeded writing `{key}`")]
    QuotaExceeded { key: String },
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Opaque string store. Absent keys read as `None`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    /// Byte budget across all values; `None` is unbounded.
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that fails writes once the stored values would exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(bytes),
        }
    }

    fn used_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(_, value)| value.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            if self.used_without(key) + value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid || key.starts_with('.') {
            return Err(StorageError::Unavailable(format!("invalid key `{key}`")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn atomic_write(path: &Path, data: &[u8]) -> Result<(), StorageError> {
        let temp_path = path.with_extension("json.tmp");
        {
            let mut file = std::fs::File::create(&temp_path)?;
            file.write_all(data)?;
            file.sync_all()?;
        }
        std::fs::rename(&temp_path, path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        Self::atomic_write(&path, value.as_bytes())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        match std::fs::remove_file(&path) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_memory_quota() {
        let mut store = MemoryStore::with_quota(8);
        store.set("a", "12345").unwrap();
        // Overwriting frees the old value first.
        store.set("a", "1234567").unwrap();
        let err = store.set("b", "12").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn test_file_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(temp_dir.path().join("state")).unwrap();
        assert_eq!(store.get("roulette.balance").unwrap(), None);

        store.set("roulette.balance", "100000").unwrap();
        store.set("roulette.balance", "135000").unwrap();
        assert_eq!(
            store.get("roulette.balance").unwrap().as_deref(),
            Some("135000")
        );
        assert!(store.dir().join("roulette.balance.json").exists());
        assert!(!store.dir().join("roulette.balance.json.tmp").exists());

        // A second handle sees the same data.
        let reopened = FileStore::open(store.dir()).unwrap();
        assert_eq!(
            reopened.get("roulette.balance").unwrap().as_deref(),
            Some("135000")
        );

        store.remove("roulette.balance").unwrap();
        store.remove("roulette.balance").unwrap();
        assert_eq!(store.get("roulette.balance").unwrap(), None);
    }

    #[test]
    fn test_file_rejects_path_keys() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(temp_dir.path()).unwrap();
        assert!(matches!(
            store.set("../escape", "x"),
            Err(StorageError::Unavailable(_))
        ));
        assert!(store.get("").is_err());
    }
}
