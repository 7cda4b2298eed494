//! String-keyed storage backends.
//!
//! A [`Storage`] is a synchronous key-value facility holding one opaque text
//! record per key. Backends report failures; deciding what to do about them
//! is left to the caller.

use crate::error::StorageError;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Synchronous string-keyed storage service
pub trait Storage: Send + Sync {
    /// Read the record stored under `key`, or `None` when there is none
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous record
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the record under `key`; deleting a missing key succeeds
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Volatile storage kept in a `HashMap`
///
/// Used in tests and when durable storage is switched off.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty memory storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory storage pre-populated with one record
    #[must_use]
    pub fn with_record(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
        storage
    }

    /// Number of stored records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no records are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// Durable storage keeping each record in its own file under a directory
///
/// The directory is created on first write. Writes go to a temporary file
/// that is then renamed over the record, so a crash mid-write leaves the
/// previous record intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `dir`
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the record files
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path used for `key`
    ///
    /// Bytes outside `[A-Za-z0-9._-]` are percent-encoded (`%XX`), so
    /// distinct keys always map to distinct files.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-') {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("%{byte:02X}"));
            }
        }
        self.dir.join(format!("{name}.json"))
    }

    fn io_error(key: &str, source: std::io::Error) -> StorageError {
        StorageError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(key, e))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|e| Self::io_error(key, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| {
            if let Err(cleanup) = std::fs::remove_file(&tmp) {
                tracing::debug!(path = %tmp.display(), error = %cleanup, "Failed to remove temp file");
            }
            Self::io_error(key, e)
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }
}

/// Storage for environments without any persistent facility
///
/// Every call fails with [`StorageError::Unavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStorage;

impl Storage for UnavailableStorage {
    fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert!(storage.read("k").unwrap().is_none());

        storage.write("k", "v1").unwrap();
        storage.write("k", "v2").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(storage.len(), 1);

        storage.remove("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn memory_storage_with_record() {
        let storage = MemoryStorage::with_record("user-storage", "{}");
        assert_eq!(storage.read("user-storage").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert!(storage.read("user-storage").unwrap().is_none());
        storage.write("user-storage", "{\"a\":1}").unwrap();
        assert_eq!(
            storage.read("user-storage").unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        storage.remove("user-storage").unwrap();
        assert!(storage.read("user-storage").unwrap().is_none());
        // Removing twice is fine
        storage.remove("user-storage").unwrap();
    }

    #[test]
    fn file_storage_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.write("k", "v").unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["k.json".to_string()]);
    }

    #[test]
    fn file_storage_encodes_keys() {
        let storage = FileStorage::new("/tmp/statekit");
        assert_eq!(storage.dir(), Path::new("/tmp/statekit"));

        let path = storage.path_for("../user storage");
        assert_eq!(path, PathBuf::from("/tmp/statekit/..%2Fuser%20storage.json"));
        assert_eq!(storage.path_for("user-storage"), PathBuf::from("/tmp/statekit/user-storage.json"));
    }

    #[test]
    fn file_storage_keeps_similar_keys_apart() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        let keys = ["user storage", "user_storage", "user/storage", "user%20storage", "usér", "usèr"];

        for (i, key) in keys.iter().enumerate() {
            storage.write(key, &i.to_string()).unwrap();
        }
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(storage.read(key).unwrap(), Some(i.to_string()), "key {key:?}");
        }
    }

    #[test]
    fn file_storage_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        // A non-empty directory where the record file should go blocks the rename.
        let target = storage.path_for("k");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("occupied"), "x").unwrap();

        let result = storage.write("k", "v");
        assert!(matches!(result, Err(StorageError::Io { .. })));
        assert!(!target.with_extension("json.tmp").exists());
    }

    #[test]
    fn unavailable_storage_always_fails() {
        let storage = UnavailableStorage;
        assert!(matches!(storage.read("k"), Err(StorageError::Unavailable)));
        assert!(matches!(storage.write("k", "v"), Err(StorageError::Unavailable)));
        assert!(matches!(storage.remove("k"), Err(StorageError::Unavailable)));
    }
}
