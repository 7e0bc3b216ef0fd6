//! Durable string-keyed storage.
//!
//! Each key maps to one JSON document. `FileKv` keeps a file per key in
//! the data directory:
//! ```text
//! <DATA_DIR>/
//!   loadloop-users.json
//!   loadloop-current-user.json
//!   loadloop-routes.json
//! ```
//! Writes go through a temp file + rename, so a record is always either
//! the old value or the new one.

#[cfg(test)]
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

/// String-keyed durable storage consumed by the stores.
pub trait KeyValue {
    /// Returns the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError>;

    /// Removes the value stored under `key`. Removing an absent key is
    /// not an error.
    fn remove(&mut self, key: &str) -> Result<(), KvError>;
}

/// Errors from the key-value layer.
#[derive(Debug)]
pub enum KvError {
    /// I/O error reading or writing a record file.
    Io(PathBuf, io::Error),
    /// Key is empty or would escape the data directory.
    InvalidKey(String),
}

impl std::fmt::Display for KvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KvError::Io(path, e) => write!(f, "I/O error for {}: {}", path.display(), e),
            KvError::InvalidKey(key) => write!(f, "Invalid storage key: {}", key),
        }
    }
}

impl std::error::Error for KvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KvError::Io(_, e) => Some(e),
            KvError::InvalidKey(_) => None,
        }
    }
}

/// File-backed store: one JSON file per key under the data directory.
#[derive(Debug, Clone)]
pub struct FileKv {
    data_dir: PathBuf,
}

impl FileKv {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Rejects keys that would resolve outside the data directory.
    fn validate_key(key: &str) -> Result<(), KvError> {
        if key.is_empty()
            || key.contains('/')
            || key.contains('\\')
            || key.contains("..")
            || key.starts_with('.')
        {
            return Err(KvError::InvalidKey(key.to_string()));
        }
        Ok(())
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }
}

impl KeyValue for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Self::validate_key(key)?;

        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(KvError::Io(path, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError> {
        Self::validate_key(key)?;

        fs::create_dir_all(&self.data_dir)
            .map_err(|e| KvError::Io(self.data_dir.clone(), e))?;

        let path = self.key_path(key);

        // Write atomically using temp file + rename
        let temp_path = path.with_extension("json.tmp");

        let mut file =
            File::create(&temp_path).map_err(|e| KvError::Io(temp_path.clone(), e))?;

        file.write_all(value.as_bytes())
            .map_err(|e| KvError::Io(temp_path.clone(), e))?;

        file.sync_all()
            .map_err(|e| KvError::Io(temp_path.clone(), e))?;

        fs::rename(&temp_path, &path).map_err(|e| KvError::Io(path, e))?;

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), KvError> {
        Self::validate_key(key)?;

        let path = self.key_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(KvError::Io(path, e)),
        }
    }
}

/// In-memory store for tests. Nothing survives the process.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: HashMap<String, String>,
}

#[cfg(test)]
impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValue for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), KvError> {
        self.entries.remove(key);
        Ok(())
    }
}
