use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

use crate::client::provider::lock;
use crate::common::{SessionSnapshot, SNAPSHOT_KEY};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid storage key {0:?}")]
    InvalidKey(String),

    #[error("Failed to {action} {key:?}: {source}")]
    Io {
        action: &'static str,
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed stored value: {0}")]
    Json(#[from] serde_json::Error),
}

/// Small key-value capability the session snapshot is persisted through
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value in one step
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// One file per key under the user's cache directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new() -> Result<Self, StorageError> {
        let dir = dirs::cache_dir()
            .ok_or_else(|| StorageError::Unavailable("Could not find cache directory".into()))?
            .join("dashboard")
            .join("session");
        Self::with_dir(dir)
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
                action: "create directory for",
                key: dir.display().to_string(),
                source,
            })?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let value = fs::read_to_string(&path).map_err(|source| StorageError::Io {
            action: "read",
            key: key.to_string(),
            source,
        })?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp_path = self.dir.join(format!(".{}.json.tmp", key));
        let io_err = |action: &'static str| {
            move |source| StorageError::Io {
                action,
                key: key.to_string(),
                source,
            }
        };

        fs::write(&tmp_path, value).map_err(io_err("write"))?;

        // Set permissions to 0600 (read/write for owner only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&tmp_path)
                .map_err(io_err("read permissions of"))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&tmp_path, perms).map_err(io_err("set permissions of"))?;
        }

        fs::rename(&tmp_path, &path).map_err(io_err("replace"))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        if path.exists() {
            fs::remove_file(&path).map_err(|source| StorageError::Io {
                action: "remove",
                key: key.to_string(),
                source,
            })?;
        }
        Ok(())
    }
}

/// In-process store for tests and sessions that should not outlive the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

impl SessionSnapshot {
    /// Overwrite the stored snapshot
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set(SNAPSHOT_KEY, &json)
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<Self>, StorageError> {
        match store.get(SNAPSHOT_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn clear<S: KeyValueStore + ?Sized>(store: &S) -> Result<(), StorageError> {
        store.remove(SNAPSHOT_KEY)
    }
}
