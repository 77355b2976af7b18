use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use prefs_core::{Error, Result, Settings, Value};
use tempfile::NamedTempFile;
use tracing::debug;

/// File-backed settings store.
///
/// The full map lives in memory behind a `RwLock`; the on-disk form is a
/// single JSON document (`{"key": {"Int": 3}, ...}`). Every mutation
/// rewrites the document: the new content is written to a named temp file
/// in the same directory and renamed over the old document, so readers
/// and crash recovery only ever see a complete document.
///
/// Writes are durable up to the rename; whether the rename itself has hit
/// stable storage is the filesystem's concern.
pub struct FileSettings {
    path: PathBuf,
    entries: RwLock<HashMap<String, Value>>,
}

impl FileSettings {
    /// Open (or create) a settings document at the given path.
    ///
    /// A missing file starts the store empty; the document is created on
    /// the first mutation. A present but unreadable or malformed file is
    /// an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        // Ensure parent directory exists.
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let map: HashMap<String, Value> = serde_json::from_str(&content)
                .map_err(|e| Error::Serialization(e.to_string()))?;
            debug!(path = %path.display(), entries = map.len(), "loaded settings document");
            map
        } else {
            debug!(path = %path.display(), "no settings document, starting empty");
            HashMap::new()
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize `map` and atomically replace the document.
    ///
    /// Called with the write lock held so the on-disk order of documents
    /// matches the order of mutations.
    fn persist(&self, map: &HashMap<String, Value>) -> Result<()> {
        let json = serde_json::to_vec_pretty(map)
            .map_err(|e| Error::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        debug!(path = %self.path.display(), entries = map.len(), "persisted settings document");
        Ok(())
    }
}

impl Settings for FileSettings {
    fn get_value(&self, key: &str) -> Result<Option<Value>> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    fn put_value(&self, key: &str, value: Value) -> Result<()> {
        let mut map = self.entries.write().expect("lock poisoned");
        map.insert(key.to_string(), value);
        self.persist(&map)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut map = self.entries.write().expect("lock poisoned");
        if map.remove(key).is_none() {
            return Ok(false);
        }
        self.persist(&map)?;
        Ok(true)
    }

    fn clear(&self) -> Result<()> {
        let mut map = self.entries.write().expect("lock poisoned");
        map.clear();
        self.persist(&map)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let map = self.entries.read().expect("lock poisoned");
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

impl std::fmt::Debug for FileSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.entries.read().expect("lock poisoned").len();
        f.debug_struct("FileSettings")
            .field("path", &self.path)
            .field("entry_count", &count)
            .finish()
    }
}
