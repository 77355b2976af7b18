use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::Result;
use crate::observe::{ChangeListener, ListenerHandle, ListenerSet, ObservableSettings};
use crate::settings::Settings;
use crate::value::Value;

/// In-memory, HashMap-based settings backend.
///
/// Intended for tests, prototyping, and ephemeral state. Entries are held
/// behind a `RwLock` for safe concurrent access and cloned on read.
/// Supports change observation: listeners fire after every successful
/// mutation of their key, and `clear` notifies every listener.
pub struct MemorySettings {
    entries: RwLock<HashMap<String, Value>>,
    listeners: ListenerSet,
}

impl MemorySettings {
    /// Create a new empty in-memory backend.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            listeners: ListenerSet::new(),
        }
    }
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings for MemorySettings {
    fn get_value(&self, key: &str) -> Result<Option<Value>> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    fn put_value(&self, key: &str, value: Value) -> Result<()> {
        {
            let mut map = self.entries.write().expect("lock poisoned");
            map.insert(key.to_string(), value);
        }
        // Notify outside the lock so listeners can re-read the store.
        self.listeners.notify(key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let existed = {
            let mut map = self.entries.write().expect("lock poisoned");
            map.remove(key).is_some()
        };
        if existed {
            self.listeners.notify(key);
        }
        Ok(existed)
    }

    fn clear(&self) -> Result<()> {
        {
            let mut map = self.entries.write().expect("lock poisoned");
            map.clear();
        }
        self.listeners.notify_all();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let map = self.entries.read().expect("lock poisoned");
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

impl ObservableSettings for MemorySettings {
    fn add_listener(&self, key: &str, listener: ChangeListener) -> ListenerHandle {
        self.listeners.register(key, listener)
    }
}

impl std::fmt::Debug for MemorySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.entries.read().expect("lock poisoned").len();
        f.debug_struct("MemorySettings")
            .field("entry_count", &count)
            .finish()
    }
}
