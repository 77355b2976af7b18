//! Per-key change observation for settings backends.
//!
//! A backend that can tell its callers "this key changed" implements
//! [`ObservableSettings`]. The bookkeeping lives in [`ListenerSet`], which
//! backends embed and poke after each successful mutation. Listeners carry
//! no payload; observers re-read the key through the normal accessors.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use tracing::trace;

use crate::settings::Settings;

/// Callback invoked after an observed key changes.
pub type ChangeListener = Box<dyn Fn() + Send + Sync>;

/// Settings backends that can notify observers of per-key changes.
pub trait ObservableSettings: Settings {
    /// Register a listener invoked after every change to `key`.
    ///
    /// The listener stays active until the returned handle is dropped or
    /// [`ListenerHandle::deactivate`]d.
    fn add_listener(&self, key: &str, listener: ChangeListener) -> ListenerHandle;
}

struct Registered {
    id: u64,
    listener: Arc<dyn Fn() + Send + Sync>,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    by_key: HashMap<String, Vec<Registered>>,
}

/// Registry of per-key change listeners, embedded by observable backends.
///
/// Notification is synchronous on the mutating thread. Callbacks are
/// invoked outside the registry lock, so a listener may freely re-enter
/// the settings object or register/deactivate other listeners.
pub struct ListenerSet {
    inner: Arc<Mutex<Inner>>,
}

impl ListenerSet {
    /// Create an empty listener set.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Register a listener for `key` and return its detach handle.
    pub fn register(&self, key: &str, listener: ChangeListener) -> ListenerHandle {
        let mut inner = self.inner.lock().expect("lock poisoned");
        let id = inner.next_id;
        inner.next_id += 1;
        inner.by_key.entry(key.to_string()).or_default().push(Registered {
            id,
            listener: Arc::from(listener),
        });
        ListenerHandle {
            set: Arc::downgrade(&self.inner),
            key: key.to_string(),
            id,
        }
    }

    /// Invoke all listeners registered for `key`.
    pub fn notify(&self, key: &str) {
        let snapshot: Vec<_> = {
            let inner = self.inner.lock().expect("lock poisoned");
            match inner.by_key.get(key) {
                Some(list) => list.iter().map(|r| Arc::clone(&r.listener)).collect(),
                None => return,
            }
        };
        trace!(key, count = snapshot.len(), "notifying key listeners");
        for listener in snapshot {
            listener();
        }
    }

    /// Invoke every registered listener, regardless of key.
    pub fn notify_all(&self) {
        let snapshot: Vec<_> = {
            let inner = self.inner.lock().expect("lock poisoned");
            inner
                .by_key
                .values()
                .flat_map(|list| list.iter().map(|r| Arc::clone(&r.listener)))
                .collect()
        };
        trace!(count = snapshot.len(), "notifying all listeners");
        for listener in snapshot {
            listener();
        }
    }

    /// Total number of registered listeners.
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().expect("lock poisoned");
        inner.by_key.values().map(Vec::len).sum()
    }

    /// Returns `true` if no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ListenerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listener_count", &self.len())
            .finish()
    }
}

/// Handle keeping a registered listener active.
///
/// Dropping the handle detaches the listener. [`deactivate`] is the
/// explicit form for call sites that want to name the intent.
///
/// [`deactivate`]: ListenerHandle::deactivate
pub struct ListenerHandle {
    set: Weak<Mutex<Inner>>,
    key: String,
    id: u64,
}

impl ListenerHandle {
    /// Detach the listener now.
    pub fn deactivate(self) {
        // Drop does the work.
    }

    fn detach(&self) {
        let Some(inner) = self.set.upgrade() else {
            return;
        };
        let mut inner = inner.lock().expect("lock poisoned");
        if let Some(list) = inner.by_key.get_mut(&self.key) {
            list.retain(|r| r.id != self.id);
            if list.is_empty() {
                inner.by_key.remove(&self.key);
            }
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("key", &self.key)
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, ChangeListener) {
        let count = Arc::new(AtomicUsize::new(0));
        let clone = Arc::clone(&count);
        (
            count,
            Box::new(move || {
                clone.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    #[test]
    fn notify_invokes_registered_listener() {
        let set = ListenerSet::new();
        let (count, listener) = counter();
        let _handle = set.register("key", listener);

        set.notify("key");
        set.notify("key");
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn notify_ignores_other_keys() {
        let set = ListenerSet::new();
        let (count, listener) = counter();
        let _handle = set.register("watched", listener);

        set.notify("unrelated");
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn notify_all_reaches_every_key() {
        let set = ListenerSet::new();
        let (count_a, listener_a) = counter();
        let (count_b, listener_b) = counter();
        let _a = set.register("a", listener_a);
        let _b = set.register("b", listener_b);

        set.notify_all();
        assert_eq!(count_a.load(Ordering::SeqCst), 1);
        assert_eq!(count_b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_detaches_listener() {
        let set = ListenerSet::new();
        let (count, listener) = counter();
        let handle = set.register("key", listener);
        assert_eq!(set.len(), 1);

        drop(handle);
        assert!(set.is_empty());

        set.notify("key");
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn deactivate_detaches_listener() {
        let set = ListenerSet::new();
        let (count, listener) = counter();
        let handle = set.register("key", listener);

        handle.deactivate();
        set.notify("key");
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn multiple_listeners_on_one_key() {
        let set = ListenerSet::new();
        let (count_a, listener_a) = counter();
        let (count_b, listener_b) = counter();
        let _a = set.register("key", listener_a);
        let b = set.register("key", listener_b);

        set.notify("key");
        drop(b);
        set.notify("key");

        assert_eq!(count_a.load(Ordering::SeqCst), 2);
        assert_eq!(count_b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handle_outliving_set_is_harmless() {
        let set = ListenerSet::new();
        let (_count, listener) = counter();
        let handle = set.register("key", listener);
        drop(set);
        drop(handle);
    }

    #[test]
    fn listener_may_reenter_registry() {
        let set = Arc::new(ListenerSet::new());
        let set_clone = Arc::clone(&set);
        let _handle = set.register(
            "key",
            Box::new(move || {
                // Registering from inside a notification must not deadlock.
                let inner = set_clone.register("other", Box::new(|| {}));
                inner.deactivate();
            }),
        );
        set.notify("key");
    }
}
