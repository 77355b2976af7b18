//! Per-key async change streams over observable settings backends.
//!
//! Each `*_stream` function turns one key of an
//! [`ObservableSettings`](prefs_core::ObservableSettings) backend into an
//! async [`Stream`]: the stream yields the key's current value
//! immediately, then re-reads and yields after every change notification
//! for that key. Dropping the stream detaches its listener.
//!
//! Streams are conflated: the plumbing is a `tokio::sync::watch` channel
//! holding only the latest value, so a consumer that polls slower than
//! the key changes observes the newest state rather than every
//! intermediate write. The `*_opt_stream` variants yield `Option<T>`,
//! reporting an absent key as `None` instead of a default.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use prefs_core::{MemorySettings, Settings};
//! use prefs_stream::int_stream;
//! use tokio_stream::StreamExt;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Arc::new(MemorySettings::new());
//! let mut counts = int_stream(&settings, "count", 0)?;
//!
//! assert_eq!(counts.next().await, Some(0));
//! settings.put_int("count", 5)?;
//! assert_eq!(counts.next().await, Some(5));
//! # Ok(())
//! # }
//! ```

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use prefs_core::{ListenerHandle, ObservableSettings, Result};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::Stream;

/// Async stream of one key's values.
///
/// Yields the current value on first poll and the freshly-read value
/// after each change to the key. Never terminates on its own; dropping it
/// detaches the underlying listener.
pub struct KeyStream<T> {
    inner: WatchStream<T>,
    _listener: ListenerHandle,
}

impl<T: Clone + Send + Sync + 'static> Stream for KeyStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl<T> std::fmt::Debug for KeyStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyStream")
            .field("listener", &self._listener)
            .finish()
    }
}

/// Build a stream by pairing a registered listener with a watch channel.
///
/// The initial read happens eagerly so a bad key surfaces from the
/// constructor; a failed re-read inside the listener skips that emission
/// rather than poisoning the stream.
fn observe<S, T, F>(settings: &Arc<S>, key: &str, read: F) -> Result<KeyStream<T>>
where
    S: ObservableSettings + 'static,
    T: Clone + Send + Sync + 'static,
    F: Fn(&S, &str) -> Result<T> + Send + Sync + 'static,
{
    let initial = read(settings, key)?;
    let (tx, rx) = watch::channel(initial);

    let reader = Arc::clone(settings);
    let observed_key = key.to_string();
    let listener = settings.add_listener(
        key,
        Box::new(move || {
            if let Ok(value) = read(&reader, &observed_key) {
                // Send fails only when every receiver is gone; the stream
                // is being dropped then anyway.
                let _ = tx.send(value);
            }
        }),
    );

    Ok(KeyStream {
        inner: WatchStream::new(rx),
        _listener: listener,
    })
}

/// Stream a boolean key, yielding `default` while the key is absent.
pub fn bool_stream<S>(settings: &Arc<S>, key: &str, default: bool) -> Result<KeyStream<bool>>
where
    S: ObservableSettings + 'static,
{
    observe(settings, key, move |s, k| s.get_bool(k, default))
}

/// Stream a 32-bit integer key, yielding `default` while the key is
/// absent.
pub fn int_stream<S>(settings: &Arc<S>, key: &str, default: i32) -> Result<KeyStream<i32>>
where
    S: ObservableSettings + 'static,
{
    observe(settings, key, move |s, k| s.get_int(k, default))
}

/// Stream a 64-bit integer key, yielding `default` while the key is
/// absent.
pub fn long_stream<S>(settings: &Arc<S>, key: &str, default: i64) -> Result<KeyStream<i64>>
where
    S: ObservableSettings + 'static,
{
    observe(settings, key, move |s, k| s.get_long(k, default))
}

/// Stream a single-precision float key, yielding `default` while the key
/// is absent.
pub fn float_stream<S>(settings: &Arc<S>, key: &str, default: f32) -> Result<KeyStream<f32>>
where
    S: ObservableSettings + 'static,
{
    observe(settings, key, move |s, k| s.get_float(k, default))
}

/// Stream a double-precision float key, yielding `default` while the key
/// is absent.
pub fn double_stream<S>(settings: &Arc<S>, key: &str, default: f64) -> Result<KeyStream<f64>>
where
    S: ObservableSettings + 'static,
{
    observe(settings, key, move |s, k| s.get_double(k, default))
}

/// Stream a string key, yielding `default` while the key is absent.
pub fn string_stream<S>(settings: &Arc<S>, key: &str, default: &str) -> Result<KeyStream<String>>
where
    S: ObservableSettings + 'static,
{
    let default = default.to_string();
    observe(settings, key, move |s, k| s.get_string(k, &default))
}

/// Stream a boolean key, yielding `None` while the key is absent.
pub fn bool_opt_stream<S>(settings: &Arc<S>, key: &str) -> Result<KeyStream<Option<bool>>>
where
    S: ObservableSettings + 'static,
{
    observe(settings, key, |s, k| s.get_bool_opt(k))
}

/// Stream a 32-bit integer key, yielding `None` while the key is absent.
pub fn int_opt_stream<S>(settings: &Arc<S>, key: &str) -> Result<KeyStream<Option<i32>>>
where
    S: ObservableSettings + 'static,
{
    observe(settings, key, |s, k| s.get_int_opt(k))
}

/// Stream a 64-bit integer key, yielding `None` while the key is absent.
pub fn long_opt_stream<S>(settings: &Arc<S>, key: &str) -> Result<KeyStream<Option<i64>>>
where
    S: ObservableSettings + 'static,
{
    observe(settings, key, |s, k| s.get_long_opt(k))
}

/// Stream a single-precision float key, yielding `None` while the key is
/// absent.
pub fn float_opt_stream<S>(settings: &Arc<S>, key: &str) -> Result<KeyStream<Option<f32>>>
where
    S: ObservableSettings + 'static,
{
    observe(settings, key, |s, k| s.get_float_opt(k))
}

/// Stream a double-precision float key, yielding `None` while the key is
/// absent.
pub fn double_opt_stream<S>(settings: &Arc<S>, key: &str) -> Result<KeyStream<Option<f64>>>
where
    S: ObservableSettings + 'static,
{
    observe(settings, key, |s, k| s.get_double_opt(k))
}

/// Stream a string key, yielding `None` while the key is absent.
pub fn string_opt_stream<S>(settings: &Arc<S>, key: &str) -> Result<KeyStream<Option<String>>>
where
    S: ObservableSettings + 'static,
{
    observe(settings, key, |s, k| s.get_string_opt(k))
}

#[cfg(test)]
mod tests {
    use prefs_core::{MemorySettings, Settings};
    use tokio_stream::StreamExt;

    use super::*;

    #[tokio::test]
    async fn yields_current_value_first() {
        let settings = Arc::new(MemorySettings::new());
        settings.put_int("k", 10).unwrap();

        let mut stream = int_stream(&settings, "k", 0).unwrap();
        assert_eq!(stream.next().await, Some(10));
    }

    #[tokio::test]
    async fn yields_default_while_absent() {
        let settings = Arc::new(MemorySettings::new());
        let mut stream = int_stream(&settings, "missing", 7).unwrap();
        assert_eq!(stream.next().await, Some(7));
    }

    #[tokio::test]
    async fn emits_after_each_put() {
        let settings = Arc::new(MemorySettings::new());
        let mut stream = int_stream(&settings, "k", 0).unwrap();
        assert_eq!(stream.next().await, Some(0));

        settings.put_int("k", 1).unwrap();
        assert_eq!(stream.next().await, Some(1));

        settings.put_int("k", 2).unwrap();
        assert_eq!(stream.next().await, Some(2));
    }

    #[tokio::test]
    async fn rapid_writes_conflate_to_latest() {
        let settings = Arc::new(MemorySettings::new());
        let mut stream = int_stream(&settings, "k", 0).unwrap();
        assert_eq!(stream.next().await, Some(0));

        settings.put_int("k", 1).unwrap();
        settings.put_int("k", 2).unwrap();
        settings.put_int("k", 3).unwrap();
        // Only the newest value is retained by the watch channel.
        assert_eq!(stream.next().await, Some(3));
    }

    #[tokio::test]
    async fn remove_emits_the_default_again() {
        let settings = Arc::new(MemorySettings::new());
        settings.put_string("k", "set").unwrap();

        let mut stream = string_stream(&settings, "k", "fallback").unwrap();
        assert_eq!(stream.next().await.as_deref(), Some("set"));

        settings.remove("k").unwrap();
        assert_eq!(stream.next().await.as_deref(), Some("fallback"));
    }

    #[tokio::test]
    async fn opt_stream_reports_absence_as_none() {
        let settings = Arc::new(MemorySettings::new());
        let mut stream = int_opt_stream(&settings, "k").unwrap();
        assert_eq!(stream.next().await, Some(None));

        settings.put_int("k", 42).unwrap();
        assert_eq!(stream.next().await, Some(Some(42)));

        settings.remove("k").unwrap();
        assert_eq!(stream.next().await, Some(None));
    }

    #[tokio::test]
    async fn ignores_other_keys() {
        let settings = Arc::new(MemorySettings::new());
        let mut stream = bool_stream(&settings, "watched", false).unwrap();
        assert_eq!(stream.next().await, Some(false));

        settings.put_bool("unrelated", true).unwrap();
        settings.put_bool("watched", true).unwrap();
        assert_eq!(stream.next().await, Some(true));
    }

    #[tokio::test]
    async fn drop_detaches_the_listener() {
        let settings = Arc::new(MemorySettings::new());
        let stream = long_stream(&settings, "k", 0).unwrap();

        // The listener closure holds a clone of the settings handle.
        assert_eq!(Arc::strong_count(&settings), 2);
        drop(stream);
        assert_eq!(Arc::strong_count(&settings), 1);

        // Writing after the drop must not panic or notify anything.
        settings.put_long("k", 5).unwrap();
    }

    #[tokio::test]
    async fn constructor_surfaces_a_kind_mismatch() {
        let settings = Arc::new(MemorySettings::new());
        settings.put_string("k", "text").unwrap();
        assert!(int_stream(&settings, "k", 0).is_err());
    }

    #[tokio::test]
    async fn double_and_float_streams() {
        let settings = Arc::new(MemorySettings::new());
        let mut doubles = double_stream(&settings, "d", 0.5).unwrap();
        let mut floats = float_opt_stream(&settings, "f").unwrap();

        assert_eq!(doubles.next().await, Some(0.5));
        assert_eq!(floats.next().await, Some(None));

        settings.put_double("d", 2.25).unwrap();
        settings.put_float("f", 1.5).unwrap();
        assert_eq!(doubles.next().await, Some(2.25));
        assert_eq!(floats.next().await, Some(Some(1.5)));
    }
}
