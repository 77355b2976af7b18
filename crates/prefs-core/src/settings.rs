//! The [`Settings`] trait defining the key-value storage contract.
//!
//! Any backend (in-memory, file, database) implements this trait to
//! provide flat string-keyed storage of primitive values. Typed accessors
//! are provided methods layered on the small required core, so every
//! backend reports absence and kind mismatches identically.

use crate::error::{Error, Result};
use crate::value::{Value, ValueKind};

/// Flat key-value storage of primitive settings values.
///
/// Implementations must be thread-safe (`Send + Sync`). All operations
/// are synchronous and act on one key at a time; the trait makes no
/// atomicity promises across keys.
///
/// # Absence vs. mismatch
///
/// A missing key is never an error: the defaulting accessors return the
/// caller-supplied default and the `_opt` accessors return `Ok(None)`.
/// A key holding a value of the wrong kind is an error
/// ([`Error::KindMismatch`]) for every typed accessor.
pub trait Settings: Send + Sync {
    /// Read the raw value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get_value(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`, overwriting any existing value of any
    /// kind.
    fn put_value(&self, key: &str, value: Value) -> Result<()>;

    /// Delete a key.
    ///
    /// Returns `Ok(true)` if the key existed and was removed, `Ok(false)`
    /// if it did not exist.
    fn remove(&self, key: &str) -> Result<bool>;

    /// Delete every key.
    fn clear(&self) -> Result<()>;

    /// List all keys currently present.
    ///
    /// The order is unspecified.
    fn keys(&self) -> Result<Vec<String>>;

    /// Returns `true` if `key` holds a value of any kind.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get_value(key)?.is_some())
    }

    /// Number of keys currently present.
    fn size(&self) -> Result<usize> {
        Ok(self.keys()?.len())
    }

    /// Read a boolean, or `default` if the key is absent.
    fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        match self.get_value(key)? {
            Some(Value::Bool(v)) => Ok(v),
            Some(other) => Err(mismatch(key, ValueKind::Bool, &other)),
            None => Ok(default),
        }
    }

    /// Read a boolean, or `None` if the key is absent.
    fn get_bool_opt(&self, key: &str) -> Result<Option<bool>> {
        match self.get_value(key)? {
            Some(Value::Bool(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(key, ValueKind::Bool, &other)),
            None => Ok(None),
        }
    }

    /// Store a boolean under `key`.
    fn put_bool(&self, key: &str, value: bool) -> Result<()> {
        self.put_value(key, Value::Bool(value))
    }

    /// Read a 32-bit integer, or `default` if the key is absent.
    fn get_int(&self, key: &str, default: i32) -> Result<i32> {
        match self.get_value(key)? {
            Some(Value::Int(v)) => Ok(v),
            Some(other) => Err(mismatch(key, ValueKind::Int, &other)),
            None => Ok(default),
        }
    }

    /// Read a 32-bit integer, or `None` if the key is absent.
    fn get_int_opt(&self, key: &str) -> Result<Option<i32>> {
        match self.get_value(key)? {
            Some(Value::Int(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(key, ValueKind::Int, &other)),
            None => Ok(None),
        }
    }

    /// Store a 32-bit integer under `key`.
    fn put_int(&self, key: &str, value: i32) -> Result<()> {
        self.put_value(key, Value::Int(value))
    }

    /// Read a 64-bit integer, or `default` if the key is absent.
    fn get_long(&self, key: &str, default: i64) -> Result<i64> {
        match self.get_value(key)? {
            Some(Value::Long(v)) => Ok(v),
            Some(other) => Err(mismatch(key, ValueKind::Long, &other)),
            None => Ok(default),
        }
    }

    /// Read a 64-bit integer, or `None` if the key is absent.
    fn get_long_opt(&self, key: &str) -> Result<Option<i64>> {
        match self.get_value(key)? {
            Some(Value::Long(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(key, ValueKind::Long, &other)),
            None => Ok(None),
        }
    }

    /// Store a 64-bit integer under `key`.
    fn put_long(&self, key: &str, value: i64) -> Result<()> {
        self.put_value(key, Value::Long(value))
    }

    /// Read a single-precision float, or `default` if the key is absent.
    fn get_float(&self, key: &str, default: f32) -> Result<f32> {
        match self.get_value(key)? {
            Some(Value::Float(v)) => Ok(v),
            Some(other) => Err(mismatch(key, ValueKind::Float, &other)),
            None => Ok(default),
        }
    }

    /// Read a single-precision float, or `None` if the key is absent.
    fn get_float_opt(&self, key: &str) -> Result<Option<f32>> {
        match self.get_value(key)? {
            Some(Value::Float(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(key, ValueKind::Float, &other)),
            None => Ok(None),
        }
    }

    /// Store a single-precision float under `key`.
    fn put_float(&self, key: &str, value: f32) -> Result<()> {
        self.put_value(key, Value::Float(value))
    }

    /// Read a double-precision float, or `default` if the key is absent.
    fn get_double(&self, key: &str, default: f64) -> Result<f64> {
        match self.get_value(key)? {
            Some(Value::Double(v)) => Ok(v),
            Some(other) => Err(mismatch(key, ValueKind::Double, &other)),
            None => Ok(default),
        }
    }

    /// Read a double-precision float, or `None` if the key is absent.
    fn get_double_opt(&self, key: &str) -> Result<Option<f64>> {
        match self.get_value(key)? {
            Some(Value::Double(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(key, ValueKind::Double, &other)),
            None => Ok(None),
        }
    }

    /// Store a double-precision float under `key`.
    fn put_double(&self, key: &str, value: f64) -> Result<()> {
        self.put_value(key, Value::Double(value))
    }

    /// Read a string, or `default` if the key is absent.
    fn get_string(&self, key: &str, default: &str) -> Result<String> {
        match self.get_value(key)? {
            Some(Value::Text(v)) => Ok(v),
            Some(other) => Err(mismatch(key, ValueKind::Text, &other)),
            None => Ok(default.to_string()),
        }
    }

    /// Read a string, or `None` if the key is absent.
    fn get_string_opt(&self, key: &str) -> Result<Option<String>> {
        match self.get_value(key)? {
            Some(Value::Text(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(key, ValueKind::Text, &other)),
            None => Ok(None),
        }
    }

    /// Store a string under `key`.
    fn put_string(&self, key: &str, value: &str) -> Result<()> {
        self.put_value(key, Value::Text(value.to_string()))
    }
}

fn mismatch(key: &str, expected: ValueKind, found: &Value) -> Error {
    Error::KindMismatch {
        key: key.to_string(),
        expected,
        found: found.kind(),
    }
}
