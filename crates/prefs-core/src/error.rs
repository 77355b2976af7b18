use crate::value::ValueKind;

/// Errors from settings storage operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The stored value's kind disagrees with the requested accessor.
    #[error("kind mismatch for key {key:?}: expected {expected}, found {found}")]
    KindMismatch {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failure in a persistent backend.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias for settings operations.
pub type Result<T> = std::result::Result<T, Error>;
