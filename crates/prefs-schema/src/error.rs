/// Errors from schema building and record encoding/decoding.
///
/// Store-layer failures pass through unmodified; the remaining variants
/// all report disagreements between a schema and the record or field
/// names handed to it, which are caller bugs rather than store state.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Failure from the backing store, propagated as-is.
    #[error(transparent)]
    Store(#[from] prefs_core::Error),

    /// A field name that cannot be mapped to a flat key.
    #[error("invalid field name {name:?}: {reason}")]
    InvalidFieldName { name: String, reason: String },

    /// Record length disagrees with the schema's field count.
    #[error("record holds {found} values but schema {schema:?} declares {expected} fields")]
    Arity {
        schema: String,
        expected: usize,
        found: usize,
    },

    /// A record value's kind disagrees with the schema field.
    #[error("field {tag:?} expects {expected} but record holds {found}")]
    FieldMismatch {
        tag: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A non-nullable field holds no value.
    #[error("field {tag:?} is not nullable but the record holds no value")]
    UnexpectedAbsent { tag: String },
}

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
