//! Schema-driven record codec over flat settings keys.
//!
//! This crate maps structured values onto any
//! [`Settings`](prefs_core::Settings) store by flattening them: one store
//! entry per primitive leaf, keyed by the root key joined with the chain
//! of field names (`cfg.inner.x`), plus one boolean marker entry per
//! nullable field (`cfg.b?`) recording presence. The layout is the
//! storage format -- data written by one process is readable by any other
//! holding the same schema.
//!
//! # Key Types
//!
//! - [`Schema`] / [`Field`] / [`Kind`] -- static description of a
//!   structure's ordered, typed fields
//! - [`Record`] / [`FieldValue`] -- dynamic values matched against a
//!   schema at encode/decode time
//! - [`Encoder`] / [`Decoder`] -- declaration-order traversal writing or
//!   reading one leaf at a time
//!
//! # Design Rules
//!
//! 1. Field order is the contract: the decoder identifies fields by
//!    position in the shared schema, never by persisted metadata.
//! 2. Nullable presence lives in the marker key alone; an absent encode
//!    leaves any stale leaf value in place and decode never reads it.
//! 3. Sub-word kinds (byte, short, char, enum ordinal) widen through the
//!    store's 32-bit integer slot and narrow back by truncation.
//! 4. No atomicity across leaves; a failed encode leaves a partial
//!    record (the backing stores offer nothing to build a transaction
//!    from).
//! 5. Store failures propagate unmodified; the codec adds no validation
//!    of stored data beyond what the store itself reports.
//!
//! # Example
//!
//! ```
//! use prefs_core::MemorySettings;
//! use prefs_schema::{decode, encode, Kind, Record, Schema};
//!
//! let schema = Schema::builder("cfg")
//!     .field("a", Kind::Int)
//!     .nullable_field("b", Kind::Str)
//!     .build()?;
//!
//! let settings = MemorySettings::new();
//! encode(&schema, &Record::new().with(3).with_absent(), &settings, None)?;
//!
//! let record = decode(&schema, &settings, None)?;
//! assert_eq!(record, Record::new().with(3).with_absent());
//! # Ok::<(), prefs_schema::CodecError>(())
//! ```

pub mod decode;
pub mod encode;
pub mod error;
pub mod record;
pub mod schema;
pub mod tag;

// Re-export primary types at crate root for ergonomic imports.
pub use decode::Decoder;
pub use encode::Encoder;
pub use error::{CodecError, Result};
pub use record::{FieldValue, Record};
pub use schema::{Field, Kind, Schema, SchemaBuilder};

use prefs_core::Settings;

/// Encode `record` into `settings` under `root`.
///
/// A `None` root falls back to the schema's own name, so a schema named
/// after its binding site needs no explicit key.
pub fn encode<S: Settings + ?Sized>(
    schema: &Schema,
    record: &Record,
    settings: &S,
    root: Option<&str>,
) -> Result<()> {
    let root = root.unwrap_or_else(|| schema.name());
    Encoder::new(schema, root).encode(settings, record)
}

/// Decode a record from `settings` under `root`.
///
/// A `None` root falls back to the schema's own name.
pub fn decode<S: Settings + ?Sized>(
    schema: &Schema,
    settings: &S,
    root: Option<&str>,
) -> Result<Record> {
    let root = root.unwrap_or_else(|| schema.name());
    Decoder::new(schema, root).decode(settings)
}
