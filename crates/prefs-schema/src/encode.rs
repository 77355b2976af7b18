//! Writing records into a settings store.
//!
//! The encoder visits fields in schema declaration order and writes one
//! store entry per primitive leaf under its composed tag. Sub-word
//! integer kinds widen into the store's 32-bit integer slot; nested
//! structures extend the path and recurse. Writes happen one leaf at a
//! time with no atomicity across leaves: a failure partway through leaves
//! the store with a mix of old and new entries.

use prefs_core::Settings;

use crate::error::{CodecError, Result};
use crate::record::{FieldValue, Record};
use crate::schema::{Kind, Schema};
use crate::tag::{compose, marker};

/// Writes records of one schema under a fixed root key.
///
/// Root keys are taken as-is; a root containing the path separator simply
/// nests deeper in the flat key space, which is the caller's
/// responsibility to keep collision-free.
pub struct Encoder<'a> {
    schema: &'a Schema,
    root: String,
}

impl<'a> Encoder<'a> {
    /// Create an encoder bound to `schema`, writing under `root`.
    pub fn new(schema: &'a Schema, root: impl Into<String>) -> Self {
        Self {
            schema,
            root: root.into(),
        }
    }

    /// Write `record` into `settings`, one leaf at a time.
    ///
    /// For a nullable field, the boolean marker at `<tag>?` is written
    /// first: `false` for an absent value (the leaf key itself is left
    /// untouched, so a stale prior value may remain -- decode keys off
    /// the marker, never the leaf), `true` followed by the leaf value
    /// otherwise.
    pub fn encode<S: Settings + ?Sized>(&self, settings: &S, record: &Record) -> Result<()> {
        encode_struct(self.schema, &self.root, settings, record)
    }
}

fn encode_struct<S: Settings + ?Sized>(
    schema: &Schema,
    prefix: &str,
    settings: &S,
    record: &Record,
) -> Result<()> {
    if record.len() != schema.len() {
        return Err(CodecError::Arity {
            schema: schema.name().to_string(),
            expected: schema.len(),
            found: record.len(),
        });
    }

    for (field, slot) in schema.fields().iter().zip(record.values()) {
        let tag = compose(prefix, field.name());
        match slot {
            None => {
                if !field.is_nullable() {
                    return Err(CodecError::UnexpectedAbsent { tag });
                }
                settings.put_bool(&marker(&tag), false)?;
            }
            Some(value) => {
                if field.is_nullable() {
                    settings.put_bool(&marker(&tag), true)?;
                }
                encode_leaf(field.kind(), &tag, settings, value)?;
            }
        }
    }
    Ok(())
}

fn encode_leaf<S: Settings + ?Sized>(
    kind: &Kind,
    tag: &str,
    settings: &S,
    value: &FieldValue,
) -> Result<()> {
    match (kind, value) {
        (Kind::Bool, FieldValue::Bool(v)) => settings.put_bool(tag, *v)?,
        (Kind::Byte, FieldValue::Byte(v)) => settings.put_int(tag, i32::from(*v))?,
        (Kind::Short, FieldValue::Short(v)) => settings.put_int(tag, i32::from(*v))?,
        (Kind::Int, FieldValue::Int(v)) => settings.put_int(tag, *v)?,
        (Kind::Long, FieldValue::Long(v)) => settings.put_long(tag, *v)?,
        (Kind::Float, FieldValue::Float(v)) => settings.put_float(tag, *v)?,
        (Kind::Double, FieldValue::Double(v)) => settings.put_double(tag, *v)?,
        // The full code point widens into the integer slot; decode
        // narrows to 16 bits.
        (Kind::Char, FieldValue::Char(v)) => settings.put_int(tag, *v as i32)?,
        (Kind::Str, FieldValue::Str(v)) => settings.put_string(tag, v)?,
        (Kind::Unit, FieldValue::Unit) => settings.put_bool(tag, true)?,
        (Kind::Enum, FieldValue::Enum(ordinal)) => settings.put_int(tag, *ordinal as i32)?,
        (Kind::Struct(nested), FieldValue::Struct(inner)) => {
            encode_struct(nested, tag, settings, inner)?;
        }
        (kind, value) => {
            return Err(CodecError::FieldMismatch {
                tag: tag.to_string(),
                expected: kind.label(),
                found: value.label(),
            });
        }
    }
    Ok(())
}
