//! Reading records back out of a settings store.
//!
//! The decoder visits fields in the same declaration order the encoder
//! used, identifying each field purely by position: the store has no
//! notion of "next key", so encoder and decoder agree on order only
//! through shared schema iteration, never through persisted metadata.
//! The position cursor resets at the start of every traversal, so one
//! decoder instance can serve repeated calls -- including against
//! different stores -- without leaking state between them.

use prefs_core::Settings;

use crate::error::Result;
use crate::record::{FieldValue, Record};
use crate::schema::{Kind, Schema};
use crate::tag::{compose, marker};

/// Reads records of one schema from under a fixed root key.
pub struct Decoder<'a> {
    schema: &'a Schema,
    root: String,
    position: usize,
}

impl<'a> Decoder<'a> {
    /// Create a decoder bound to `schema`, reading under `root`.
    pub fn new(schema: &'a Schema, root: impl Into<String>) -> Self {
        Self {
            schema,
            root: root.into(),
            position: 0,
        }
    }

    /// Read a record from `settings`.
    ///
    /// A nullable field's marker is consulted first (absent marker means
    /// absent value); when the marker is `false` the leaf key is never
    /// read at all. Missing non-nullable leaves decode to zero-ish
    /// defaults (`false`, `0`, `0.0`, `""`) per the store's defaulting
    /// contract. Store failures -- including kind mismatches between the
    /// schema and stored data -- propagate unmodified.
    pub fn decode<S: Settings + ?Sized>(&mut self, settings: &S) -> Result<Record> {
        // Reset so the same instance is reusable across calls.
        self.position = 0;
        let root = self.root.clone();
        self.decode_struct(self.schema, &root, settings)
    }

    fn decode_struct<S: Settings + ?Sized>(
        &mut self,
        schema: &Schema,
        prefix: &str,
        settings: &S,
    ) -> Result<Record> {
        // Each structure gets a fresh cursor; the outer position is
        // restored once the nested traversal completes.
        let saved = self.position;
        self.position = 0;

        let mut record = Record::new();
        while let Some(index) = self.next_index(schema) {
            let field = &schema.fields()[index];
            let tag = compose(prefix, field.name());

            if field.is_nullable() && !settings.get_bool(&marker(&tag), false)? {
                record.push_absent();
                continue;
            }
            let value = self.decode_leaf(field.kind(), &tag, settings)?;
            record.push(value);
        }

        self.position = saved;
        Ok(record)
    }

    fn next_index(&mut self, schema: &Schema) -> Option<usize> {
        if self.position < schema.len() {
            let index = self.position;
            self.position += 1;
            Some(index)
        } else {
            None
        }
    }

    fn decode_leaf<S: Settings + ?Sized>(
        &mut self,
        kind: &Kind,
        tag: &str,
        settings: &S,
    ) -> Result<FieldValue> {
        let value = match kind {
            Kind::Bool => FieldValue::Bool(settings.get_bool(tag, false)?),
            Kind::Byte => FieldValue::Byte(settings.get_int(tag, 0)? as i8),
            Kind::Short => FieldValue::Short(settings.get_int(tag, 0)? as i16),
            Kind::Int => FieldValue::Int(settings.get_int(tag, 0)?),
            Kind::Long => FieldValue::Long(settings.get_long(tag, 0)?),
            Kind::Float => FieldValue::Float(settings.get_float(tag, 0.0)?),
            Kind::Double => FieldValue::Double(settings.get_double(tag, 0.0)?),
            Kind::Char => {
                // Stored widened; narrow to the low 16 bits of the code
                // point. An unpaired surrogate narrows to U+FFFD.
                let raw = (settings.get_int(tag, 0)? as u32) & 0xFFFF;
                FieldValue::Char(char::from_u32(raw).unwrap_or(char::REPLACEMENT_CHARACTER))
            }
            Kind::Str => FieldValue::Str(settings.get_string(tag, "")?),
            // Unit carries no information; nothing is read.
            Kind::Unit => FieldValue::Unit,
            Kind::Enum => FieldValue::Enum(settings.get_int(tag, 0)? as u32),
            Kind::Struct(nested) => {
                FieldValue::Struct(self.decode_struct(nested, tag, settings)?)
            }
        };
        Ok(value)
    }
}
