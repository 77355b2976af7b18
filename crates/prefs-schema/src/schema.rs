//! Static descriptions of structured values.
//!
//! A [`Schema`] lists a structure's fields in declaration order, each with
//! a name, a [`Kind`], and a nullability flag. Declaration order is a
//! contract surface: the decoder identifies fields purely by index while
//! walking the same schema the encoder walked, so encoder and decoder
//! must share an identical field order. Schemas are built once through
//! [`Schema::builder`] and shared read-only.

use std::sync::Arc;

use crate::error::{CodecError, Result};
use crate::tag::{MARKER_SUFFIX, SEPARATOR};

/// Primitive kind of a schema field.
///
/// Sub-word integer kinds (`Byte`, `Short`, `Char`) and `Enum` ordinals
/// are widened into the store's 32-bit integer slot on encode and
/// narrowed back on decode; the backing stores only offer the slots of
/// [`prefs_core::Value`].
#[derive(Clone, Debug, PartialEq)]
pub enum Kind {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    Str,
    Unit,
    /// Enum encoded as its declaration-order ordinal.
    Enum,
    /// Nested structure with its own ordered fields.
    Struct(Arc<Schema>),
}

impl Kind {
    /// Wrap a schema as a nested-structure kind.
    pub fn nested(schema: Schema) -> Self {
        Self::Struct(Arc::new(schema))
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Char => "char",
            Self::Str => "string",
            Self::Unit => "unit",
            Self::Enum => "enum",
            Self::Struct(_) => "struct",
        }
    }
}

/// One named, typed field of a schema.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    name: String,
    kind: Kind,
    nullable: bool,
}

impl Field {
    /// The field's declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's kind.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Whether the field may be absent.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

/// Static description of a structured value: a name and ordered fields.
///
/// The name doubles as the default root key when encoding or decoding
/// without an explicit one.
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    name: String,
    fields: Vec<Field>,
}

impl Schema {
    /// Start building a schema with the given name.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// The schema's name, used as the default root key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`Schema`].
///
/// Field names are validated at [`build`] time: a name must be non-empty
/// and must not contain the path separator (`.`) or the null-marker
/// suffix (`?`), and no two fields may share a name. Offenders would
/// silently collide in the flat key space, so they are rejected up front.
/// Root keys are *not* validated -- a root containing the separator is
/// the caller's responsibility.
///
/// [`build`]: SchemaBuilder::build
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<Field>,
}

impl SchemaBuilder {
    /// Append a required field.
    pub fn field(mut self, name: impl Into<String>, kind: Kind) -> Self {
        self.fields.push(Field {
            name: name.into(),
            kind,
            nullable: false,
        });
        self
    }

    /// Append a field that may be absent.
    pub fn nullable_field(mut self, name: impl Into<String>, kind: Kind) -> Self {
        self.fields.push(Field {
            name: name.into(),
            kind,
            nullable: true,
        });
        self
    }

    /// Validate field names and produce the schema.
    pub fn build(self) -> Result<Schema> {
        for (index, field) in self.fields.iter().enumerate() {
            validate_field_name(&field.name)?;
            if self.fields[..index].iter().any(|f| f.name == field.name) {
                return Err(CodecError::InvalidFieldName {
                    name: field.name.clone(),
                    reason: "duplicate field name".into(),
                });
            }
        }
        Ok(Schema {
            name: self.name,
            fields: self.fields,
        })
    }
}

fn validate_field_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CodecError::InvalidFieldName {
            name: name.to_string(),
            reason: "field name must not be empty".into(),
        });
    }
    if name.contains(SEPARATOR) {
        return Err(CodecError::InvalidFieldName {
            name: name.to_string(),
            reason: format!("must not contain the path separator {SEPARATOR:?}"),
        });
    }
    if name.contains(MARKER_SUFFIX) {
        return Err(CodecError::InvalidFieldName {
            name: name.to_string(),
            reason: format!("must not contain the null-marker suffix {MARKER_SUFFIX:?}"),
        });
    }
    Ok(())
}
