//! Schema kind tables.
//!
//! Defines the closed set of Avro primitive tokens and structural kinds the
//! classifier can report.

use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;

/// One of the eight Avro primitive type tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Null type - no value.
    Null,
    /// Boolean type.
    Boolean,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit IEEE 754 floating-point.
    Float,
    /// 64-bit IEEE 754 floating-point.
    Double,
    /// Sequence of bytes.
    Bytes,
    /// Unicode string.
    String,
}

impl Primitive {
    /// Every primitive, in the order Avro lists them.
    pub const ALL: [Primitive; 8] = [
        Primitive::Null,
        Primitive::Boolean,
        Primitive::Int,
        Primitive::Long,
        Primitive::Float,
        Primitive::Double,
        Primitive::Bytes,
        Primitive::String,
    ];

    /// Look up a primitive by its schema token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "null" => Some(Primitive::Null),
            "boolean" => Some(Primitive::Boolean),
            "int" => Some(Primitive::Int),
            "long" => Some(Primitive::Long),
            "float" => Some(Primitive::Float),
            "double" => Some(Primitive::Double),
            "bytes" => Some(Primitive::Bytes),
            "string" => Some(Primitive::String),
            _ => None,
        }
    }

    /// The schema token for this primitive.
    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::Null => "null",
            Primitive::Boolean => "boolean",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Bytes => "bytes",
            Primitive::String => "string",
        }
    }

    /// The eight tokens as strings, for reserving them in a registry.
    pub fn tokens() -> impl Iterator<Item = &'static str> {
        Self::ALL.iter().map(Primitive::as_str)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Primitive {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Primitive::from_token(s)
            .ok_or_else(|| SchemaError::InvalidSchema(format!("Not a primitive type: {}", s)))
    }
}

/// Kinds that carry a name and are registered when defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKind {
    Record,
    Enum,
    Fixed,
}

impl NamedKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "record" => Some(NamedKind::Record),
            "enum" => Some(NamedKind::Enum),
            "fixed" => Some(NamedKind::Fixed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NamedKind::Record => "record",
            NamedKind::Enum => "enum",
            NamedKind::Fixed => "fixed",
        }
    }
}

/// Structural kind of a visited schema node.
///
/// References are reported with the kind of the type they resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Primitive(Primitive),
    Record,
    Enum,
    Fixed,
    Array,
    Map,
    Union,
}

impl SchemaKind {
    /// The schema token for this kind (`"record"`, `"string"`, `"union"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::Primitive(p) => p.as_str(),
            SchemaKind::Record => "record",
            SchemaKind::Enum => "enum",
            SchemaKind::Fixed => "fixed",
            SchemaKind::Array => "array",
            SchemaKind::Map => "map",
            SchemaKind::Union => "union",
        }
    }

    /// Check if this kind is a primitive type.
    pub fn is_primitive(&self) -> bool {
        matches!(self, SchemaKind::Primitive(_))
    }

    /// Check if this kind is a named type (record, enum, or fixed).
    pub fn is_named(&self) -> bool {
        matches!(self, SchemaKind::Record | SchemaKind::Enum | SchemaKind::Fixed)
    }

    /// Check if the recursion policy can yield children for this kind.
    pub fn is_recursable(&self) -> bool {
        matches!(
            self,
            SchemaKind::Record | SchemaKind::Array | SchemaKind::Map | SchemaKind::Union
        )
    }
}

impl From<NamedKind> for SchemaKind {
    fn from(kind: NamedKind) -> Self {
        match kind {
            NamedKind::Record => SchemaKind::Record,
            NamedKind::Enum => SchemaKind::Enum,
            NamedKind::Fixed => SchemaKind::Fixed,
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check whether a string is one of the type keywords that can never be a
/// reference (`record`, `array`, primitives, ...).
pub fn is_type_keyword(token: &str) -> bool {
    Primitive::from_token(token).is_some()
        || NamedKind::from_token(token).is_some()
        || matches!(token, "array" | "map" | "union")
}
