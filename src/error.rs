//! Error types for schema resolution and traversal

use thiserror::Error;

/// Errors that can occur while resolving or walking a schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A name or alias is empty, reserved, or already registered
    #[error("Duplicate or invalid name: {}", names.join(", "))]
    DuplicateOrInvalidName {
        /// Every offending alias, fully qualified
        names: Vec<String>,
    },

    /// A bare name did not resolve to a previously declared type
    #[error("Undefined type reference '{name}' (namespace '{namespace}') at '{path}'")]
    UndefinedTypeReference {
        /// The name as written in the schema
        name: String,
        /// Enclosing namespace at the point of reference
        namespace: String,
        /// Dotted key chain of the referencing node
        path: String,
    },

    /// Input that cannot be classified as any schema kind
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Schema text is not valid JSON
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SchemaError {
    /// Build a `DuplicateOrInvalidName` from any list of names.
    pub fn invalid_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SchemaError::DuplicateOrInvalidName {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}
