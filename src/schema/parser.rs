//! JSON intake for schema roots.
//!
//! The walker works on already-parsed `serde_json::Value` trees; this module
//! only turns schema text into the list of roots it expects.

use serde_json::Value;

use crate::error::SchemaError;

/// Parse schema JSON text into a list of root schema nodes.
///
/// A top-level JSON array is taken as the list of roots, so later roots can
/// be written in terms of earlier ones. Any other JSON value is a single
/// root.
///
/// Note that a single top-level union therefore has to be wrapped in an
/// outer array to be read as one root.
///
/// # Example
/// ```
/// use avrowalk::schema::parse_roots;
///
/// let roots = parse_roots(r#"[{"type": "fixed", "name": "MD5", "size": 16}, "int"]"#).unwrap();
/// assert_eq!(roots.len(), 2);
///
/// let roots = parse_roots(r#""string""#).unwrap();
/// assert_eq!(roots.len(), 1);
/// ```
pub fn parse_roots(json: &str) -> Result<Vec<Value>, SchemaError> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| SchemaError::ParseError(format!("Invalid JSON: {}", e)))?;

    Ok(match value {
        Value::Array(roots) => roots,
        other => vec![other],
    })
}
