//! Flat listing of every visited node.

use serde_json::{json, Value};

use crate::error::SchemaError;
use crate::schema::SchemaKind;
use crate::walk::{Walker, WalkOptions};

/// One visited node, in pre-order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatEntry {
    pub kind: SchemaKind,
    /// Dotted key chain, empty for the root.
    pub path: String,
    /// Canonical full name of a named type or reference.
    pub name: Option<String>,
    pub is_reference: bool,
    pub is_recursive: bool,
    /// Number of path segments.
    pub depth: usize,
}

impl FlatEntry {
    /// Serialize the entry to a JSON Value.
    pub fn to_json_value(&self) -> Value {
        let mut obj = json!({
            "type": self.kind.as_str(),
            "path": self.path,
            "depth": self.depth,
        });

        if let Some(name) = &self.name {
            let key = if self.is_reference { "ref" } else { "name" };
            obj[key] = json!(name);
        }
        if self.is_recursive {
            obj["recursive"] = json!(true);
        }

        obj
    }
}

/// Flatten every root into its pre-order list of visited nodes.
///
/// # Example
/// ```
/// use avrowalk::walk::{flatten, WalkOptions};
/// use serde_json::json;
///
/// let roots = vec![json!({"type": "array", "items": "int"})];
/// let flat = flatten(&roots, &WalkOptions::default()).unwrap();
///
/// assert_eq!(flat[0][1].path, "$index");
/// ```
pub fn flatten(roots: &[Value], options: &WalkOptions) -> Result<Vec<Vec<FlatEntry>>, SchemaError> {
    Walker::with_options(options.clone()).walk(
        roots,
        |mut entries: Vec<FlatEntry>, visit, path| {
            entries.push(FlatEntry {
                kind: visit.kind,
                path: path.to_string(),
                name: visit.representative.clone(),
                is_reference: visit.is_reference,
                is_recursive: visit.is_recursive_reference,
                depth: path.depth(),
            });
            Ok(entries)
        },
        Vec::new,
    )
}
