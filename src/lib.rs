//! Name resolution and recursion-aware traversal of Avro schemas
//!
//! This library walks Avro-style schema type graphs given as
//! `serde_json::Value` trees, resolving named type references through an
//! alias-aware registry and folding a visitor over every node exactly once
//! per occurrence. Self-referential types are detected and reported instead
//! of expanded.
//!
//! # Example
//! ```
//! use avrowalk::{walk, SchemaError};
//! use serde_json::json;
//!
//! let roots = vec![json!({
//!     "type": "record",
//!     "name": "LongList",
//!     "fields": [
//!         {"name": "value", "type": "long"},
//!         {"name": "next", "type": ["null", "LongList"]}
//!     ]
//! })];
//!
//! let recursive = walk(
//!     &roots,
//!     |mut acc: Vec<String>, visit, path| {
//!         if visit.is_recursive_reference {
//!             acc.push(path.to_string());
//!         }
//!         Ok::<_, SchemaError>(acc)
//!     },
//!     Vec::new,
//! )
//! .unwrap();
//!
//! assert_eq!(recursive[0], vec!["next.$member1"]);
//! ```

pub mod error;
pub mod schema;
pub mod walk;

// Re-export main types
pub use error::SchemaError;
pub use schema::{
    classify, parse_roots, Classified, NameDescriptor, NameRef, NameRegistry, Primitive,
    SchemaKind,
};
pub use walk::{
    flatten, walk, walk_json, FlatEntry, KeyChain, RegistryScope, SchemaTree, TreeNode, Visit,
    WalkOptions, Walker,
};
