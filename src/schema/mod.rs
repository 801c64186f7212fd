//! Avro schema naming and classification.
//!
//! This module defines the primitive and structural kind tables, name
//! qualification, the alias-aware named type registry, node classification
//! with its recursion policy, and JSON intake of schema roots.

mod classify;
mod name;
mod parser;
mod registry;
mod types;

pub use classify::{
    children, classify, unwrap_schema, Child, Classified, ARRAY_ITEMS_KEY, MAP_VALUES_KEY,
    UNION_MEMBER_PREFIX,
};
pub use name::{
    effective_namespace, is_full_name, namespace_of, unqualified_name, NameDescriptor, NameRef,
};
pub use parser::parse_roots;
pub use registry::NameRegistry;
pub use types::*;
