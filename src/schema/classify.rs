//! Schema node classification and the per-kind recursion policy.
//!
//! Both are pure functions over borrowed JSON; the walker drives them.

use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::schema::types::{is_type_keyword, NamedKind, Primitive, SchemaKind};

/// Path segment used for the items of an array.
pub const ARRAY_ITEMS_KEY: &str = "$index";
/// Path segment used for the values of a map.
pub const MAP_VALUES_KEY: &str = "$key";
/// Prefix of the path segment used for union members (`$member0`, ...).
pub const UNION_MEMBER_PREFIX: &str = "$member";

/// Structural view of a single schema node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classified<'a> {
    /// A primitive token, or an object whose `type` is one.
    Primitive(Primitive),
    /// A record, enum, or fixed definition carrying a `name`.
    Named {
        kind: NamedKind,
        entry: &'a Value,
    },
    /// An array, with its defining object.
    Array(&'a Map<String, Value>),
    /// A map, with its defining object.
    Map(&'a Map<String, Value>),
    /// A union, with its members in declaration order.
    Union(&'a [Value]),
    /// A name that must already be registered.
    Reference(&'a str),
}

impl<'a> Classified<'a> {
    /// The structural kind, or `None` for a reference (whose kind is that of
    /// the type it resolves to).
    pub fn kind(&self) -> Option<SchemaKind> {
        match self {
            Classified::Primitive(p) => Some(SchemaKind::Primitive(*p)),
            Classified::Named { kind, .. } => Some((*kind).into()),
            Classified::Array(_) => Some(SchemaKind::Array),
            Classified::Map(_) => Some(SchemaKind::Map),
            Classified::Union(_) => Some(SchemaKind::Union),
            Classified::Reference(_) => None,
        }
    }

    /// Check if this node is a definition that must be registered.
    pub fn is_registerable(&self) -> bool {
        matches!(self, Classified::Named { .. })
    }
}

/// One step of the recursion policy: a path segment and the node under it.
#[derive(Debug, Clone, PartialEq)]
pub struct Child<'a> {
    pub key: String,
    pub node: &'a Value,
}

impl<'a> Child<'a> {
    fn new(key: impl Into<String>, node: &'a Value) -> Self {
        Self {
            key: key.into(),
            node,
        }
    }
}

/// Follow `{"type": {...}}` and `{"type": [...]}` wrappers down to the node
/// that defines the type. Any other node is returned as is.
pub fn unwrap_schema(node: &Value) -> &Value {
    let mut node = node;
    while let Some(inner @ (Value::Object(_) | Value::Array(_))) = node.get("type") {
        node = inner;
    }
    node
}

/// Classify a schema node without resolving references.
///
/// Wrapper objects classify as the node they wrap; see [`unwrap_schema`].
pub fn classify(node: &Value) -> Result<Classified<'_>, SchemaError> {
    match node {
        Value::Null => Ok(Classified::Primitive(Primitive::Null)),
        Value::String(s) => classify_name(s),
        Value::Array(members) => Ok(Classified::Union(members)),
        Value::Object(obj) => classify_object(node, obj),
        _ => Err(SchemaError::InvalidSchema(format!(
            "Expected string, object, or array, found: {}",
            node
        ))),
    }
}

fn classify_name(name: &str) -> Result<Classified<'_>, SchemaError> {
    if let Some(p) = Primitive::from_token(name) {
        return Ok(Classified::Primitive(p));
    }
    if is_type_keyword(name) {
        return Err(SchemaError::InvalidSchema(format!(
            "'{}' cannot be used as a bare type",
            name
        )));
    }
    Ok(Classified::Reference(name))
}

fn classify_object<'a>(
    node: &'a Value,
    obj: &'a Map<String, Value>,
) -> Result<Classified<'a>, SchemaError> {
    let type_value = obj
        .get("type")
        .ok_or_else(|| SchemaError::InvalidSchema("Missing 'type' field".to_string()))?;

    let type_str = match type_value {
        Value::String(s) => s.as_str(),
        // {"type": {...}} and {"type": [...]} wrap another schema
        Value::Object(_) | Value::Array(_) => return classify(type_value),
        other => {
            return Err(SchemaError::InvalidSchema(format!(
                "'type' must be a string, object, or array, found: {}",
                other
            )))
        }
    };

    if let Some(p) = Primitive::from_token(type_str) {
        return Ok(Classified::Primitive(p));
    }

    if let Some(kind) = NamedKind::from_token(type_str) {
        return match obj.get("name") {
            Some(Value::String(_)) => Ok(Classified::Named { kind, entry: node }),
            _ => Err(SchemaError::InvalidSchema(format!(
                "{} missing 'name' field",
                kind.as_str()
            ))),
        };
    }

    match type_str {
        "array" => Ok(Classified::Array(obj)),
        "map" => Ok(Classified::Map(obj)),
        other => classify_name(other),
    }
}

/// The children to recurse into for a classified node, in visiting order.
///
/// Only kinds that are [`SchemaKind::is_recursable`] yield children.
/// References never do: their definition is expanded where it first appears.
pub fn children<'a>(classified: &Classified<'a>) -> Result<Vec<Child<'a>>, SchemaError> {
    if !classified.kind().is_some_and(|kind| kind.is_recursable()) {
        return Ok(Vec::new());
    }

    match *classified {
        Classified::Named {
            kind: NamedKind::Record,
            entry,
        } => record_children(entry),
        Classified::Array(obj) => {
            let items = obj.get("items").ok_or_else(|| {
                SchemaError::InvalidSchema("Array missing 'items' field".to_string())
            })?;
            Ok(vec![Child::new(ARRAY_ITEMS_KEY, items)])
        }
        Classified::Map(obj) => {
            let values = obj.get("values").ok_or_else(|| {
                SchemaError::InvalidSchema("Map missing 'values' field".to_string())
            })?;
            Ok(vec![Child::new(MAP_VALUES_KEY, values)])
        }
        Classified::Union(members) => Ok(members
            .iter()
            .enumerate()
            .map(|(i, member)| Child::new(format!("{}{}", UNION_MEMBER_PREFIX, i), member))
            .collect()),
        _ => Ok(Vec::new()),
    }
}

fn record_children(entry: &Value) -> Result<Vec<Child<'_>>, SchemaError> {
    let fields = match entry.get("fields") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(fields)) => fields,
        Some(_) => {
            return Err(SchemaError::InvalidSchema(
                "Record 'fields' must be an array".to_string(),
            ))
        }
    };

    fields
        .iter()
        .map(|field| {
            let name = field
                .get("name")
                .and_then(|v| v.as_str())
                .ok_or_else(|| SchemaError::InvalidSchema("Field missing 'name'".to_string()))?;
            let type_value = field
                .get("type")
                .ok_or_else(|| SchemaError::InvalidSchema("Field missing 'type'".to_string()))?;
            Ok(Child::new(name, type_value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Value {
        json!({
            "type": "record",
            "name": "LongList",
            "aliases": ["LinkedLongs"],
            "doc": "doc string",
            "fields": [
                {"name": "value", "type": "long"},
                {"name": "next", "type": ["null", "LongList"]}
            ]
        })
    }

    #[test]
    fn test_registerable_kinds() {
        let record = record();
        let enum_entry = json!({"type": "enum", "name": "MyEnum", "symbols": ["a", "b"]});
        let fixed = json!({"type": "fixed", "name": "myFixed", "size": 16});
        assert!(classify(&record).unwrap().is_registerable());
        assert!(classify(&enum_entry).unwrap().is_registerable());
        assert!(classify(&fixed).unwrap().is_registerable());

        let array = json!({"type": "array", "items": "string"});
        let map = json!({"type": "map", "values": "string"});
        let union = json!(["int", "string"]);
        assert!(!classify(&array).unwrap().is_registerable());
        assert!(!classify(&map).unwrap().is_registerable());
        assert!(!classify(&union).unwrap().is_registerable());
        assert!(!classify(&json!("int")).unwrap().is_registerable());
    }

    #[test]
    fn test_classify_primitives() {
        for p in Primitive::ALL {
            assert_eq!(
                classify(&json!(p.as_str())).unwrap(),
                Classified::Primitive(p)
            );
        }
        assert_eq!(
            classify(&json!({"type": "long", "logicalType": "timestamp-millis"})).unwrap(),
            Classified::Primitive(Primitive::Long)
        );
        assert_eq!(
            classify(&Value::Null).unwrap(),
            Classified::Primitive(Primitive::Null)
        );
    }

    #[test]
    fn test_classify_references() {
        assert_eq!(
            classify(&json!("LongList")).unwrap(),
            Classified::Reference("LongList")
        );
        assert_eq!(
            classify(&json!({"type": "com.example.User"})).unwrap(),
            Classified::Reference("com.example.User")
        );
        assert_eq!(classify(&json!("LongList")).unwrap().kind(), None);
    }

    #[test]
    fn test_classify_wrapped_type() {
        let wrapped = json!({"type": {"type": "array", "items": "int"}});
        assert_eq!(
            classify(&wrapped).unwrap().kind(),
            Some(SchemaKind::Array)
        );
    }

    #[test]
    fn test_classify_invalid() {
        assert!(classify(&json!(42)).is_err());
        assert!(classify(&json!(true)).is_err());
        assert!(classify(&json!({"name": "x"})).is_err());
        assert!(classify(&json!({"type": "record", "fields": []})).is_err());
        assert!(classify(&json!("record")).is_err());
        assert!(classify(&json!({"type": 5})).is_err());
    }

    #[test]
    fn test_record_children_in_order() {
        let record = record();
        let children = children(&classify(&record).unwrap()).unwrap();
        let keys: Vec<&str> = children.iter().map(|c| c.key.as_str()).collect();

        assert_eq!(keys, vec!["value", "next"]);
        assert_eq!(children[0].node, &json!("long"));
    }

    #[test]
    fn test_record_without_fields_has_no_children() {
        let record = json!({"type": "record", "name": "Empty"});
        assert!(children(&classify(&record).unwrap()).unwrap().is_empty());
    }

    #[test]
    fn test_container_children_keys() {
        let array = json!({"type": "array", "items": "string"});
        let map = json!({"type": "map", "values": "int"});
        let union = json!(["null", "int", "A"]);

        let array_children = children(&classify(&array).unwrap()).unwrap();
        assert_eq!(array_children, vec![Child::new("$index", &array["items"])]);

        let map_children = children(&classify(&map).unwrap()).unwrap();
        assert_eq!(map_children[0].key, "$key");

        let union_children = children(&classify(&union).unwrap()).unwrap();
        let keys: Vec<&str> = union_children.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["$member0", "$member1", "$member2"]);
    }

    #[test]
    fn test_terminal_kinds_have_no_children() {
        let enum_entry = json!({"type": "enum", "name": "E", "symbols": ["A"]});
        let fixed = json!({"type": "fixed", "name": "F", "size": 4});
        assert!(children(&classify(&enum_entry).unwrap()).unwrap().is_empty());
        assert!(children(&classify(&fixed).unwrap()).unwrap().is_empty());
        assert!(children(&Classified::Reference("X")).unwrap().is_empty());
        assert!(children(&Classified::Primitive(Primitive::Int))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_children_only_for_recursable_kinds() {
        let nodes = vec![
            record(),
            json!({"type": "enum", "name": "E", "symbols": ["A"]}),
            json!({"type": "fixed", "name": "F", "size": 4}),
            json!({"type": "array", "items": "int"}),
            json!({"type": "map", "values": "int"}),
            json!(["int"]),
            json!("bytes"),
            json!({"type": "int", "logicalType": "date"}),
        ];

        for node in &nodes {
            let classified = classify(node).unwrap();
            let recursable = classified.kind().unwrap().is_recursable();
            assert_eq!(!children(&classified).unwrap().is_empty(), recursable, "{}", node);
        }
    }

    #[test]
    fn test_unwrap_schema() {
        let array = json!({"type": "array", "items": "int"});
        let wrapped = json!({"type": {"type": array.clone()}});
        assert_eq!(unwrap_schema(&wrapped), &array);

        let union = json!({"type": ["null", "int"]});
        assert_eq!(unwrap_schema(&union), &json!(["null", "int"]));

        let plain = json!({"type": "long", "logicalType": "timestamp-millis"});
        assert_eq!(unwrap_schema(&plain), &plain);
        assert_eq!(unwrap_schema(&json!("int")), &json!("int"));
    }

    #[test]
    fn test_malformed_containers() {
        let map_with_items = json!({"type": "map", "items": "string"});
        assert!(children(&classify(&map_with_items).unwrap()).is_err());

        let array = json!({"type": "array"});
        assert!(children(&classify(&array).unwrap()).is_err());

        let bad_field = json!({"type": "record", "name": "R", "fields": [{"type": "int"}]});
        assert!(children(&classify(&bad_field).unwrap()).is_err());
    }
}
