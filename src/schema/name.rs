//! Avro name qualification.
//!
//! A named type can be referred to by a bare name inside an enclosing
//! namespace, by a bare name plus an explicit `namespace` attribute, by a
//! dotted full name, or through any of its aliases. This module reduces all of
//! these to a single [`NameDescriptor`] whose `representative` is the
//! canonical full name.

use serde_json::Value;

/// The naming attributes of a schema entry, borrowed from the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRef<'a> {
    /// The `name` attribute, possibly dotted.
    pub name: &'a str,
    /// The `namespace` attribute, if declared.
    pub namespace: Option<&'a str>,
    /// Declared aliases, each possibly dotted.
    pub aliases: Vec<&'a str>,
}

impl<'a> NameRef<'a> {
    /// A bare name with no declared namespace or aliases.
    pub fn bare(name: &'a str) -> Self {
        Self {
            name,
            namespace: None,
            aliases: Vec::new(),
        }
    }

    /// Set the declared namespace.
    pub fn with_namespace(mut self, namespace: &'a str) -> Self {
        self.namespace = Some(namespace);
        self
    }

    /// Set the declared aliases.
    pub fn with_aliases(mut self, aliases: impl IntoIterator<Item = &'a str>) -> Self {
        self.aliases = aliases.into_iter().collect();
        self
    }

    /// Read naming attributes from a schema node.
    ///
    /// A JSON string is treated as a bare name. An object yields its `name`,
    /// `namespace` and `aliases`; non-string aliases are ignored. Returns
    /// `None` for anything without a string name.
    pub fn from_entry(entry: &'a Value) -> Option<Self> {
        match entry {
            Value::String(name) => Some(Self::bare(name)),
            Value::Object(obj) => {
                let name = obj.get("name").and_then(|v| v.as_str())?;
                let namespace = obj.get("namespace").and_then(|v| v.as_str());
                let aliases = obj
                    .get("aliases")
                    .and_then(|v| v.as_array())
                    .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
                    .unwrap_or_default();

                Some(Self {
                    name,
                    namespace,
                    aliases,
                })
            }
            _ => None,
        }
    }
}

impl<'a> From<&'a str> for NameRef<'a> {
    fn from(name: &'a str) -> Self {
        Self::bare(name)
    }
}

impl<'a> From<&'a String> for NameRef<'a> {
    fn from(name: &'a String) -> Self {
        Self::bare(name)
    }
}

/// Every way of naming one type, reduced to a canonical representative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameDescriptor {
    /// Last dot-separated segment of the name.
    pub unqualified_name: String,
    /// Effective namespace, empty if none applies.
    pub namespace: String,
    /// Canonical full name.
    pub representative: String,
    /// `representative` followed by every declared alias, fully qualified.
    pub aliases: Vec<String>,
}

impl NameDescriptor {
    /// Compute the descriptor of `subject` as seen from `enclosing_namespace`.
    ///
    /// # Example
    /// ```
    /// use avrowalk::schema::{NameDescriptor, NameRef};
    ///
    /// let subject = NameRef::bare("a").with_namespace("b").with_aliases(["c"]);
    /// let nd = NameDescriptor::compute("", &subject);
    ///
    /// assert_eq!(nd.representative, "b.a");
    /// assert_eq!(nd.aliases, vec!["b.a", "b.c"]);
    /// ```
    pub fn compute(enclosing_namespace: &str, subject: &NameRef<'_>) -> Self {
        let namespace = effective_namespace(enclosing_namespace, subject.namespace, subject.name);
        let unqualified = unqualified_name(subject.name);
        let representative = qualify(namespace, unqualified);

        let mut aliases = Vec::with_capacity(subject.aliases.len() + 1);
        aliases.push(representative.clone());
        aliases.extend(subject.aliases.iter().map(|alias| {
            if is_full_name(alias) {
                (*alias).to_string()
            } else {
                qualify(namespace, alias)
            }
        }));

        Self {
            unqualified_name: unqualified.to_string(),
            namespace: namespace.to_string(),
            representative,
            aliases,
        }
    }
}

/// Text before the last dot, or empty for an unqualified name.
pub fn namespace_of(name: &str) -> &str {
    name.rsplit_once('.').map(|(ns, _)| ns).unwrap_or("")
}

/// Last dot-separated segment of a name.
pub fn unqualified_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Check if a name is dotted, i.e. carries its own namespace.
pub fn is_full_name(name: &str) -> bool {
    name.contains('.')
}

/// Reconcile enclosing namespace, declared namespace and a possibly dotted
/// name into the namespace that actually applies.
///
/// A dotted name wins over everything, then a non-empty declared namespace,
/// then the enclosing one.
pub fn effective_namespace<'s>(
    enclosing_namespace: &'s str,
    declared_namespace: Option<&'s str>,
    name: &'s str,
) -> &'s str {
    if is_full_name(name) {
        return namespace_of(name);
    }
    match declared_namespace {
        Some(ns) if !ns.is_empty() => ns,
        _ => enclosing_namespace,
    }
}

fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}
