//! Registry of named types.
//!
//! Maps every alias of a named type onto its canonical representative, and
//! stores one value per representative. This replaces the loose
//! fullname-keyed map used by a plain parser with something that also
//! understands aliases and enforces uniqueness.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::SchemaError;
use crate::schema::name::{unqualified_name, NameDescriptor, NameRef};
use crate::schema::types::Primitive;

/// Alias-aware registry of named types.
///
/// A registry lives for a single traversal; it is never shared between
/// independent walks.
#[derive(Debug, Clone)]
pub struct NameRegistry<V> {
    /// Alias -> representative
    representatives: HashMap<String, String>,
    /// Representative -> value
    values: HashMap<String, V>,
    /// Unqualified names that can never be registered
    reserved: HashSet<String>,
}

impl<V> Default for NameRegistry<V> {
    fn default() -> Self {
        Self {
            representatives: HashMap::new(),
            values: HashMap::new(),
            reserved: HashSet::new(),
        }
    }
}

impl<V> NameRegistry<V> {
    /// Create an empty registry with no reserved names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that refuses the given unqualified names.
    pub fn with_reserved<I, S>(reserved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reserved: reserved.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Create a registry that refuses the eight primitive type tokens.
    pub fn for_schemas() -> Self {
        Self::with_reserved(Primitive::tokens())
    }

    /// Compute the name descriptor of an entry or bare name.
    pub fn compute_descriptor<'a>(
        &self,
        enclosing_namespace: &str,
        subject: impl Into<NameRef<'a>>,
    ) -> NameDescriptor {
        NameDescriptor::compute(enclosing_namespace, &subject.into())
    }

    /// Register `value` under every name of `entry`.
    ///
    /// Fails with `DuplicateOrInvalidName` if the name is empty, if the
    /// unqualified part of the name or of any alias is reserved, or if any
    /// alias is already registered. That includes an alias mapped to this
    /// same representative: a full name can be defined only once per
    /// registry, so registering an identical definition twice fails too.
    /// Nothing is written on failure.
    pub fn register<'a>(
        &mut self,
        enclosing_namespace: &str,
        entry: impl Into<NameRef<'a>>,
        value: V,
    ) -> Result<NameDescriptor, SchemaError> {
        let nd = self.compute_descriptor(enclosing_namespace, entry);

        if nd.representative.is_empty() || nd.unqualified_name.is_empty() {
            return Err(SchemaError::invalid_names([nd.representative]));
        }

        let offending: Vec<&String> = nd
            .aliases
            .iter()
            .filter(|alias| {
                let unqualified = unqualified_name(alias);
                unqualified.is_empty()
                    || self.reserved.contains(unqualified)
                    || self.representatives.contains_key(alias.as_str())
            })
            .collect();
        if !offending.is_empty() {
            return Err(SchemaError::invalid_names(offending.into_iter().cloned()));
        }

        for alias in &nd.aliases {
            self.representatives
                .insert(alias.clone(), nd.representative.clone());
        }
        self.values.insert(nd.representative.clone(), value);

        debug!(
            representative = %nd.representative,
            aliases = nd.aliases.len(),
            "Registered named type"
        );
        Ok(nd)
    }

    /// Canonical representative of an entry or name, if registered.
    pub fn resolve<'a>(
        &self,
        enclosing_namespace: &str,
        subject: impl Into<NameRef<'a>>,
    ) -> Option<&str> {
        let nd = self.compute_descriptor(enclosing_namespace, subject);
        self.representatives
            .get(&nd.representative)
            .map(String::as_str)
    }

    /// Value stored for an entry or name, if registered.
    pub fn lookup<'a>(
        &self,
        enclosing_namespace: &str,
        subject: impl Into<NameRef<'a>>,
    ) -> Option<&V> {
        self.resolve(enclosing_namespace, subject)
            .and_then(|rep| self.values.get(rep))
    }

    /// Value stored under an already-canonical representative.
    pub fn get(&self, representative: &str) -> Option<&V> {
        self.values.get(representative)
    }

    /// Check if an entry or name resolves to a registered type.
    pub fn contains<'a>(&self, enclosing_namespace: &str, subject: impl Into<NameRef<'a>>) -> bool {
        self.lookup(enclosing_namespace, subject).is_some()
    }

    /// Check if an unqualified name is reserved.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }

    /// Number of registered types (not counting aliases).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over registered representatives, in no particular order.
    pub fn representatives(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}
