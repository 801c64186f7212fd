//! Depth-first traversal of schema type graphs.
//!
//! The walker folds a visitor over every node of one or more schema roots in
//! pre-order. Named types are registered as they are defined and references
//! are resolved against the registry, so a reference reports the kind and
//! node of the type it names. A reference to a type that is still being
//! expanded on the current branch is flagged as recursive.
//!
//! References never descend: a named type is expanded once, where it is
//! defined. This is what guarantees termination on self-referential schemas.

mod flatten;
mod tree;

use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::SchemaError;
use crate::schema::{
    children, classify, parse_roots, unwrap_schema, Classified, NameDescriptor, NameRef,
};
use crate::schema::{NameRegistry, SchemaKind};

pub use flatten::{flatten, FlatEntry};
pub use tree::{SchemaTree, TreeNode};

/// Position of a node within its root, as a sequence of path segments.
///
/// Segments are field names or the synthetic `$index`, `$key` and
/// `$memberN` markers. Displays as the segments joined with `.`; the root's
/// key chain is empty and displays as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyChain {
    segments: Vec<String>,
}

impl KeyChain {
    /// The empty key chain of a root.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of this chain extended with one segment.
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(key.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment, if any.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Number of segments; 0 for a root.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for KeyChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl<S: Into<String>> FromIterator<S> for KeyChain {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// What the visitor sees for each node.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit<'a> {
    /// Structural kind; for a reference, the kind of the type it names.
    pub kind: SchemaKind,
    /// The node itself; for a reference, the registered definition.
    pub node: &'a Value,
    /// Canonical full name, for definitions and references.
    pub representative: Option<String>,
    /// Whether the node is a by-name reference rather than a definition.
    pub is_reference: bool,
    /// Whether the reference points back at an ancestor on this branch.
    pub is_recursive_reference: bool,
}

/// How registries are scoped across the roots of one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegistryScope {
    /// Every root is walked with its own fresh registry.
    #[default]
    PerRoot,
    /// Roots share one registry, so later roots may reference types defined
    /// by earlier ones.
    Shared,
}

/// Walker configuration.
///
/// # Example
/// ```
/// use avrowalk::walk::{RegistryScope, WalkOptions};
///
/// let opts = WalkOptions::default().with_registry_scope(RegistryScope::Shared);
/// assert!(opts.reserve_primitive_names);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// Registry scope across roots (default: per root).
    pub registry_scope: RegistryScope,
    /// Refuse named types called after a primitive token (default: true).
    pub reserve_primitive_names: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            registry_scope: RegistryScope::PerRoot,
            reserve_primitive_names: true,
        }
    }
}

impl WalkOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the registry scope.
    pub fn with_registry_scope(mut self, scope: RegistryScope) -> Self {
        self.registry_scope = scope;
        self
    }

    /// Set whether primitive tokens are reserved.
    pub fn with_reserved_primitives(mut self, reserve: bool) -> Self {
        self.reserve_primitive_names = reserve;
        self
    }
}

/// Representatives entered on the current branch, innermost first.
///
/// Links are shared between a node and all of its descendants, so extending
/// the chain for a child never copies it.
#[derive(Debug)]
struct TypeChain {
    representative: String,
    parent: Option<Rc<TypeChain>>,
}

/// Per-branch traversal state. Each call extends its own copy.
#[derive(Debug, Clone)]
struct Context {
    namespace: Rc<str>,
    type_chain: Option<Rc<TypeChain>>,
    key_chain: KeyChain,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            namespace: Rc::from(""),
            type_chain: None,
            key_chain: KeyChain::new(),
        }
    }
}

impl Context {
    fn child(&self, key: &str) -> Self {
        Self {
            namespace: Rc::clone(&self.namespace),
            type_chain: self.type_chain.clone(),
            key_chain: self.key_chain.child(key),
        }
    }

    fn enter(&self, nd: &NameDescriptor) -> Self {
        Self {
            namespace: Rc::from(nd.namespace.as_str()),
            type_chain: Some(Rc::new(TypeChain {
                representative: nd.representative.clone(),
                parent: self.type_chain.clone(),
            })),
            key_chain: self.key_chain.clone(),
        }
    }

    fn is_on_chain(&self, representative: &str) -> bool {
        let mut link = self.type_chain.as_deref();
        while let Some(current) = link {
            if current.representative == representative {
                return true;
            }
            link = current.parent.as_deref();
        }
        false
    }
}

/// Schema walker.
#[derive(Debug, Clone, Default)]
pub struct Walker {
    options: WalkOptions,
}

impl Walker {
    /// Create a walker with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a walker with the given options.
    pub fn with_options(options: WalkOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WalkOptions {
        &self.options
    }

    fn new_registry<'a>(&self) -> NameRegistry<&'a Value> {
        if self.options.reserve_primitive_names {
            NameRegistry::for_schemas()
        } else {
            NameRegistry::new()
        }
    }

    /// Fold `visitor` over every node of every root.
    ///
    /// Each root starts from a fresh accumulator produced by `init`, an empty
    /// namespace, and an empty key chain; the result holds one final
    /// accumulator per root. Errors from the visitor are returned unchanged;
    /// schema errors are converted with `E::from`.
    pub fn walk<'a, A, E, V, F>(
        &self,
        roots: &'a [Value],
        mut visitor: V,
        mut init: F,
    ) -> Result<Vec<A>, E>
    where
        V: FnMut(A, &Visit<'a>, &KeyChain) -> Result<A, E>,
        F: FnMut() -> A,
        E: From<SchemaError>,
    {
        let mut shared = self.new_registry();
        let mut results = Vec::with_capacity(roots.len());

        for (index, root) in roots.iter().enumerate() {
            debug!(root = index, scope = ?self.options.registry_scope, "Walking schema root");

            let mut fresh;
            let registry = match self.options.registry_scope {
                RegistryScope::Shared => &mut shared,
                RegistryScope::PerRoot => {
                    fresh = self.new_registry();
                    &mut fresh
                }
            };

            let acc = walk_node(registry, &mut visitor, &Context::default(), root, init())?;
            results.push(acc);
        }

        Ok(results)
    }

    /// Parse schema text with [`parse_roots`] and walk the result.
    pub fn walk_json<A, E, V, F>(&self, json: &str, visitor: V, init: F) -> Result<Vec<A>, E>
    where
        V: for<'v> FnMut(A, &Visit<'v>, &KeyChain) -> Result<A, E>,
        F: FnMut() -> A,
        E: From<SchemaError>,
    {
        let roots = parse_roots(json)?;
        self.walk(&roots, visitor, init)
    }
}

/// Walk `roots` with default options. See [`Walker::walk`].
///
/// # Example
/// ```
/// use avrowalk::walk::walk;
/// use avrowalk::SchemaError;
/// use serde_json::json;
///
/// let roots = vec![json!({
///     "type": "record",
///     "name": "A",
///     "fields": [{"name": "A1", "type": "string"}]
/// })];
///
/// let visits = walk(
///     &roots,
///     |mut acc: Vec<(String, String)>, visit, path| {
///         acc.push((visit.kind.to_string(), path.to_string()));
///         Ok::<_, SchemaError>(acc)
///     },
///     Vec::new,
/// )
/// .unwrap();
///
/// assert_eq!(
///     visits[0],
///     vec![
///         ("record".to_string(), "".to_string()),
///         ("string".to_string(), "A1".to_string()),
///     ]
/// );
/// ```
pub fn walk<'a, A, E, V, F>(roots: &'a [Value], visitor: V, init: F) -> Result<Vec<A>, E>
where
    V: FnMut(A, &Visit<'a>, &KeyChain) -> Result<A, E>,
    F: FnMut() -> A,
    E: From<SchemaError>,
{
    Walker::new().walk(roots, visitor, init)
}

/// Parse and walk schema text with default options. See [`Walker::walk_json`].
pub fn walk_json<A, E, V, F>(json: &str, visitor: V, init: F) -> Result<Vec<A>, E>
where
    V: for<'v> FnMut(A, &Visit<'v>, &KeyChain) -> Result<A, E>,
    F: FnMut() -> A,
    E: From<SchemaError>,
{
    Walker::new().walk_json(json, visitor, init)
}

fn walk_node<'a, A, E, V>(
    registry: &mut NameRegistry<&'a Value>,
    visitor: &mut V,
    ctx: &Context,
    node: &'a Value,
    acc: A,
) -> Result<A, E>
where
    V: FnMut(A, &Visit<'a>, &KeyChain) -> Result<A, E>,
    E: From<SchemaError>,
{
    let node = unwrap_schema(node);
    let classified = classify(node)?;

    let (visit, scope, classified) = match classified {
        Classified::Reference(name) => {
            let visit = resolve_reference(registry, ctx, name)?;
            if visit.is_recursive_reference {
                debug!(
                    path = %ctx.key_chain,
                    representative = visit.representative.as_deref().unwrap_or_default(),
                    "Recursive reference"
                );
            }
            trace!(path = %ctx.key_chain, kind = %visit.kind, "Visiting reference");
            return visitor(acc, &visit, &ctx.key_chain);
        }
        Classified::Named { kind, entry } => {
            let subject = NameRef::from_entry(entry).ok_or_else(|| {
                SchemaError::InvalidSchema(format!("{} missing 'name' field", kind.as_str()))
            })?;
            let nd = registry.register(&ctx.namespace, subject, entry)?;
            let visit = Visit {
                kind: kind.into(),
                node: entry,
                representative: Some(nd.representative.clone()),
                is_reference: false,
                is_recursive_reference: false,
            };
            (visit, ctx.enter(&nd), classified)
        }
        other => {
            let kind = other.kind().ok_or_else(|| {
                SchemaError::InvalidSchema(format!("Unclassified schema node: {}", node))
            })?;
            let visit = Visit {
                kind,
                node,
                representative: None,
                is_reference: false,
                is_recursive_reference: false,
            };
            (visit, ctx.clone(), other)
        }
    };

    trace!(path = %ctx.key_chain, kind = %visit.kind, "Visiting schema node");
    let mut acc = visitor(acc, &visit, &ctx.key_chain)?;

    for child in children(&classified)? {
        acc = walk_node(registry, visitor, &scope.child(&child.key), child.node, acc)?;
    }

    Ok(acc)
}

fn resolve_reference<'a>(
    registry: &NameRegistry<&'a Value>,
    ctx: &Context,
    name: &str,
) -> Result<Visit<'a>, SchemaError> {
    let (representative, target) = registry
        .resolve(&ctx.namespace, name)
        .and_then(|rep| registry.get(rep).map(|target| (rep.to_string(), *target)))
        .ok_or_else(|| SchemaError::UndefinedTypeReference {
            name: name.to_string(),
            namespace: ctx.namespace.to_string(),
            path: ctx.key_chain.to_string(),
        })?;

    let kind = classify(target)?.kind().ok_or_else(|| {
        SchemaError::InvalidSchema(format!("'{}' is not a named type", representative))
    })?;
    let is_recursive_reference = ctx.is_on_chain(&representative);

    Ok(Visit {
        kind,
        node: target,
        representative: Some(representative),
        is_reference: true,
        is_recursive_reference,
    })
}
