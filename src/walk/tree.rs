//! Arena tree of visited nodes.
//!
//! Built by folding the walker over a root and attaching each visit to the
//! nearest open ancestor by key-chain depth.

use serde_json::Value;

use crate::error::SchemaError;
use crate::schema::SchemaKind;
use crate::walk::{KeyChain, Visit, Walker, WalkOptions};

/// One node of a [`SchemaTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub kind: SchemaKind,
    /// Dotted key chain, empty for the root.
    pub path: String,
    /// Last key-chain segment; `None` for the root.
    pub key: Option<String>,
    /// Canonical full name of a named type or reference.
    pub name: Option<String>,
    pub is_recursive: bool,
    /// Index of the parent node; `None` for the root.
    pub parent: Option<usize>,
    /// Indices of child nodes, in visiting order.
    pub children: Vec<usize>,
}

/// Tree of the nodes visited under one schema root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaTree {
    nodes: Vec<TreeNode>,
}

#[derive(Default)]
struct TreeBuilder {
    tree: SchemaTree,
    /// Open ancestors, one per depth
    open: Vec<usize>,
}

impl TreeBuilder {
    fn push(mut self, visit: &Visit<'_>, path: &KeyChain) -> Self {
        self.open.truncate(path.depth());
        let parent = self.open.last().copied();
        let index = self.tree.nodes.len();

        self.tree.nodes.push(TreeNode {
            kind: visit.kind,
            path: path.to_string(),
            key: path.last().map(String::from),
            name: visit.representative.clone(),
            is_recursive: visit.is_recursive_reference,
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent {
            self.tree.nodes[p].children.push(index);
        }
        self.open.push(index);
        self
    }
}

impl SchemaTree {
    /// Build one tree per root.
    pub fn build(roots: &[Value], options: &WalkOptions) -> Result<Vec<SchemaTree>, SchemaError> {
        let builders = Walker::with_options(options.clone()).walk(
            roots,
            |builder: TreeBuilder, visit, path| Ok::<_, SchemaError>(builder.push(visit, path)),
            TreeBuilder::default,
        )?;
        Ok(builders.into_iter().map(|b| b.tree).collect())
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.nodes.first()
    }

    pub fn get(&self, index: usize) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Children of a node, in visiting order.
    pub fn children<'t>(&'t self, node: &'t TreeNode) -> impl Iterator<Item = &'t TreeNode> + 't {
        node.children.iter().filter_map(move |&i| self.nodes.get(i))
    }

    /// Nodes grouped by depth, breadth-first from the root.
    pub fn levels(&self) -> Vec<Vec<&TreeNode>> {
        let mut levels = Vec::new();
        let mut level: Vec<&TreeNode> = self.root().into_iter().collect();

        while !level.is_empty() {
            let next = level
                .iter()
                .flat_map(|&node| self.children(node))
                .collect();
            levels.push(level);
            level = next;
        }

        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tree_levels() {
        let roots = vec![json!({
            "type": "record",
            "name": "B",
            "fields": [
                {"name": "B1", "type": [null, "int"]},
                {"name": "B2", "type": {"type": "array", "items": "string"}}
            ]
        })];

        let trees = SchemaTree::build(&roots, &WalkOptions::default()).unwrap();
        let levels = trees[0].levels();
        let levels: Vec<Vec<&str>> = levels
            .iter()
            .map(|level| level.iter().map(|n| n.path.as_str()).collect())
            .collect();

        assert_eq!(
            levels,
            vec![
                vec![""],
                vec!["B1", "B2"],
                vec!["B1.$member0", "B1.$member1", "B2.$index"],
            ]
        );
    }

    #[test]
    fn test_tree_parent_links() {
        let roots = vec![json!({
            "type": "record",
            "name": "LongList",
            "fields": [{"name": "next", "type": ["null", "LongList"]}]
        })];

        let trees = SchemaTree::build(&roots, &WalkOptions::default()).unwrap();
        let tree = &trees[0];

        assert_eq!(tree.len(), 4);
        let root = tree.root().unwrap();
        assert_eq!(root.parent, None);
        assert_eq!(root.name.as_deref(), Some("LongList"));

        let recursive = tree.get(3).unwrap();
        assert!(recursive.is_recursive);
        assert_eq!(recursive.key.as_deref(), Some("$member1"));
        assert_eq!(recursive.parent, Some(1));
        assert!(recursive.children.is_empty());
        assert_eq!(tree.get(1).unwrap().children, vec![2, 3]);
    }
}
