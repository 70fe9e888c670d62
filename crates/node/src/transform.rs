//! Conversion of a node subtree into plain nested records.
//!
//! The output feeds the hierarchical tree display and doubles as a
//! diagnostic dump.

use crate::{NodeKey, NodeRegistry};
use serde::{Deserialize, Serialize};

/// A renderable, serializable snapshot of a subtree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderTree {
    pub name: String,
    pub icon: String,
    pub children: Vec<RenderTree>,
}

impl RenderTree {
    /// Total number of records in this tree, including the root
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(RenderTree::node_count).sum::<usize>()
    }

    /// Number of levels; a lone record has depth 1
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(RenderTree::depth).max().unwrap_or(0)
    }
}

/// Snapshots the subtree rooted at `node`.
///
/// An absent node, or a handle that no longer resolves, yields `None`.
/// Children are visited in order; the registry is only read.
pub fn transform_tree(registry: &NodeRegistry, node: Option<NodeKey>) -> Option<RenderTree> {
    let node = registry.get(node?)?;

    Some(RenderTree {
        name: node.name().to_string(),
        icon: node.icon().to_string(),
        children: node
            .children()
            .iter()
            .filter_map(|&child| transform_tree(registry, Some(child)))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DisplayPayload;

    fn assert_shape(registry: &NodeRegistry, key: NodeKey, tree: &RenderTree) {
        let node = registry.get(key).unwrap();
        assert_eq!(tree.name, node.name());
        assert_eq!(tree.icon, node.icon());
        assert_eq!(tree.children.len(), node.children().len());
        for (child, child_tree) in node.children().iter().zip(&tree.children) {
            assert_shape(registry, *child, child_tree);
        }
    }

    #[test]
    fn test_absent_node() {
        let registry = NodeRegistry::new();
        assert_eq!(transform_tree(&registry, None), None);
    }

    #[test]
    fn test_single_node() {
        let mut registry = NodeRegistry::new();
        let root = registry.create_node(DisplayPayload::new("root", "icons/root.png"));

        let tree = transform_tree(&registry, Some(root)).unwrap();

        assert_eq!(
            tree,
            RenderTree {
                name: "root".into(),
                icon: "icons/root.png".into(),
                children: vec![],
            }
        );
    }

    #[test]
    fn test_child_counts_match_at_every_depth() {
        let mut registry = NodeRegistry::new();
        let root = registry.create_node(DisplayPayload::new("1", "icon 1"));
        let n2 = registry.create_node(DisplayPayload::new("2", "icon 2"));
        let n3 = registry.create_node(DisplayPayload::new("3", "icon 3"));
        let n4 = registry.create_node(DisplayPayload::new("4", "icon 4"));
        let n5 = registry.create_node(DisplayPayload::new("5", "icon 5"));
        registry.add_child(n2, n3).unwrap();
        registry.add_child(n2, n4).unwrap();
        registry.add_child(n4, n5).unwrap();
        registry.add_child(root, n2).unwrap();

        let tree = transform_tree(&registry, Some(root)).unwrap();

        assert_shape(&registry, root, &tree);
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.depth(), 4);
        assert_eq!(tree.children[0].children[1].children[0].name, "5");
    }

    #[test]
    fn test_deep_chain() {
        let mut registry = NodeRegistry::new();
        let root = registry.create_node(DisplayPayload::new("0", "0.png"));
        let mut tail = root;
        for i in 1..64 {
            let next = registry.create_node(DisplayPayload::new(i.to_string(), "x.png"));
            registry.add_child(tail, next).unwrap();
            tail = next;
        }

        let tree = transform_tree(&registry, Some(root)).unwrap();
        assert_shape(&registry, root, &tree);
        assert_eq!(tree.depth(), 64);
    }

    #[test]
    fn test_transform_does_not_mutate() {
        let mut registry = NodeRegistry::new();
        let root = registry.create_node(DisplayPayload::new("root", "r.png"));
        let child = registry.create_node(DisplayPayload::new("child", "c.png"));
        registry.add_child(root, child).unwrap();

        let first = transform_tree(&registry, Some(root));
        let second = transform_tree(&registry, Some(root));

        assert_eq!(first, second);
        assert_eq!(registry.children(root), &[child]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_diagnostic_dump() {
        let mut registry = NodeRegistry::new();
        let root = registry.create_node(DisplayPayload::new("root", "r.png"));
        let child = registry.create_node(DisplayPayload::new("child", "c.png"));
        registry.add_child(root, child).unwrap();

        let tree = transform_tree(&registry, Some(root)).unwrap();
        let json = serde_json::to_value(&tree).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "name": "root",
                "icon": "r.png",
                "children": [{ "name": "child", "icon": "c.png", "children": [] }]
            })
        );
    }
}
