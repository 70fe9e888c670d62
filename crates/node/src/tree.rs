//! Structural operations on path hierarchies.
//!
//! Every mutation keeps the parent/child relation mutually consistent:
//! `n.parent == Some(p)` exactly when `p.children` holds `n` once.

use crate::{DisplayPayload, NodeError, NodeId, NodeKey, NodeRegistry, TreeNode};

impl NodeRegistry {
    /// Allocates a detached node and registers it under a fresh identifier
    pub fn create_node(&mut self, payload: DisplayPayload) -> NodeKey {
        let id = NodeId::new();
        log::debug!("creating node {} ({})", id, payload.name);
        self.register(TreeNode::new(id, payload))
    }

    /// Appends `child` to `parent`'s children.
    ///
    /// A child that already hangs under some node is detached from it first,
    /// so re-adding a pair moves the child to the end instead of duplicating
    /// it. Adding a node under itself or under one of its descendants fails
    /// with [`NodeError::Cycle`].
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), NodeError> {
        if !self.nodes.contains_key(parent) {
            return Err(NodeError::UnknownNode(parent));
        }
        if !self.nodes.contains_key(child) {
            return Err(NodeError::UnknownNode(child));
        }

        if self.is_ancestor(child, parent) {
            return Err(NodeError::Cycle { parent, child });
        }

        if let Some(old_parent) = self.nodes[child].parent {
            self.unlink(old_parent, child);
        }

        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    /// Removes `child` from `parent`'s children and clears its parent link.
    ///
    /// Does nothing when `child` is not a child of `parent`. The removed
    /// subtree stays registered.
    pub fn delete_child(&mut self, parent: NodeKey, child: NodeKey) {
        if self.unlink(parent, child) {
            if let Some(node) = self.nodes.get_mut(child) {
                node.parent = None;
            }
        }
    }

    /// Asks the node's parent to excise it.
    pub fn delete_node(&mut self, node: NodeKey) -> Result<(), NodeError> {
        let parent = self
            .nodes
            .get(node)
            .ok_or(NodeError::UnknownNode(node))?
            .parent
            .ok_or(NodeError::MissingParent(node))?;

        self.delete_child(parent, node);
        Ok(())
    }

    pub fn parent(&self, node: NodeKey) -> Option<NodeKey> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeKey) -> &[NodeKey] {
        self.nodes
            .get(node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Walks parent links up to the topmost node
    pub fn root_of(&self, node: NodeKey) -> Option<NodeKey> {
        let mut current = self.nodes.get(node).map(|_| node)?;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        Some(current)
    }

    /// Returns whether `node` is `descendant` or one of its ancestors.
    ///
    /// Iterates up the parent chain, so depth is not bounded by the stack.
    pub fn is_ancestor(&self, node: NodeKey, descendant: NodeKey) -> bool {
        let mut current = Some(descendant);
        while let Some(id) = current {
            if id == node {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// All nodes below `node` in depth-first pre-order, excluding `node`
    pub fn descendants(&self, node: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeKey> = self.children(node).iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            out.push(key);
            stack.extend(self.children(key).iter().rev().copied());
        }
        out
    }

    fn unlink(&mut self, parent: NodeKey, child: NodeKey) -> bool {
        let Some(parent_node) = self.nodes.get_mut(parent) else {
            return false;
        };
        match parent_node.children.iter().position(|&key| key == child) {
            Some(index) => {
                parent_node.children.remove(index);
                true
            }
            None => false,
        }
    }
}
