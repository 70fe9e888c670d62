//! # Node Registry
//!
//! The registry owns every node created during one editing session and maps
//! generated [`NodeId`]s back to arena handles. Drag gestures carry node ids,
//! so a later drop can resolve a node that already exists instead of
//! re-creating it.
//!
//! Entries are never evicted while the session lives. Detached subtrees stay
//! addressable until [`NodeRegistry::dispose`] ends the session.

use crate::{NodeId, NodeKey, TreeNode};
use slotmap::SlotMap;
use std::collections::HashMap;

/// Session-scoped node arena plus identifier index.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    /// Storage for all nodes, indexed by their keys
    pub(crate) nodes: SlotMap<NodeKey, TreeNode>,

    /// Maps generated identifiers to arena keys
    pub(crate) index: HashMap<NodeId, NodeKey>,
}

impl NodeRegistry {
    /// Creates an empty registry for a new editing session
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            index: HashMap::new(),
        }
    }

    /// Stores a node and indexes it under its identifier
    pub(crate) fn register(&mut self, node: TreeNode) -> NodeKey {
        let id = node.id;
        let key = self.nodes.insert(node);
        self.index.insert(id, key);
        key
    }

    /// Resolves an identifier to the node registered under it
    pub fn resolve(&self, id: &NodeId) -> Option<NodeKey> {
        self.index.get(id).copied()
    }

    /// Resolves a raw identifier string, as carried by a drag payload
    pub fn resolve_str(&self, raw: &str) -> Option<NodeKey> {
        NodeId::parse(raw).and_then(|id| self.resolve(&id))
    }

    pub fn get(&self, key: NodeKey) -> Option<&TreeNode> {
        self.nodes.get(key)
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    /// Returns the identifier of a live node
    pub fn id_of(&self, key: NodeKey) -> Option<NodeId> {
        self.nodes.get(key).map(|node| node.id)
    }

    /// Number of nodes created during this session, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &TreeNode)> {
        self.nodes.iter()
    }

    /// Ends the session, dropping every node and index entry.
    ///
    /// Keys handed out before this call no longer resolve.
    pub fn dispose(&mut self) {
        log::debug!("disposing node registry with {} nodes", self.nodes.len());
        self.nodes.clear();
        self.index.clear();
    }
}
