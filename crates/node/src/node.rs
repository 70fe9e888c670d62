//! # Tree Nodes
//!
//! This module defines the data carried by every element of a path hierarchy.
//!
//! ## Key Components
//!
//! - **NodeId**: Stable, serializable identity minted when a node is created
//! - **NodeKey**: Arena handle used for parent/child links inside a session
//! - **DisplayPayload**: The name and icon reference handed to the renderer
//! - **TreeNode**: Payload plus ordered children and a non-owning parent link
//!
//! Structural mutation lives on [`crate::NodeRegistry`], which owns every node.
//! A `TreeNode` on its own is read-only outside this crate.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

slotmap::new_key_type! {
    /// Arena handle for a node inside a [`crate::NodeRegistry`].
    pub struct NodeKey;
}

/// Unique identifier for a tree node.
///
/// Rendered in the 32 character "simple" hex form, which is also the form
/// carried on the drag channel when a node is dragged.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(uuid::Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parse an identifier from either the simple or the hyphenated form.
    pub fn parse(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s.trim()).ok().map(Self)
    }

    /// Create a NodeId from a u128 (useful for tests).
    pub fn from_u128(value: u128) -> Self {
        Self(uuid::Uuid::from_u128(value))
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", &self.to_string()[..8])
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// What the renderer needs to draw a node.
///
/// The icon reference is opaque here; only the rendering side interprets it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPayload {
    pub name: String,
    pub icon: String,
}

impl DisplayPayload {
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
        }
    }
}

/// A node in a path hierarchy.
#[derive(Clone, Debug)]
pub struct TreeNode {
    pub(crate) id: NodeId,
    pub(crate) payload: DisplayPayload,
    /// Owned children, in display order.
    pub(crate) children: SmallVec<[NodeKey; 4]>,
    /// Back-reference for upward walks and self-removal. Never an ownership edge.
    pub(crate) parent: Option<NodeKey>,
}

impl TreeNode {
    pub(crate) fn new(id: NodeId, payload: DisplayPayload) -> Self {
        Self {
            id,
            payload,
            children: SmallVec::new(),
            parent: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn payload(&self) -> &DisplayPayload {
        &self.payload
    }

    pub fn name(&self) -> &str {
        &self.payload.name
    }

    pub fn icon(&self) -> &str {
        &self.payload.icon
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
