//! Path node trees for tracker layouts.
//!
//! A path canvas roots its own hierarchy of [`TreeNode`]s, built up through
//! drag gestures. Nodes live in a session-scoped [`NodeRegistry`] arena:
//! children are owned through the child list, while the parent link is a
//! plain arena key that never owns anything.
//!
//! [`transform_tree`] turns a subtree into a [`RenderTree`] of plain nested
//! records for display and diagnostics.

mod error;
mod node;
mod registry;
mod transform;
mod tree;

pub use error::NodeError;
pub use node::{DisplayPayload, NodeId, NodeKey, TreeNode};
pub use registry::NodeRegistry;
pub use transform::{transform_tree, RenderTree};
