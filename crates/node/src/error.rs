use crate::NodeKey;

/// Error type for tree mutations.
///
/// A failed mutation leaves the tree exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// `delete_node` on a node that has no parent.
    MissingParent(NodeKey),
    /// The child is the parent itself or one of its ancestors.
    Cycle { parent: NodeKey, child: NodeKey },
    /// The handle does not refer to a live node in this registry.
    UnknownNode(NodeKey),
}

impl std::fmt::Display for NodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingParent(key) => write!(f, "Node {:?} has no parent to delete it from", key),
            Self::Cycle { parent, child } => write!(
                f,
                "Adding {:?} under {:?} would make it its own ancestor",
                child, parent
            ),
            Self::UnknownNode(key) => write!(f, "Unknown node: {:?}", key),
        }
    }
}

impl std::error::Error for NodeError {}
