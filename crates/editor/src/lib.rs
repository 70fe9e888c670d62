//! Editing session for a tracker layout.
//!
//! [`LayoutEditor`] owns the current [`interchange::LayoutDocument`], the
//! node registry shared by its path canvases, and a [`Debouncer`] that
//! throttles live preview updates.

mod config;
mod debounce;
mod session;

pub use config::EditorConfig;
pub use debounce::Debouncer;
pub use session::{entry_label, LayoutEditor};

use interchange::InterchangeError;
use node::NodeError;

/// Error type for editing operations.
///
/// A failed operation leaves the session as it was.
#[derive(Debug)]
pub enum EditorError {
    Document(InterchangeError),
    Config(String),
    Tree(NodeError),
    UnknownComponent(String),
    UnknownPath(String),
    UnknownElement(String),
}

impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Document(e) => write!(f, "{}", e),
            Self::Config(msg) => write!(f, "Config error: {}", msg),
            Self::Tree(e) => write!(f, "{}", e),
            Self::UnknownComponent(id) => write!(f, "No component with id {}", id),
            Self::UnknownPath(id) => write!(f, "No path with id {}", id),
            Self::UnknownElement(id) => write!(f, "No custom element with id {}", id),
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Document(e) => Some(e),
            Self::Tree(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InterchangeError> for EditorError {
    fn from(e: InterchangeError) -> Self {
        Self::Document(e)
    }
}
