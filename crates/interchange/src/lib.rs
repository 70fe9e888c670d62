//! Tracker Layout Interchange Format
//!
//! JSON-based persisted form of a tracker layout, plus the normalization pass
//! that upgrades stale or partial documents to the current component schema.
//!
//! # Document Format
//!
//! ```json
//! {
//!   "id": "5b0f1c8e6a2d4f7e9c3b1a0d2e4f6a8b",
//!   "layoutConfig": { "name": "My Tracker" },
//!   "components": [
//!     { "type": "label", "text": "hi", "position": [10, 10] }
//!   ],
//!   "paths": [],
//!   "elements": []
//! }
//! ```
//!
//! Components and paths are open records discriminated by `type`. Loading
//! runs [`normalize_layout`]; saving writes the in-memory document as is.

mod document;
mod elements;
mod kind;
mod normalize;

pub use document::{Entry, LayoutDocument, DEFAULT_FILE_NAME, LAYOUT_EXTENSION};
pub use elements::{
    builtin_elements, dangling_element_refs, reconcile_element_refs, reconcile_element_refs_to,
    DanglingRef, ElementCatalog, ElementDefinition, ElementLabel, ElementType, FALLBACK_ELEMENT_ID,
};
pub use kind::ComponentKind;
pub use normalize::{normalize_entries, normalize_entry, normalize_layout, retype_entry};

/// Error type for interchange operations.
///
/// Any of these aborts a load; the caller's current document stays as it was.
#[derive(Debug)]
pub enum InterchangeError {
    Parse(String),
    InvalidStructure(String),
    MissingField(String),
    Io(String),
}

impl std::fmt::Display for InterchangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "Parse error: {}", msg),
            Self::InvalidStructure(msg) => write!(f, "Invalid structure: {}", msg),
            Self::MissingField(msg) => write!(f, "Missing field: {}", msg),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for InterchangeError {}

/// Mints a new identifier in the 32 hex character form used across layout files.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_format() {
        let id = generate_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(id, generate_id());
    }
}
