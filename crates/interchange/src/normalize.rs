//! Upgrades persisted records to the current component schema.
//!
//! Each record of a known type is rebuilt as: its `id` (kept, or minted when
//! missing), its `type`, the type's default fields, and finally every raw
//! field on top. Raw values always win, unknown fields survive, and running
//! the pass twice yields the same document.

use crate::{generate_id, ComponentKind, Entry, LayoutDocument};
use serde_json::Value;

/// Normalizes every component and path of a freshly loaded document.
pub fn normalize_layout(raw: LayoutDocument) -> LayoutDocument {
    let LayoutDocument {
        id,
        layout_config,
        components,
        paths,
        elements,
        extra,
    } = raw;

    let doc = LayoutDocument {
        id,
        layout_config,
        components: normalize_entries(components),
        paths: normalize_entries(paths),
        elements,
        extra,
    };

    log::debug!(
        "normalized layout {:?}: {} components, {} paths",
        doc.id,
        doc.components.len(),
        doc.paths.len()
    );
    doc
}

pub fn normalize_entries(entries: Vec<Entry>) -> Vec<Entry> {
    entries.into_iter().map(normalize_entry).collect()
}

/// Fills in one record. Records of unknown type come back unchanged.
pub fn normalize_entry(raw: Entry) -> Entry {
    let kind = raw.kind();
    let Some(defaults) = kind.normalized_defaults() else {
        return raw;
    };

    let id = match raw.get("id") {
        Some(id) => id.clone(),
        None => Value::String(generate_id()),
    };

    let mut merged = Entry::new();
    merged.insert("id", id);
    merged.insert("type", &kind);
    for (key, value) in defaults.into_map() {
        merged.insert(key, value);
    }
    for (key, value) in raw.into_map() {
        merged.insert(key, value);
    }
    merged
}

/// Rebuilds a record as a fresh instance of `kind`, keeping only its `id`
/// and `position`.
///
/// Switching to an unknown type returns the record unchanged.
pub fn retype_entry(entry: &Entry, kind: &ComponentKind) -> Entry {
    let Some(template) = kind.template() else {
        return entry.clone();
    };

    let mut retyped = Entry::new();
    if let Some(id) = entry.get("id") {
        retyped.insert("id", id.clone());
    }
    retyped.insert("type", kind);
    if let Some(position) = entry.get("position") {
        retyped.insert("position", position.clone());
    }
    for (key, value) in template.into_map() {
        retyped.insert(key, value);
    }
    retyped
}
