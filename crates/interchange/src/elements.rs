//! Element definitions and element reference checks.
//!
//! Components and paths point at tracker elements through `elementId`. The
//! set of valid targets is the built-in catalog followed by the layout's own
//! custom `elements`. A custom element can be deleted while records still
//! point at it; such references are reset to [`FALLBACK_ELEMENT_ID`].

use crate::{Entry, LayoutDocument};
use rust_embed::RustEmbed;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Element every dangling reference is reset to.
pub const FALLBACK_ELEMENT_ID: &str = "a081121b16f84366bf16e16ca90cd23f";

/// Data files embedded at compile time
#[derive(RustEmbed)]
#[folder = "data"]
pub(crate) struct Data;

impl Data {
    pub(crate) fn get_text(path: &str) -> Option<String> {
        Self::get(path).and_then(|file| String::from_utf8(file.data.to_vec()).ok())
    }
}

/// How an element widget reacts to input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Clicking cycles through the icons.
    #[default]
    Simple,
    /// Clicking and scrolling change a bounded counter.
    Counter,
    /// Like `Simple`, with a caption underneath.
    Label,
    /// Like `Simple`, with a small receiver widget attached.
    Nested,
}

/// Caption under a `label` element: fixed text or a list to cycle through.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ElementLabel {
    Text(String),
    Cycle(Vec<String>),
}

/// A tracker element: the icons and behavior behind an element component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ElementDefinition {
    pub id: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: ElementType,
    #[serde(default)]
    pub icons: Vec<String>,
    #[serde(default = "default_size")]
    pub size: [u32; 2],
    /// Counter bounds, `[min, max]`.
    #[serde(default = "default_count_config")]
    pub count_config: [i64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<ElementLabel>,
    #[serde(default)]
    pub label_starting_index: usize,
    #[serde(default)]
    pub selected_starting_index: usize,
    /// Whether drops onto this element replace its icon.
    #[serde(default)]
    pub receiver: bool,
    /// Whether dragging carries the selected icon rather than the default one.
    #[serde(default)]
    pub drag_current: bool,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_name() -> String {
    "Item".to_string()
}

fn default_size() -> [u32; 2] {
    [25, 25]
}

fn default_count_config() -> [i64; 2] {
    [0, 5]
}

impl ElementDefinition {
    pub fn from_entry(entry: &Entry) -> Option<Self> {
        match serde_json::from_value(Value::Object(entry.as_map().clone())) {
            Ok(element) => Some(element),
            Err(e) => {
                log::warn!("skipping malformed element {:?}: {}", entry.id(), e);
                None
            }
        }
    }
}

/// Elements shipped with the editor.
pub fn builtin_elements() -> &'static [ElementDefinition] {
    static BUILTIN: OnceLock<Vec<ElementDefinition>> = OnceLock::new();
    BUILTIN.get_or_init(|| {
        let Some(text) = Data::get_text("elements.json") else {
            log::error!("built-in element catalog is missing");
            return Vec::new();
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            log::error!("built-in element catalog is malformed: {}", e);
            Vec::new()
        })
    })
}

/// Built-in plus custom elements for one layout.
#[derive(Clone, Debug)]
pub struct ElementCatalog {
    elements: Vec<ElementDefinition>,
    ids: HashSet<String>,
}

impl ElementCatalog {
    pub fn new(custom: &[Entry]) -> Self {
        let mut elements: Vec<ElementDefinition> = builtin_elements().to_vec();
        let mut ids: HashSet<String> = elements.iter().map(|e| e.id.clone()).collect();

        for entry in custom {
            // A custom record only needs an id to be a valid reference target
            if let Some(id) = entry.id() {
                ids.insert(id.to_string());
            }
            if let Some(element) = ElementDefinition::from_entry(entry) {
                elements.push(element);
            }
        }

        Self { elements, ids }
    }

    pub fn for_layout(doc: &LayoutDocument) -> Self {
        Self::new(doc.custom_elements())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Later definitions win, so a custom element can shadow a built-in one.
    pub fn get(&self, id: &str) -> Option<&ElementDefinition> {
        self.elements.iter().rev().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementDefinition> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// A record whose `elementId` names no known element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DanglingRef {
    /// `"components"` or `"paths"`.
    pub list: &'static str,
    pub entry_id: Option<String>,
    pub element_id: String,
}

/// Lists every record pointing at an element the catalog does not have.
pub fn dangling_element_refs(doc: &LayoutDocument, catalog: &ElementCatalog) -> Vec<DanglingRef> {
    let lists = [("components", &doc.components), ("paths", &doc.paths)];
    lists
        .into_iter()
        .flat_map(|(list, entries)| {
            entries.iter().filter_map(move |entry| {
                let element_id = entry.element_id()?;
                (!catalog.contains(element_id)).then(|| DanglingRef {
                    list,
                    entry_id: entry.id().map(str::to_string),
                    element_id: element_id.to_string(),
                })
            })
        })
        .collect()
}

/// Resets dangling `elementId`s to [`FALLBACK_ELEMENT_ID`].
///
/// Records without an `elementId` are left alone. Returns how many
/// references were reset.
pub fn reconcile_element_refs(doc: &mut LayoutDocument, catalog: &ElementCatalog) -> usize {
    reconcile_element_refs_to(doc, catalog, FALLBACK_ELEMENT_ID)
}

/// Like [`reconcile_element_refs`], resetting to `fallback` instead.
pub fn reconcile_element_refs_to(
    doc: &mut LayoutDocument,
    catalog: &ElementCatalog,
    fallback: &str,
) -> usize {
    let mut reset = 0;
    for entry in doc.components.iter_mut().chain(doc.paths.iter_mut()) {
        let Some(element_id) = entry.element_id() else {
            continue;
        };
        if catalog.contains(element_id) {
            continue;
        }
        log::warn!(
            "{} {:?} points at missing element {}, resetting to {}",
            entry.type_name(),
            entry.id(),
            element_id,
            fallback
        );
        entry.insert("elementId", fallback);
        reset += 1;
    }
    reset
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> LayoutDocument {
        LayoutDocument::from_json(&value.to_string()).unwrap()
    }

    #[test]
    fn test_builtin_catalog_covers_default_references() {
        let catalog = ElementCatalog::new(&[]);
        assert!(!catalog.is_empty());
        for id in [
            FALLBACK_ELEMENT_ID,
            "0c44ac338d7249b39271d0b25425b7d9",
            "4c1b24c3e3954038b14f4daa3656e0b5",
        ] {
            assert!(catalog.contains(id), "{id}");
        }
    }

    #[test]
    fn test_element_definition_defaults() {
        let entry = Entry::from_value(json!({ "id": "e1", "icons": ["a.png"], "shiny": true }));
        let element = ElementDefinition::from_entry(&entry).unwrap();

        assert_eq!(element.name, "Item");
        assert_eq!(element.kind, ElementType::Simple);
        assert_eq!(element.size, [25, 25]);
        assert_eq!(element.count_config, [0, 5]);
        assert!(!element.receiver);
        assert_eq!(element.extra.get("shiny"), Some(&json!(true)));
    }

    #[test]
    fn test_element_label_shapes() {
        let text: ElementLabel = serde_json::from_value(json!("Boss")).unwrap();
        let cycle: ElementLabel = serde_json::from_value(json!(["a", "b"])).unwrap();
        assert_eq!(text, ElementLabel::Text("Boss".into()));
        assert_eq!(cycle, ElementLabel::Cycle(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_custom_elements_are_valid_targets() {
        let custom = vec![
            Entry::from_value(json!({ "id": "custom1", "name": "Mine", "icons": ["m.png"] })),
            Entry::from_value(json!({ "id": "custom2", "icons": "not a list" })),
        ];
        let catalog = ElementCatalog::new(&custom);

        assert!(catalog.contains("custom1"));
        assert!(catalog.contains("custom2"));
        assert_eq!(catalog.get("custom1").unwrap().name, "Mine");
        assert!(catalog.get("custom2").is_none());
    }

    #[test]
    fn test_reconcile_resets_only_dangling_references() {
        let mut layout = doc(json!({
            "layoutConfig": {},
            "components": [
                { "id": "c1", "type": "element", "elementId": "deleted" },
                { "id": "c2", "type": "element", "elementId": "custom1" },
                { "id": "c3", "type": "label" }
            ],
            "paths": [
                { "id": "p1", "type": "locationhint", "elementId": "gone" }
            ],
            "elements": [{ "id": "custom1", "icons": [] }]
        }));
        let catalog = ElementCatalog::for_layout(&layout);

        let dangling = dangling_element_refs(&layout, &catalog);
        assert_eq!(
            dangling,
            vec![
                DanglingRef {
                    list: "components",
                    entry_id: Some("c1".into()),
                    element_id: "deleted".into(),
                },
                DanglingRef {
                    list: "paths",
                    entry_id: Some("p1".into()),
                    element_id: "gone".into(),
                },
            ]
        );

        assert_eq!(reconcile_element_refs(&mut layout, &catalog), 2);

        assert_eq!(layout.components[0].element_id(), Some(FALLBACK_ELEMENT_ID));
        assert_eq!(layout.components[1].element_id(), Some("custom1"));
        assert!(!layout.components[2].contains_key("elementId"));
        assert_eq!(layout.paths[0].element_id(), Some(FALLBACK_ELEMENT_ID));
        assert!(dangling_element_refs(&layout, &catalog).is_empty());
        assert_eq!(reconcile_element_refs(&mut layout, &catalog), 0);
    }
}
