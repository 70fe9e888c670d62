//! The editing session: current document, path canvases and preview.

use crate::{Debouncer, EditorConfig, EditorError};
use canvas::{CanvasEvent, DragGesture, DropResult, ElementWidget, NodeDropTarget, PathCanvas};
use interchange::{
    generate_id, normalize_layout, reconcile_element_refs_to, retype_entry, ComponentKind,
    ElementCatalog, Entry, LayoutDocument,
};
use node::{NodeKey, NodeRegistry, RenderTree};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Which record list an operation works on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum List {
    Components,
    Paths,
}

/// `<type> - <displayName or short id>`, as shown in entry lists.
pub fn entry_label(entry: &Entry) -> String {
    let type_name = match entry.type_name() {
        "" => "undefined",
        name => name,
    };
    let name = match entry.get("displayName").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => entry.id().unwrap_or_default().chars().take(12).collect(),
    };
    format!("{} - {}", type_name, name)
}

pub struct LayoutEditor {
    config: EditorConfig,
    document: LayoutDocument,
    catalog: ElementCatalog,
    registry: NodeRegistry,
    canvases: HashMap<String, PathCanvas>,
    preview: Debouncer<LayoutDocument>,
}

impl LayoutEditor {
    /// Starts a session on a fresh base layout.
    pub fn new(config: EditorConfig) -> Self {
        let document = LayoutDocument::base();
        let mut editor = Self {
            catalog: ElementCatalog::for_layout(&document),
            preview: Debouncer::new(config.preview_delay()),
            config,
            document,
            registry: NodeRegistry::new(),
            canvases: HashMap::new(),
        };
        editor.commit();
        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &LayoutDocument {
        &self.document
    }

    pub fn catalog(&self) -> &ElementCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Replaces the document with the base layout under a fresh `id`.
    pub fn new_layout(&mut self) {
        self.replace_document(LayoutDocument::base());
    }

    /// Parses, normalizes and adopts a layout.
    ///
    /// Returns how many dangling element references were reset. On error
    /// the current document stays loaded.
    pub fn open(&mut self, input: &str) -> Result<usize, EditorError> {
        let raw = LayoutDocument::from_json(input)?;
        let mut document = normalize_layout(raw);
        let catalog = ElementCatalog::for_layout(&document);
        let reset = reconcile_element_refs_to(&mut document, &catalog, &self.config.fallback_element_id);

        log::info!(
            "opened layout {:?} with {} components and {} paths",
            document.id,
            document.components.len(),
            document.paths.len()
        );
        self.replace_document(document);
        Ok(reset)
    }

    pub fn open_file(&mut self, path: impl AsRef<Path>) -> Result<usize, EditorError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            EditorError::Document(interchange::InterchangeError::Io(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        })?;
        self.open(&text)
    }

    fn replace_document(&mut self, document: LayoutDocument) {
        self.document = document;
        self.catalog = ElementCatalog::for_layout(&self.document);
        self.reset_canvases();
        self.commit();
    }

    fn reset_canvases(&mut self) {
        self.registry.dispose();
        self.canvases = self
            .document
            .paths
            .iter()
            .filter_map(|path| Some((path.id()?.to_string(), PathCanvas::from_entry(path))))
            .collect();
    }

    /// The document as held in memory, serialized without changes.
    pub fn save_to_string(&self) -> Result<String, EditorError> {
        Ok(self.document.to_json()?)
    }

    pub fn export_file_name(&self) -> String {
        self.document.export_file_name_or(&self.config.default_file_name)
    }

    /// Writes the document into `dir` under [`LayoutEditor::export_file_name`].
    pub fn save_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf, EditorError> {
        let path = self
            .document
            .save_to_dir_or(dir, &self.config.default_file_name)?;
        log::info!("saved layout to {}", path.display());
        Ok(path)
    }

    pub fn set_layout_field(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.document.layout_config.insert(key.into(), value.into());
        self.commit();
    }

    // -----------------------------------------------------------------------
    // Components and paths
    // -----------------------------------------------------------------------

    fn list(&self, list: List) -> &Vec<Entry> {
        match list {
            List::Components => &self.document.components,
            List::Paths => &self.document.paths,
        }
    }

    fn list_mut(&mut self, list: List) -> &mut Vec<Entry> {
        match list {
            List::Components => &mut self.document.components,
            List::Paths => &mut self.document.paths,
        }
    }

    fn unknown(list: List, id: &str) -> EditorError {
        match list {
            List::Components => EditorError::UnknownComponent(id.to_string()),
            List::Paths => EditorError::UnknownPath(id.to_string()),
        }
    }

    /// Appends an untyped component at the origin and returns its id.
    pub fn add_component(&mut self) -> String {
        let id = generate_id();
        let entry = Entry::from_value(json!({ "id": id, "type": "", "position": [0, 0] }));
        self.upsert(List::Components, entry);
        id
    }

    /// Replaces the component with the same id, or appends it.
    ///
    /// A record without an id gets a fresh one, which is returned.
    pub fn upsert_component(&mut self, entry: Entry) -> String {
        self.upsert(List::Components, entry)
    }

    pub fn delete_component(&mut self, id: &str) -> Result<Entry, EditorError> {
        self.delete(List::Components, id)
    }

    /// Rebuilds a component as a fresh instance of `type_name`.
    pub fn change_component_type(&mut self, id: &str, type_name: &str) -> Result<(), EditorError> {
        self.change_type(List::Components, id, type_name)
    }

    pub fn component(&self, id: &str) -> Option<&Entry> {
        self.document.component(id)
    }

    /// Appends an untyped, unnamed path at the origin and returns its id.
    pub fn add_path(&mut self) -> String {
        let id = generate_id();
        let entry = Entry::from_value(json!({
            "id": id,
            "type": "",
            "displayName": "",
            "position": [0, 0]
        }));
        self.upsert(List::Paths, entry);
        id
    }

    pub fn upsert_path(&mut self, entry: Entry) -> String {
        self.upsert(List::Paths, entry)
    }

    /// Removes a path along with its canvas.
    pub fn delete_path(&mut self, id: &str) -> Result<Entry, EditorError> {
        self.delete(List::Paths, id)
    }

    pub fn change_path_type(&mut self, id: &str, type_name: &str) -> Result<(), EditorError> {
        self.change_type(List::Paths, id, type_name)
    }

    pub fn path(&self, id: &str) -> Option<&Entry> {
        self.document.path(id)
    }

    fn upsert(&mut self, list: List, mut entry: Entry) -> String {
        let id = match entry.id() {
            Some(id) => id.to_string(),
            None => {
                let id = generate_id();
                entry.insert("id", id.clone());
                id
            }
        };

        if list == List::Paths {
            self.sync_canvas(&entry);
        }

        let entries = self.list_mut(list);
        match entries.iter().position(|e| e.id() == Some(id.as_str())) {
            Some(index) => entries[index] = entry,
            None => entries.push(entry),
        }
        self.commit();
        id
    }

    fn delete(&mut self, list: List, id: &str) -> Result<Entry, EditorError> {
        let index = self
            .list(list)
            .iter()
            .position(|e| e.id() == Some(id))
            .ok_or_else(|| Self::unknown(list, id))?;

        let removed = self.list_mut(list).remove(index);
        if list == List::Paths {
            self.canvases.remove(id);
        }
        self.commit();
        Ok(removed)
    }

    fn change_type(&mut self, list: List, id: &str, type_name: &str) -> Result<(), EditorError> {
        let kind = ComponentKind::from_type(type_name);
        let index = self
            .list(list)
            .iter()
            .position(|e| e.id() == Some(id))
            .ok_or_else(|| Self::unknown(list, id))?;

        let retyped = retype_entry(&self.list(list)[index], &kind);
        if list == List::Paths {
            self.sync_canvas(&retyped);
        }
        self.list_mut(list)[index] = retyped;
        self.reconcile();
        self.commit();
        Ok(())
    }

    /// Keeps the canvas for a path record, refreshing its display fields.
    fn sync_canvas(&mut self, path: &Entry) {
        let Some(id) = path.id() else {
            return;
        };
        let fresh = PathCanvas::from_entry(path);
        match self.canvases.get_mut(id) {
            Some(canvas) => canvas.set_display(&fresh),
            None => {
                self.canvases.insert(id.to_string(), fresh);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Custom elements
    // -----------------------------------------------------------------------

    pub fn custom_elements(&self) -> &[Entry] {
        self.document.custom_elements()
    }

    /// Appends a custom element with a fresh id and returns the id.
    pub fn add_element(&mut self, mut element: Entry) -> String {
        let id = generate_id();
        element.insert("id", id.clone());
        self.document.elements.get_or_insert_with(Vec::new).push(element);
        self.elements_changed();
        id
    }

    pub fn upsert_element(&mut self, mut element: Entry) -> String {
        let id = match element.id() {
            Some(id) => id.to_string(),
            None => {
                let id = generate_id();
                element.insert("id", id.clone());
                id
            }
        };

        let elements = self.document.elements.get_or_insert_with(Vec::new);
        match elements.iter().position(|e| e.id() == Some(id.as_str())) {
            Some(index) => elements[index] = element,
            None => elements.push(element),
        }
        self.elements_changed();
        id
    }

    /// Removes a custom element. Records pointing at it fall back to the
    /// default element.
    pub fn delete_element(&mut self, id: &str) -> Result<Entry, EditorError> {
        let elements = self
            .document
            .elements
            .as_mut()
            .ok_or_else(|| EditorError::UnknownElement(id.to_string()))?;
        let index = elements
            .iter()
            .position(|e| e.id() == Some(id))
            .ok_or_else(|| EditorError::UnknownElement(id.to_string()))?;

        let removed = elements.remove(index);
        self.elements_changed();
        Ok(removed)
    }

    fn elements_changed(&mut self) {
        self.catalog = ElementCatalog::for_layout(&self.document);
        self.reconcile();
        self.commit();
    }

    fn reconcile(&mut self) -> usize {
        reconcile_element_refs_to(
            &mut self.document,
            &self.catalog,
            &self.config.fallback_element_id,
        )
    }

    /// Live widget for an `element` component.
    pub fn element_widget(&self, component_id: &str) -> Option<ElementWidget> {
        let entry = self.document.component(component_id)?;
        if entry.kind() != ComponentKind::Element {
            return None;
        }
        ElementWidget::from_component(entry, &self.catalog, &self.config.icon_base_url)
    }

    // -----------------------------------------------------------------------
    // Path canvases
    // -----------------------------------------------------------------------

    pub fn canvas(&self, path_id: &str) -> Option<&PathCanvas> {
        self.canvases.get(path_id)
    }

    pub fn render_path(&self, path_id: &str) -> Option<RenderTree> {
        self.canvases.get(path_id)?.render(&self.registry)
    }

    /// Ends `gesture` on a path canvas: on `target` when given, else on the
    /// bare canvas area.
    pub fn drop_on_path(
        &mut self,
        path_id: &str,
        target: Option<NodeKey>,
        gesture: DragGesture,
    ) -> Result<DropResult, EditorError> {
        let canvas = self
            .canvases
            .get_mut(path_id)
            .ok_or_else(|| EditorError::UnknownPath(path_id.to_string()))?;

        let result = match target {
            Some(node) => gesture.drop_on(&mut NodeDropTarget { canvas, node }, &mut self.registry),
            None => gesture.drop_on(canvas, &mut self.registry),
        };

        if result.is_accepted() {
            // A node dragged from another path may have been its root
            let claimed = self.canvases.get(path_id).and_then(PathCanvas::root);
            for (id, canvas) in self.canvases.iter_mut() {
                let claimed = if id == path_id { None } else { claimed };
                canvas.sync(&self.registry, claimed);
            }
        }
        Ok(result)
    }

    pub fn remove_path_node(
        &mut self,
        path_id: &str,
        node: NodeKey,
    ) -> Result<CanvasEvent, EditorError> {
        let canvas = self
            .canvases
            .get_mut(path_id)
            .ok_or_else(|| EditorError::UnknownPath(path_id.to_string()))?;
        canvas
            .remove_node(node, &mut self.registry)
            .map_err(EditorError::Tree)
    }

    /// Ends the session's node trees: every canvas and node is dropped.
    pub fn dispose(&mut self) {
        self.canvases.clear();
        self.registry.dispose();
        self.preview.cancel();
    }

    // -----------------------------------------------------------------------
    // Preview
    // -----------------------------------------------------------------------

    fn commit(&mut self) {
        self.preview.commit(self.document.clone(), Instant::now());
    }

    /// The latest committed document, once changes have settled.
    pub fn poll_preview(&mut self, now: Instant) -> Option<LayoutDocument> {
        self.preview.poll(now)
    }

    pub async fn settle_preview(&mut self) -> Option<LayoutDocument> {
        self.preview.settle().await
    }

    pub fn preview_pending(&self) -> bool {
        self.preview.is_pending()
    }
}

impl Default for LayoutEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
