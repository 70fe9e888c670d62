//! Path canvas: a drop zone rooting one node hierarchy.
//!
//! Dropping an icon onto an empty canvas creates its root. Later icon drops
//! add children, either under the node they land on or, for drops on the
//! bare canvas area, under the root. Dragging an existing node and dropping
//! it elsewhere re-parents it.

use crate::drag::{DataTransfer, DragSource, DropError, DropTarget, PathItem};
use interchange::Entry;
use node::{transform_tree, DisplayPayload, NodeError, NodeId, NodeKey, NodeRegistry, RenderTree};
use serde_json::Value;

const DEFAULT_BACKGROUND: &str = "#000000";
const DEFAULT_ELEMENTS_SIZE: [u32; 2] = [25, 25];

/// Tree change caused by a drop or removal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CanvasEvent {
    NodeAdded(NodeId),
    NodeMoved(NodeId),
    NodeRemoved(NodeId),
}

#[derive(Clone, Debug)]
pub struct PathCanvas {
    id: String,
    background_color: String,
    elements_size: [u32; 2],
    root: Option<NodeKey>,
    receiver: bool,
    events: Vec<CanvasEvent>,
}

impl PathCanvas {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            background_color: DEFAULT_BACKGROUND.to_string(),
            elements_size: DEFAULT_ELEMENTS_SIZE,
            root: None,
            receiver: true,
            events: Vec::new(),
        }
    }

    /// Canvas for a `path` record, taking its id and display fields.
    pub fn from_entry(entry: &Entry) -> Self {
        let mut canvas = Self::new(entry.id().unwrap_or_default());
        if let Some(color) = entry.get("backgroundColor").and_then(Value::as_str) {
            canvas.background_color = color.to_string();
        }
        if let Some(size) = entry
            .get("elementsSize")
            .and_then(|v| serde_json::from_value::<[u32; 2]>(v.clone()).ok())
        {
            canvas.elements_size = size;
        }
        canvas
    }

    /// Takes over display fields from `other`, keeping the tree.
    pub fn set_display(&mut self, other: &PathCanvas) {
        self.background_color = other.background_color.clone();
        self.elements_size = other.elements_size;
    }

    pub fn with_receiver(mut self, receiver: bool) -> Self {
        self.receiver = receiver;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    pub fn elements_size(&self) -> [u32; 2] {
        self.elements_size
    }

    pub fn root(&self) -> Option<NodeKey> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn render(&self, registry: &NodeRegistry) -> Option<RenderTree> {
        transform_tree(registry, self.root)
    }

    /// Whether `node` belongs to this canvas's hierarchy.
    pub fn contains(&self, registry: &NodeRegistry, node: NodeKey) -> bool {
        self.root.is_some() && registry.root_of(node) == self.root
    }

    /// Handles a drop landing on `target`, or on the bare canvas when `None`.
    ///
    /// On error nothing changes: no node is created and no link is touched.
    pub fn drop_item(
        &mut self,
        target: Option<NodeKey>,
        transfer: &DataTransfer,
        registry: &mut NodeRegistry,
    ) -> Result<CanvasEvent, DropError> {
        let item = transfer.path_item()?;

        let parent = match (self.root, target) {
            (None, _) => None,
            (Some(_), Some(target)) if !self.contains(registry, target) => {
                return Err(NodeError::UnknownNode(target).into());
            }
            (Some(_), Some(target)) => Some(target),
            (Some(root), None) => Some(root),
        };
        if let Some(parent) = parent {
            if !registry.contains(parent) {
                return Err(NodeError::UnknownNode(parent).into());
            }
        }

        let event = match item {
            PathItem::Icon(payload) => {
                let node = registry.create_node(DisplayPayload::new(icon_name(&payload.icon), payload.icon));
                self.attach(registry, parent, node)?;
                CanvasEvent::NodeAdded(registry.id_of(node).unwrap_or_default())
            }
            PathItem::Element(raw) => match registry.resolve_str(&raw) {
                Some(node) => {
                    self.attach(registry, parent, node)?;
                    CanvasEvent::NodeMoved(registry.id_of(node).unwrap_or_default())
                }
                None => {
                    log::debug!("unresolved drop payload {:?}, creating a node for it", raw);
                    let node = registry.create_node(DisplayPayload::new(raw.clone(), raw));
                    self.attach(registry, parent, node)?;
                    CanvasEvent::NodeAdded(registry.id_of(node).unwrap_or_default())
                }
            },
        };

        self.events.push(event.clone());
        Ok(event)
    }

    fn attach(
        &mut self,
        registry: &mut NodeRegistry,
        parent: Option<NodeKey>,
        node: NodeKey,
    ) -> Result<(), NodeError> {
        match parent {
            Some(parent) => registry.add_child(parent, node),
            None => {
                if registry.parent(node).is_some() {
                    registry.delete_node(node)?;
                }
                self.root = Some(node);
                Ok(())
            }
        }
    }

    /// Detaches `node` from this canvas. Removing the root empties the canvas.
    pub fn remove_node(
        &mut self,
        node: NodeKey,
        registry: &mut NodeRegistry,
    ) -> Result<CanvasEvent, NodeError> {
        if !self.contains(registry, node) {
            return Err(NodeError::UnknownNode(node));
        }
        let id = registry.id_of(node).ok_or(NodeError::UnknownNode(node))?;

        if self.root == Some(node) {
            self.root = None;
        } else {
            registry.delete_node(node)?;
        }

        let event = CanvasEvent::NodeRemoved(id);
        self.events.push(event.clone());
        Ok(event)
    }

    /// Forgets the root when it is gone, has been nested under another node,
    /// or is `claimed` as the root of another canvas.
    pub fn sync(&mut self, registry: &NodeRegistry, claimed: Option<NodeKey>) {
        if let Some(root) = self.root {
            if !registry.contains(root) || registry.parent(root).is_some() || claimed == Some(root) {
                log::debug!("path {} lost its root", self.id);
                self.root = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.events.clear();
    }

    /// Drains the changes recorded since the last call.
    pub fn take_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Node name for a dropped icon: its file stem.
fn icon_name(icon: &str) -> String {
    std::path::Path::new(icon)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(icon)
        .to_string()
}

impl DropTarget<NodeRegistry> for PathCanvas {
    fn is_receiver(&self) -> bool {
        self.receiver
    }

    fn on_drop(&mut self, transfer: &DataTransfer, registry: &mut NodeRegistry) -> Result<(), DropError> {
        self.drop_item(None, transfer, registry).map(|_| ())
    }
}

/// Drag source for an existing node on a canvas.
pub struct NodeDragSource<'a> {
    pub registry: &'a NodeRegistry,
    pub node: NodeKey,
}

impl DragSource for NodeDragSource<'_> {
    fn on_drag_start(&self, transfer: &mut DataTransfer) {
        if let Some(id) = self.registry.id_of(self.node) {
            transfer.set_element(id.to_string());
        }
    }
}

/// Drop target for one node drawn on a canvas.
pub struct NodeDropTarget<'c> {
    pub canvas: &'c mut PathCanvas,
    pub node: NodeKey,
}

impl DropTarget<NodeRegistry> for NodeDropTarget<'_> {
    fn is_receiver(&self) -> bool {
        self.canvas.receiver
    }

    fn on_drop(&mut self, transfer: &DataTransfer, registry: &mut NodeRegistry) -> Result<(), DropError> {
        self.canvas
            .drop_item(Some(self.node), transfer, registry)
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::{DragGesture, DropResult, PayloadError, ITEM_CHANNEL};
    use serde_json::json;

    fn icon_drop(icon: &str) -> DragGesture {
        let mut transfer = DataTransfer::new();
        transfer.set_icon(icon);
        DragGesture::from_transfer(transfer)
    }

    fn node_drag(registry: &NodeRegistry, node: NodeKey) -> DragGesture {
        DragGesture::start(&NodeDragSource { registry, node })
    }

    #[test]
    fn test_first_drop_creates_root() {
        let mut registry = NodeRegistry::new();
        let mut canvas = PathCanvas::new("p1");
        assert!(canvas.render(&registry).is_none());

        let result = icon_drop("/icons/deku_tree_32x32.png").drop_on(&mut canvas, &mut registry);

        assert_eq!(result, DropResult::Accepted);
        let root = canvas.root().unwrap();
        assert!(registry.get(root).unwrap().is_root());

        let tree = canvas.render(&registry).unwrap();
        assert_eq!(tree.name, "deku_tree_32x32");
        assert_eq!(tree.icon, "/icons/deku_tree_32x32.png");
        assert!(tree.children.is_empty());

        let events = canvas.take_events();
        assert_eq!(events, vec![CanvasEvent::NodeAdded(registry.id_of(root).unwrap())]);
        assert!(canvas.take_events().is_empty());
    }

    #[test]
    fn test_area_drops_append_to_root_and_node_drops_nest() {
        let mut registry = NodeRegistry::new();
        let mut canvas = PathCanvas::new("p1");

        icon_drop("a.png").drop_on(&mut canvas, &mut registry);
        icon_drop("b.png").drop_on(&mut canvas, &mut registry);
        let root = canvas.root().unwrap();
        let b = registry.children(root)[0];

        let result = icon_drop("c.png").drop_on(
            &mut NodeDropTarget {
                canvas: &mut canvas,
                node: b,
            },
            &mut registry,
        );
        assert!(result.is_accepted());

        let tree = canvas.render(&registry).unwrap();
        assert_eq!(tree.name, "a");
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].name, "b");
        assert_eq!(tree.children[0].children[0].name, "c");
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_node_drag_reparents() {
        let mut registry = NodeRegistry::new();
        let mut canvas = PathCanvas::new("p1");

        icon_drop("root.png").drop_on(&mut canvas, &mut registry);
        icon_drop("x.png").drop_on(&mut canvas, &mut registry);
        icon_drop("y.png").drop_on(&mut canvas, &mut registry);
        let root = canvas.root().unwrap();
        let (x, y) = (registry.children(root)[0], registry.children(root)[1]);

        let before = registry.len();
        let result = node_drag(&registry, y).drop_on(
            &mut NodeDropTarget {
                canvas: &mut canvas,
                node: x,
            },
            &mut registry,
        );

        assert!(result.is_accepted());
        assert_eq!(registry.len(), before);
        assert_eq!(registry.children(root), &[x]);
        assert_eq!(registry.children(x), &[y]);
        assert_eq!(registry.parent(y), Some(x));
    }

    #[test]
    fn test_drop_into_own_subtree_is_rejected() {
        let mut registry = NodeRegistry::new();
        let mut canvas = PathCanvas::new("p1");

        icon_drop("root.png").drop_on(&mut canvas, &mut registry);
        icon_drop("x.png").drop_on(&mut canvas, &mut registry);
        let root = canvas.root().unwrap();
        let x = registry.children(root)[0];
        let before = canvas.render(&registry);

        let result = node_drag(&registry, root).drop_on(
            &mut NodeDropTarget {
                canvas: &mut canvas,
                node: x,
            },
            &mut registry,
        );

        assert!(matches!(
            result,
            DropResult::Rejected(DropError::Tree(NodeError::Cycle { .. }))
        ));
        assert_eq!(canvas.render(&registry), before);
    }

    #[test]
    fn test_unresolved_element_creates_node() {
        let mut registry = NodeRegistry::new();
        let mut canvas = PathCanvas::new("p1");
        let mut transfer = DataTransfer::new();
        transfer.set_element("7d6ff858445845e5b95db3254e34b0dc");

        let result = DragGesture::from_transfer(transfer).drop_on(&mut canvas, &mut registry);

        assert!(result.is_accepted());
        let tree = canvas.render(&registry).unwrap();
        assert_eq!(tree.name, "7d6ff858445845e5b95db3254e34b0dc");
        assert_eq!(tree.icon, "7d6ff858445845e5b95db3254e34b0dc");
    }

    #[test]
    fn test_malformed_drop_changes_nothing() {
        let mut registry = NodeRegistry::new();
        let mut canvas = PathCanvas::new("p1");
        let mut transfer = DataTransfer::new();
        transfer.set_data(ITEM_CHANNEL, r#"{"name":"no icon"}"#);

        let result = DragGesture::from_transfer(transfer).drop_on(&mut canvas, &mut registry);

        assert_eq!(
            result,
            DropResult::Rejected(DropError::Payload(PayloadError::MissingIcon))
        );
        assert!(canvas.is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_drop_on_foreign_node_is_rejected() {
        let mut registry = NodeRegistry::new();
        let mut first = PathCanvas::new("p1");
        let mut second = PathCanvas::new("p2");

        icon_drop("a.png").drop_on(&mut first, &mut registry);
        icon_drop("b.png").drop_on(&mut second, &mut registry);
        let foreign = second.root().unwrap();

        let result = icon_drop("c.png").drop_on(
            &mut NodeDropTarget {
                canvas: &mut first,
                node: foreign,
            },
            &mut registry,
        );

        assert_eq!(
            result,
            DropResult::Rejected(DropError::Tree(NodeError::UnknownNode(foreign)))
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_adopted_root_is_forgotten() {
        let mut registry = NodeRegistry::new();
        let mut first = PathCanvas::new("p1");
        let mut second = PathCanvas::new("p2");

        icon_drop("a.png").drop_on(&mut first, &mut registry);
        icon_drop("b.png").drop_on(&mut second, &mut registry);
        let b = second.root().unwrap();

        node_drag(&registry, b).drop_on(&mut first, &mut registry);
        second.sync(&registry, first.root());

        assert!(second.is_empty());
        assert!(first.contains(&registry, b));
        assert_eq!(first.render(&registry).unwrap().node_count(), 2);
    }

    #[test]
    fn test_root_moved_to_empty_canvas_is_released() {
        let mut registry = NodeRegistry::new();
        let mut first = PathCanvas::new("p1");
        let mut second = PathCanvas::new("p2");

        icon_drop("b.png").drop_on(&mut second, &mut registry);
        let b = second.root().unwrap();

        let result = node_drag(&registry, b).drop_on(&mut first, &mut registry);
        assert!(result.is_accepted());
        assert_eq!(first.root(), Some(b));

        // Still a parentless root, so only the claim tells the old canvas
        second.sync(&registry, None);
        assert_eq!(second.root(), Some(b));

        second.sync(&registry, first.root());
        assert!(second.is_empty());

        first.sync(&registry, None);
        assert_eq!(first.root(), Some(b));
    }

    #[test]
    fn test_stale_root_creates_no_orphan() {
        let mut registry = NodeRegistry::new();
        let mut canvas = PathCanvas::new("p1");

        icon_drop("a.png").drop_on(&mut canvas, &mut registry);
        let root = canvas.root().unwrap();
        registry.dispose();

        let result = icon_drop("b.png").drop_on(&mut canvas, &mut registry);

        assert_eq!(
            result,
            DropResult::Rejected(DropError::Tree(NodeError::UnknownNode(root)))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_non_receiver_ignores_drops() {
        let mut registry = NodeRegistry::new();
        let mut canvas = PathCanvas::new("p1").with_receiver(false);

        let result = icon_drop("a.png").drop_on(&mut canvas, &mut registry);

        assert_eq!(result, DropResult::Ignored);
        assert!(canvas.is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_node() {
        let mut registry = NodeRegistry::new();
        let mut canvas = PathCanvas::new("p1");

        icon_drop("a.png").drop_on(&mut canvas, &mut registry);
        icon_drop("b.png").drop_on(&mut canvas, &mut registry);
        let root = canvas.root().unwrap();
        let b = registry.children(root)[0];

        canvas.remove_node(b, &mut registry).unwrap();
        assert!(registry.children(root).is_empty());
        assert!(registry.contains(b));

        assert_eq!(
            canvas.remove_node(b, &mut registry),
            Err(NodeError::UnknownNode(b))
        );

        canvas.remove_node(root, &mut registry).unwrap();
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_from_entry() {
        let entry = Entry::from_value(json!({
            "id": "p9",
            "type": "path",
            "backgroundColor": "#222222",
            "elementsSize": [32, 32]
        }));

        let canvas = PathCanvas::from_entry(&entry);

        assert_eq!(canvas.id(), "p9");
        assert_eq!(canvas.background_color(), "#222222");
        assert_eq!(canvas.elements_size(), [32, 32]);

        let bare = PathCanvas::from_entry(&Entry::new());
        assert_eq!(bare.elements_size(), [25, 25]);
    }
}
