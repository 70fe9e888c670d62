//! Interactive element widget: an icon that cycles, counts or labels.

use crate::drag::{DataTransfer, DragSource, DropError, DropTarget};
use interchange::{
    ElementCatalog, ElementDefinition, ElementLabel, ElementType, Entry, FALLBACK_ELEMENT_ID,
};
use serde_json::Value;

/// Icons of the receiver attached to `nested` elements.
const NESTED_ICONS: [&str; 2] = ["unknown_16x16.png", "check_16x16.png"];
const NESTED_SIZE: [u32; 2] = [16, 16];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickButton {
    /// Left click: advance.
    Primary,
    /// Context click: step back.
    Secondary,
}

/// Live state of one element component.
#[derive(Clone, Debug)]
pub struct ElementWidget {
    id: String,
    name: String,
    kind: ElementType,
    icons: Vec<String>,
    size: [u32; 2],
    count_config: [i64; 2],
    label: Option<ElementLabel>,
    label_index: usize,
    receiver: bool,
    drag_current: bool,
    items: Vec<String>,
    icon_base: String,

    selected: usize,
    counter: i64,
    dragged_icon: Option<String>,
    nested: Option<Box<ElementWidget>>,
}

impl ElementWidget {
    pub fn from_definition(def: &ElementDefinition, icon_base: &str) -> Self {
        let nested = (def.kind == ElementType::Nested).then(|| {
            Box::new(Self::nested_receiver(&def.name, icon_base))
        });

        let mut widget = Self {
            id: def.id.clone(),
            name: def.name.clone(),
            kind: def.kind,
            icons: def.icons.clone(),
            size: def.size,
            count_config: def.count_config,
            label: def.label.clone(),
            label_index: def.label_starting_index,
            receiver: def.receiver,
            drag_current: def.drag_current,
            items: def.items.clone(),
            icon_base: icon_base.trim_end_matches('/').to_string(),
            selected: def.selected_starting_index,
            counter: 0,
            dragged_icon: None,
            nested,
        };
        widget.clamp_state();
        widget
    }

    /// Builds the widget for an `element` component.
    ///
    /// The component's `elementId` selects the definition; a reference the
    /// catalog cannot resolve falls back to the default element. Per-placement
    /// fields on the component override the definition.
    pub fn from_component(entry: &Entry, catalog: &ElementCatalog, icon_base: &str) -> Option<Self> {
        let element_id = entry.element_id().unwrap_or(FALLBACK_ELEMENT_ID);
        let def = catalog.get(element_id).or_else(|| {
            log::warn!("element {} not in catalog, using fallback", element_id);
            catalog.get(FALLBACK_ELEMENT_ID)
        })?;

        let mut widget = Self::from_definition(def, icon_base);
        if let Some(receiver) = entry.get("receiver").and_then(Value::as_bool) {
            widget.receiver = receiver;
        }
        if let Some(drag_current) = entry.get("dragCurrent").and_then(Value::as_bool) {
            widget.drag_current = drag_current;
        }
        if let Some(index) = entry.get("selectedStartingIndex").and_then(Value::as_u64) {
            widget.selected = index as usize;
        }
        if let Some(index) = entry.get("labelStartingIndex").and_then(Value::as_u64) {
            widget.label_index = index as usize;
        }
        if let Some(bounds) = entry.get("countConfig").and_then(pair::<i64>) {
            widget.count_config = bounds;
        }
        if let Some(size) = entry.get("size").and_then(pair::<u32>) {
            widget.size = size;
        }
        widget.clamp_state();
        Some(widget)
    }

    fn nested_receiver(parent_name: &str, icon_base: &str) -> Self {
        let def = ElementDefinition {
            id: String::new(),
            name: format!("{}_nested", parent_name),
            kind: ElementType::Simple,
            icons: NESTED_ICONS.iter().map(|s| s.to_string()).collect(),
            size: NESTED_SIZE,
            count_config: [0, 5],
            label: None,
            label_starting_index: 0,
            selected_starting_index: 0,
            receiver: true,
            drag_current: false,
            items: Vec::new(),
            extra: Default::default(),
        };
        Self::from_definition(&def, icon_base)
    }

    fn clamp_state(&mut self) {
        self.selected = self.selected.min(self.icons.len().saturating_sub(1));
        self.label_index = self.label_index.min(self.label_len().saturating_sub(1));
        let [min, max] = self.count_config;
        self.counter = self.counter.clamp(min, max.max(min));
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ElementType {
        self.kind
    }

    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn counter(&self) -> i64 {
        self.counter
    }

    pub fn is_counter(&self) -> bool {
        self.kind == ElementType::Counter
    }

    pub fn dragged_icon(&self) -> Option<&str> {
        self.dragged_icon.as_deref()
    }

    pub fn nested(&self) -> Option<&ElementWidget> {
        self.nested.as_deref()
    }

    pub fn nested_mut(&mut self) -> Option<&mut ElementWidget> {
        self.nested.as_deref_mut()
    }

    fn icon_url(&self, file: &str) -> String {
        format!("{}/icons/{}", self.icon_base, file)
    }

    /// The icon to display: a dropped override, else the selected icon.
    pub fn icon(&self) -> Option<String> {
        if let Some(dragged) = &self.dragged_icon {
            return Some(dragged.clone());
        }
        self.icons.get(self.selected).map(|file| self.icon_url(file))
    }

    /// The item name the current selection stands for, if any.
    pub fn marked_item(&self) -> Option<&str> {
        self.items.get(self.selected).map(String::as_str)
    }

    /// Advances or steps back the selection, or the counter for counters.
    ///
    /// Both stop at their bounds. Any click on a non-counter drops the
    /// dragged-icon override.
    pub fn click(&mut self, button: ClickButton) {
        if self.is_counter() {
            self.step_counter(button);
            return;
        }

        let last = self.icons.len().saturating_sub(1);
        self.selected = match button {
            ClickButton::Primary => (self.selected + 1).min(last),
            ClickButton::Secondary => self.selected.saturating_sub(1),
        };
        self.dragged_icon = None;
    }

    /// Scrolling adjusts counters only. Positive `delta_y` counts up.
    pub fn wheel(&mut self, delta_y: f64) {
        if !self.is_counter() {
            return;
        }
        if delta_y > 0.0 {
            self.step_counter(ClickButton::Primary);
        } else if delta_y < 0.0 {
            self.step_counter(ClickButton::Secondary);
        }
    }

    fn step_counter(&mut self, button: ClickButton) {
        let [min, max] = self.count_config;
        self.counter = match button {
            ClickButton::Primary if self.counter < max => self.counter + 1,
            ClickButton::Secondary if self.counter > min => self.counter - 1,
            _ => self.counter,
        };
    }

    fn label_len(&self) -> usize {
        match &self.label {
            Some(ElementLabel::Cycle(labels)) => labels.len(),
            _ => 0,
        }
    }

    /// Caption shown under `label` elements.
    pub fn label_text(&self) -> Option<&str> {
        if self.kind != ElementType::Label {
            return None;
        }
        match self.label.as_ref()? {
            ElementLabel::Text(text) if text.is_empty() => None,
            ElementLabel::Text(text) => Some(text),
            ElementLabel::Cycle(labels) => labels.get(self.label_index).map(String::as_str),
        }
    }

    pub fn click_label(&mut self, button: ClickButton) {
        let last = self.label_len().saturating_sub(1);
        self.label_index = match button {
            ClickButton::Primary => (self.label_index + 1).min(last),
            ClickButton::Secondary => self.label_index.saturating_sub(1),
        };
    }

    pub fn wheel_label(&mut self, delta_y: f64) {
        if delta_y > 0.0 {
            self.click_label(ClickButton::Primary);
        } else if delta_y < 0.0 {
            self.click_label(ClickButton::Secondary);
        }
    }

    /// Icon carried when a drag starts here.
    pub fn drag_icon(&self) -> Option<String> {
        let file = if self.drag_current {
            self.icons.get(self.selected)
        } else {
            self.icons.get(1).or_else(|| self.icons.first())
        }?;
        Some(self.icon_url(file))
    }
}

fn pair<T>(value: &Value) -> Option<[T; 2]>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(value.clone()).ok()
}

impl DragSource for ElementWidget {
    fn on_drag_start(&self, transfer: &mut DataTransfer) {
        if let Some(icon) = self.drag_icon() {
            transfer.set_icon(icon);
        }
    }
}

impl DropTarget for ElementWidget {
    fn is_receiver(&self) -> bool {
        self.receiver
    }

    fn on_drop(&mut self, transfer: &DataTransfer, _cx: &mut ()) -> Result<(), DropError> {
        let payload = transfer.icon()?;
        self.dragged_icon = Some(payload.icon);
        Ok(())
    }
}
