//! Drag-and-drop transfer protocol.
//!
//! A gesture carries its data on a single named channel, [`ITEM_CHANNEL`].
//! Two payload shapes travel on it:
//!
//! - `{"icon": "<reference>"}`: an icon dragged off an element widget.
//! - a raw string: the identifier of a node dragged inside a path canvas.
//!
//! ## Invariants
//!
//! 1. A [`DragGesture`] is created by exactly one drag start and consumed by
//!    at most one drop. [`DragGesture::drop_on`] takes the gesture by value,
//!    so the same payload can never be processed twice.
//! 2. A drop on a target that is not a receiver does nothing.
//! 3. A malformed payload rejects the drop and leaves the target unchanged.
//!
//! ## Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | Channel missing | Source wrote nothing (no icons) | Drop rejected |
//! | Payload not an icon record | Node id dropped on an element widget | Drop rejected |
//! | Record lacks `icon` | Foreign or stale producer | Drop rejected |
//! | Tree refuses the mutation | Node dropped into its own subtree | Drop rejected |

use node::NodeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Name of the channel every payload travels on.
pub const ITEM_CHANNEL: &str = "item";

// ---------------------------------------------------------------------------
// DataTransfer
// ---------------------------------------------------------------------------

/// Data carried by one gesture, keyed by channel name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataTransfer {
    data: HashMap<String, String>,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_data(&mut self, channel: impl Into<String>, value: impl Into<String>) {
        self.data.insert(channel.into(), value.into());
    }

    pub fn get_data(&self, channel: &str) -> Option<&str> {
        self.data.get(channel).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Writes an icon payload on the item channel.
    pub fn set_icon(&mut self, icon: impl Into<String>) {
        let payload = IconPayload { icon: icon.into() };
        // A struct with one String field always serializes
        let encoded = serde_json::to_string(&payload).unwrap_or_default();
        self.set_data(ITEM_CHANNEL, encoded);
    }

    /// Writes a raw element identifier on the item channel.
    pub fn set_element(&mut self, id: impl Into<String>) {
        self.set_data(ITEM_CHANNEL, id);
    }

    /// Reads the item channel as an icon payload.
    pub fn icon(&self) -> Result<IconPayload, PayloadError> {
        match decode_item(self.item()?)? {
            PathItem::Icon(payload) => Ok(payload),
            PathItem::Element(raw) => Err(PayloadError::Malformed(raw)),
        }
    }

    /// Reads the item channel as either payload shape.
    pub fn path_item(&self) -> Result<PathItem, PayloadError> {
        decode_item(self.item()?)
    }

    fn item(&self) -> Result<&str, PayloadError> {
        self.get_data(ITEM_CHANNEL)
            .ok_or_else(|| PayloadError::MissingChannel(ITEM_CHANNEL.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// An icon dragged off an element widget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconPayload {
    pub icon: String,
}

/// What a path canvas can receive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathItem {
    Icon(IconPayload),
    /// Raw identifier of a source element, usually a node id.
    Element(String),
}

fn decode_item(raw: &str) -> Result<PathItem, PayloadError> {
    if raw.trim().is_empty() {
        return Err(PayloadError::Empty);
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(record)) => match record.get("icon") {
            Some(Value::String(icon)) => Ok(PathItem::Icon(IconPayload { icon: icon.clone() })),
            _ => Err(PayloadError::MissingIcon),
        },
        Ok(Value::String(id)) => Ok(PathItem::Element(id)),
        _ => Ok(PathItem::Element(raw.to_string())),
    }
}

/// Why a payload could not be read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PayloadError {
    MissingChannel(String),
    Empty,
    /// Not the shape this target expects.
    Malformed(String),
    /// A record without a string `icon` field.
    MissingIcon,
}

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingChannel(channel) => write!(f, "No data on channel '{}'", channel),
            Self::Empty => write!(f, "Empty payload"),
            Self::Malformed(raw) => write!(f, "Unexpected payload: {}", raw),
            Self::MissingIcon => write!(f, "Payload has no 'icon' field"),
        }
    }
}

impl std::error::Error for PayloadError {}

// ---------------------------------------------------------------------------
// Drop outcome
// ---------------------------------------------------------------------------

/// Why a receiver refused a drop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropError {
    Payload(PayloadError),
    Tree(NodeError),
}

impl std::fmt::Display for DropError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Payload(e) => write!(f, "Rejected payload: {}", e),
            Self::Tree(e) => write!(f, "Rejected tree change: {}", e),
        }
    }
}

impl std::error::Error for DropError {}

impl From<PayloadError> for DropError {
    fn from(e: PayloadError) -> Self {
        Self::Payload(e)
    }
}

impl From<NodeError> for DropError {
    fn from(e: NodeError) -> Self {
        Self::Tree(e)
    }
}

/// Outcome of a drop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropResult {
    /// The target took the payload and changed.
    Accepted,
    /// The target is not a receiver.
    Ignored,
    /// The target is a receiver but could not use the payload. Nothing changed.
    Rejected(DropError),
}

impl DropResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl From<Result<(), DropError>> for DropResult {
    fn from(result: Result<(), DropError>) -> Self {
        match result {
            Ok(()) => Self::Accepted,
            Err(e) => Self::Rejected(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Something a drag can start from.
pub trait DragSource {
    /// Snapshot the payload for a starting gesture.
    fn on_drag_start(&self, transfer: &mut DataTransfer);
}

/// Something a drag can end on.
///
/// `Cx` is whatever state the target mutates besides itself, such as the
/// node registry for path canvases.
pub trait DropTarget<Cx = ()> {
    fn is_receiver(&self) -> bool;

    /// Handle a drop. Only called on receivers.
    fn on_drop(&mut self, transfer: &DataTransfer, cx: &mut Cx) -> Result<(), DropError>;
}

/// One drag gesture, from drag start to drop.
#[derive(Debug)]
pub struct DragGesture {
    transfer: DataTransfer,
}

impl DragGesture {
    /// Starts a gesture, taking the payload snapshot from `source`.
    pub fn start(source: &dyn DragSource) -> Self {
        let mut transfer = DataTransfer::new();
        source.on_drag_start(&mut transfer);
        Self { transfer }
    }

    /// Wraps data produced elsewhere, e.g. by a host toolkit.
    pub fn from_transfer(transfer: DataTransfer) -> Self {
        Self { transfer }
    }

    pub fn transfer(&self) -> &DataTransfer {
        &self.transfer
    }

    /// Ends the gesture on `target`, consuming the payload.
    pub fn drop_on<Cx, T>(self, target: &mut T, cx: &mut Cx) -> DropResult
    where
        T: DropTarget<Cx> + ?Sized,
    {
        if !target.is_receiver() {
            return DropResult::Ignored;
        }

        let result = DropResult::from(target.on_drop(&self.transfer, cx));
        if let DropResult::Rejected(e) = &result {
            log::debug!("drop rejected: {}", e);
        }
        result
    }

    /// Ends the gesture without a drop.
    pub fn cancel(self) {}
}
