//! Interactive surfaces of a tracker layout.
//!
//! Element widgets and path canvases exchange data through drag gestures.
//! The [`drag`] module defines the transfer contract; [`ElementWidget`] and
//! [`PathCanvas`] implement both ends of it.

pub mod drag;
mod element;
mod path;

pub use drag::{
    DataTransfer, DragGesture, DragSource, DropError, DropResult, DropTarget, IconPayload,
    PathItem, PayloadError, ITEM_CHANNEL,
};
pub use element::{ClickButton, ElementWidget};
pub use path::{CanvasEvent, NodeDragSource, NodeDropTarget, PathCanvas};
