//! Toolkit-independent client for the todo service: the drag-to-reorder
//! interpreter, an HTTP client and the widget controller that ties them to a
//! periodic sync loop.

pub mod error;
pub mod gesture;
pub mod reorder;
pub mod transport;
pub mod widget;

pub use error::ClientError;
pub use gesture::{DragGesture, GestureOutcome, InsertionMarker, DRAG_THRESHOLD_PX};
pub use reorder::{DropIntent, DropZone, Frame};
pub use transport::{HttpTodoClient, TodoApi};
pub use widget::{TodoWidget, WidgetEvent, WidgetState};
