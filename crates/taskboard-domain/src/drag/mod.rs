//! Pointer gesture handling.
//!
//! [`DragTracker`] turns raw pointer input into discrete drag events;
//! [`intent`] holds the values a gesture carries from start to commit.

pub mod intent;
pub mod tracker;

pub use intent::{DragIntent, DropTarget, MoveCommand, Slot};
pub use tracker::{DragEvent, DragSource, DragTracker, Point, TrackerState};
