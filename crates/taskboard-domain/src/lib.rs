pub mod column;
pub mod commands;
pub mod drag;
pub mod patch;
pub mod planner;
pub mod position;
pub mod projection;
pub mod scope;
pub mod session;
pub mod snapshot;
pub mod task;

pub use column::{Column, ColumnId};
pub use drag::{
    DragEvent, DragIntent, DragSource, DragTracker, DropTarget, MoveCommand, Point, Slot,
    TrackerState,
};
pub use patch::{FieldUpdate, TaskPatch};
pub use planner::MovePlanner;
pub use projection::{project, BoardProjection, Lane};
pub use scope::{BoardScope, TaskFilter};
pub use session::{Role, Session};
pub use snapshot::BoardSnapshot;
pub use task::{Task, TaskId, TaskStatus};
