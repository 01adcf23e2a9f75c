use serde::{Deserialize, Serialize};

use crate::column::ColumnId;
use crate::task::{TaskId, TaskStatus};

/// A column and a 0-based index into its position-sorted sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub status: TaskStatus,
    pub position: usize,
}

impl Slot {
    pub fn new(status: TaskStatus, position: usize) -> Self {
        Self { status, position }
    }
}

/// What the pointer is currently over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DropTarget {
    Task {
        id: TaskId,
    },
    /// Column body. `index` is the insertion index reported by the drag
    /// surface; `-1` means it could not tell (typically an empty column).
    Column {
        id: ColumnId,
        #[serde(default = "unknown_index")]
        index: i64,
    },
}

fn unknown_index() -> i64 {
    -1
}

impl DropTarget {
    pub fn task(id: impl Into<TaskId>) -> Self {
        Self::Task { id: id.into() }
    }

    pub fn column(id: impl Into<ColumnId>, index: i64) -> Self {
        Self::Column {
            id: id.into(),
            index,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Task { id } | Self::Column { id, .. } => id,
        }
    }
}

/// Live state of one drag gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragIntent {
    pub active_task_id: TaskId,
    /// Captured at drag-start and never re-read.
    pub source: Slot,
    /// Best current insertion estimate, `None` until a target is seen.
    pub target: Option<Slot>,
}

impl DragIntent {
    pub fn new(active_task_id: impl Into<TaskId>, source: Slot) -> Self {
        Self {
            active_task_id: active_task_id.into(),
            source,
            target: None,
        }
    }
}

/// The single request a completed gesture produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCommand {
    pub task_id: TaskId,
    pub start_status: TaskStatus,
    pub start_position: usize,
    pub over_status: TaskStatus,
    pub over_position: usize,
}

impl MoveCommand {
    pub fn from_intent(intent: &DragIntent, target: Slot) -> Self {
        Self {
            task_id: intent.active_task_id.clone(),
            start_status: intent.source.status,
            start_position: intent.source.position,
            over_status: target.status,
            over_position: target.position,
        }
    }

    pub fn start(&self) -> Slot {
        Slot::new(self.start_status, self.start_position)
    }

    pub fn over(&self) -> Slot {
        Slot::new(self.over_status, self.over_position)
    }

    pub fn changes_column(&self) -> bool {
        self.start_status != self.over_status
    }
}
