//! Turns drag events into a drag intent and, at release, a move command.
//!
//! All slot math runs against a [`BoardProjection`] of the full task list, so
//! the slot of a task is its index in the position-sorted column.

use taskboard_core::{TaskboardError, TaskboardResult};

use crate::drag::{DragIntent, DropTarget, MoveCommand, Slot};
use crate::projection::BoardProjection;

#[derive(Debug, Default)]
pub struct MovePlanner {
    intent: Option<DragIntent>,
}

impl MovePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intent(&self) -> Option<&DragIntent> {
        self.intent.as_ref()
    }

    /// Capture the dragged task's current slot. Starting a new gesture
    /// discards any previous intent.
    pub fn begin(
        &mut self,
        task_id: &str,
        board: &BoardProjection,
    ) -> TaskboardResult<&DragIntent> {
        let source = board.locate(task_id).ok_or_else(|| {
            TaskboardError::NotFound(format!("task {} is not on the board", task_id))
        })?;
        tracing::debug!(
            "Drag intent for {} from {}[{}]",
            task_id,
            source.status,
            source.position
        );
        let intent = self.intent.insert(DragIntent::new(task_id, source));
        Ok(&*intent)
    }

    /// Update the insertion estimate. Returns the intent only when the
    /// target slot actually changed.
    pub fn drag_over(
        &mut self,
        target: &DropTarget,
        board: &BoardProjection,
    ) -> Option<&DragIntent> {
        let intent = self.intent.as_ref()?;
        let slot = resolve(intent, target, board)?;
        if intent.target == Some(slot) {
            return None;
        }
        let intent = self.intent.as_mut()?;
        intent.target = Some(slot);
        Some(&*intent)
    }

    /// Finish the gesture. The intent is consumed whatever the outcome.
    ///
    /// `target` is the last drop target the tracker saw. Dropping onto the
    /// dragged task itself, never seeing a target, or landing on the slot the
    /// task started in all yield `InvalidGesture`.
    pub fn drag_end(
        &mut self,
        target: Option<&DropTarget>,
        board: &BoardProjection,
    ) -> TaskboardResult<MoveCommand> {
        let mut intent = self
            .intent
            .take()
            .ok_or_else(|| TaskboardError::InvalidGesture("no drag in progress".to_string()))?;

        if let Some(target) = target {
            if matches!(target, DropTarget::Task { id } if *id == intent.active_task_id) {
                return Err(TaskboardError::InvalidGesture(format!(
                    "task {} dropped onto itself",
                    intent.active_task_id
                )));
            }
            if let Some(slot) = resolve(&intent, target, board) {
                intent.target = Some(slot);
            }
        }

        let target = intent.target.ok_or_else(|| {
            TaskboardError::InvalidGesture(format!(
                "task {} released outside any drop target",
                intent.active_task_id
            ))
        })?;
        if target == intent.source {
            return Err(TaskboardError::InvalidGesture(format!(
                "task {} dropped where it started",
                intent.active_task_id
            )));
        }

        Ok(MoveCommand::from_intent(&intent, target))
    }

    pub fn cancel(&mut self) -> Option<DragIntent> {
        self.intent.take()
    }
}

/// Map a drop target to a slot that exists on `board`, or `None` when the
/// event should be ignored.
fn resolve(intent: &DragIntent, target: &DropTarget, board: &BoardProjection) -> Option<Slot> {
    match target {
        DropTarget::Task { id } => {
            if *id == intent.active_task_id {
                return None;
            }
            board.locate(id)
        }
        DropTarget::Column { id, index } => {
            let lane = board.lane(id)?;
            // Within its own column the dragged task already occupies a slot.
            let last_slot = if lane.column.status == intent.source.status {
                lane.len().saturating_sub(1)
            } else {
                lane.len()
            };
            let position = usize::try_from(*index).unwrap_or(0).min(last_slot);
            Some(Slot::new(lane.column.status, position))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::projection::project;
    use crate::task::{Task, TaskStatus};

    fn board(tasks: &[Task]) -> BoardProjection {
        project(tasks, &Column::defaults())
    }

    fn two_todo() -> Vec<Task> {
        vec![
            Task::new("A", "A", TaskStatus::ToDo, 0),
            Task::new("B", "B", TaskStatus::ToDo, 1),
        ]
    }

    #[test]
    fn test_drop_on_task_uses_its_slot() {
        let board = board(&two_todo());
        let mut planner = MovePlanner::new();
        planner.begin("A", &board).unwrap();
        planner.drag_over(&DropTarget::task("B"), &board);

        let command = planner
            .drag_end(Some(&DropTarget::task("B")), &board)
            .unwrap();
        assert_eq!(
            command,
            MoveCommand {
                task_id: "A".to_string(),
                start_status: TaskStatus::ToDo,
                start_position: 0,
                over_status: TaskStatus::ToDo,
                over_position: 1,
            }
        );
        assert!(planner.intent().is_none());
    }

    #[test]
    fn test_drop_on_empty_column_clamps_to_zero() {
        let board = board(&two_todo());
        let mut planner = MovePlanner::new();
        planner.begin("A", &board).unwrap();

        let target = DropTarget::column("col-3", -1);
        planner.drag_over(&target, &board);
        let command = planner.drag_end(Some(&target), &board).unwrap();
        assert_eq!(
            command,
            MoveCommand {
                task_id: "A".to_string(),
                start_status: TaskStatus::ToDo,
                start_position: 0,
                over_status: TaskStatus::Done,
                over_position: 0,
            }
        );
    }

    #[test]
    fn test_column_index_clamped_to_existing_slots() {
        let mut tasks = two_todo();
        tasks.push(Task::new("X", "X", TaskStatus::Done, 0));
        let board = board(&tasks);
        let mut planner = MovePlanner::new();
        planner.begin("A", &board).unwrap();

        let intent = planner
            .drag_over(&DropTarget::column("col-3", 40), &board)
            .unwrap();
        assert_eq!(intent.target, Some(Slot::new(TaskStatus::Done, 1)));

        let intent = planner
            .drag_over(&DropTarget::column("col-1", 40), &board)
            .unwrap();
        assert_eq!(intent.target, Some(Slot::new(TaskStatus::ToDo, 1)));
    }

    #[test]
    fn test_drop_on_self_never_commands() {
        let board = board(&two_todo());
        let mut planner = MovePlanner::new();
        planner.begin("A", &board).unwrap();

        assert!(planner.drag_over(&DropTarget::task("A"), &board).is_none());
        assert!(planner.intent().unwrap().target.is_none());

        planner.drag_over(&DropTarget::task("B"), &board);
        let result = planner.drag_end(Some(&DropTarget::task("A")), &board);
        assert!(matches!(result, Err(TaskboardError::InvalidGesture(_))));
    }

    #[test]
    fn test_release_without_target_is_invalid() {
        let board = board(&two_todo());
        let mut planner = MovePlanner::new();
        planner.begin("A", &board).unwrap();
        let result = planner.drag_end(None, &board);
        assert!(matches!(result, Err(TaskboardError::InvalidGesture(_))));
    }

    #[test]
    fn test_unchanged_slot_is_invalid() {
        let board = board(&two_todo());
        let mut planner = MovePlanner::new();
        planner.begin("B", &board).unwrap();
        let target = DropTarget::column("col-1", 5);
        let result = planner.drag_end(Some(&target), &board);
        assert!(matches!(result, Err(TaskboardError::InvalidGesture(_))));
    }

    #[test]
    fn test_repeated_over_is_deduplicated() {
        let mut tasks = two_todo();
        tasks.push(Task::new("X", "X", TaskStatus::Done, 0));
        let board = board(&tasks);
        let mut planner = MovePlanner::new();
        planner.begin("A", &board).unwrap();

        assert!(planner.drag_over(&DropTarget::task("X"), &board).is_some());
        // Same slot reached through a different target.
        assert!(planner
            .drag_over(&DropTarget::column("col-3", 0), &board)
            .is_none());
        assert!(planner.drag_over(&DropTarget::task("B"), &board).is_some());
    }

    #[test]
    fn test_unknown_targets_are_ignored() {
        let board = board(&two_todo());
        let mut planner = MovePlanner::new();
        planner.begin("A", &board).unwrap();
        assert!(planner
            .drag_over(&DropTarget::task("nope"), &board)
            .is_none());
        assert!(planner
            .drag_over(&DropTarget::column("col-99", 0), &board)
            .is_none());
        assert!(planner.intent().unwrap().target.is_none());
    }

    #[test]
    fn test_source_is_not_reread_at_end() {
        let tasks = two_todo();
        let before = board(&tasks);
        let mut planner = MovePlanner::new();
        planner.begin("A", &before).unwrap();

        // Board refreshed mid-drag: A now sits below B.
        let reordered = vec![
            Task::new("A", "A", TaskStatus::ToDo, 5),
            Task::new("B", "B", TaskStatus::ToDo, 1),
        ];
        let after = board(&reordered);
        let command = planner
            .drag_end(Some(&DropTarget::column("col-2", 0)), &after)
            .unwrap();
        assert_eq!(command.start_position, 0);
        assert_eq!(command.over_status, TaskStatus::InProgress);
    }

    #[test]
    fn test_begin_on_orphan_fails() {
        let tasks = vec![Task::new("ghost", "G", TaskStatus::Unknown, 0)];
        let board = board(&tasks);
        let mut planner = MovePlanner::new();
        assert!(matches!(
            planner.begin("ghost", &board),
            Err(TaskboardError::NotFound(_))
        ));
    }
}
