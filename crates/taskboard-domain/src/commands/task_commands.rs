use super::{Command, CommandContext};
use crate::position::apply_move;
use crate::{MoveCommand, Task, TaskId, TaskPatch};
use taskboard_core::{TaskboardError, TaskboardResult};

/// Reorder locally with dense re-ranking of the affected columns.
pub struct MoveTask {
    pub command: MoveCommand,
}

impl Command for MoveTask {
    fn execute(&self, context: &mut CommandContext) -> TaskboardResult<()> {
        apply_move(context.tasks, &self.command)
    }

    fn description(&self) -> String {
        format!(
            "Move task {} to {}[{}]",
            self.command.task_id, self.command.over_status, self.command.over_position
        )
    }
}

/// Overwrite local copies with tasks returned by the store. Tasks the
/// client does not hold are skipped; they arrive with the next fetch.
pub struct ApplyServerTasks {
    pub tasks: Vec<Task>,
}

impl Command for ApplyServerTasks {
    fn execute(&self, context: &mut CommandContext) -> TaskboardResult<()> {
        let mut skipped = 0usize;
        for incoming in &self.tasks {
            match context.tasks.iter_mut().find(|t| t.id == incoming.id) {
                Some(existing) => *existing = incoming.clone(),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::debug!("Skipped {} task(s) not held locally", skipped);
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Apply {} task(s) from the store", self.tasks.len())
    }
}

pub struct UpdateTask {
    pub task_id: TaskId,
    pub patch: TaskPatch,
}

impl Command for UpdateTask {
    fn execute(&self, context: &mut CommandContext) -> TaskboardResult<()> {
        let task = context
            .tasks
            .iter_mut()
            .find(|t| t.id == self.task_id)
            .ok_or_else(|| TaskboardError::NotFound(format!("task {}", self.task_id)))?;
        self.patch.clone().apply_to(task);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Update task {}", self.task_id)
    }
}

/// Claim a task for a user, or hand it back with `None`.
pub struct AssignTask {
    pub task_id: TaskId,
    pub assignee: Option<String>,
}

impl Command for AssignTask {
    fn execute(&self, context: &mut CommandContext) -> TaskboardResult<()> {
        let task = context
            .tasks
            .iter_mut()
            .find(|t| t.id == self.task_id)
            .ok_or_else(|| TaskboardError::NotFound(format!("task {}", self.task_id)))?;
        task.assign(self.assignee.clone());
        Ok(())
    }

    fn description(&self) -> String {
        match &self.assignee {
            Some(user_id) => format!("Assign task {} to {}", self.task_id, user_id),
            None => format!("Unassign task {}", self.task_id),
        }
    }
}
