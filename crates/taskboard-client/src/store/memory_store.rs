use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use taskboard_core::{TaskboardError, TaskboardResult};
use taskboard_domain::commands::{AssignTask, Command, CommandContext, UpdateTask};
use taskboard_domain::position::{apply_move, column_sequence, resolve_visible_slot};
use taskboard_domain::{MoveCommand, Session, Task, TaskPatch};

use crate::traits::TaskStore;

/// Failure to return from the next `move_task` call instead of moving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreFailure {
    Transport,
    Unauthorized,
    Conflict,
}

impl StoreFailure {
    fn into_error(self, task_id: &str) -> TaskboardError {
        match self {
            StoreFailure::Transport => {
                TaskboardError::Transport(format!("connection lost while moving {}", task_id))
            }
            StoreFailure::Unauthorized => {
                TaskboardError::Unauthorized(format!("not allowed to move {}", task_id))
            }
            StoreFailure::Conflict => {
                TaskboardError::Conflict(format!("task {} was modified concurrently", task_id))
            }
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    tasks: Vec<Task>,
    failures: VecDeque<StoreFailure>,
    moves: Vec<MoveCommand>,
}

/// In-process task service with last-write-wins semantics.
///
/// When created with an acting session it enforces the same move and edit
/// rules a real backend would; without one every request is trusted.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    state: Mutex<StoreState>,
    acting_as: Option<Session>,
}

impl MemoryTaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            state: Mutex::new(StoreState {
                tasks,
                ..StoreState::default()
            }),
            acting_as: None,
        }
    }

    pub fn acting_as(mut self, session: Session) -> Self {
        self.acting_as = Some(session);
        self
    }

    pub async fn tasks(&self) -> Vec<Task> {
        self.state.lock().await.tasks.clone()
    }

    /// Every move the store received, in arrival order, including rejected ones.
    pub async fn moves(&self) -> Vec<MoveCommand> {
        self.state.lock().await.moves.clone()
    }

    pub async fn fail_next_move(&self, failure: StoreFailure) {
        self.state.lock().await.failures.push_back(failure);
    }

    /// Replace a task out-of-band, as another client would.
    pub async fn put_task(&self, task: Task) {
        let mut state = self.state.lock().await;
        match state.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => state.tasks.push(task),
        }
    }

    fn signed_in(&self, action: &str) -> TaskboardResult<&Session> {
        self.acting_as.as_ref().ok_or_else(|| {
            TaskboardError::Unauthorized(format!("{} needs a signed-in user", action))
        })
    }

    /// The acting user when it only sees part of the board.
    fn restricted_viewer(&self) -> Option<&Session> {
        self.acting_as.as_ref().filter(|session| !session.is_admin())
    }

    fn visible(&self, task: &Task) -> bool {
        self.restricted_viewer()
            .map_or(true, |session| session.can_see(task))
    }

    fn check_permission(&self, task: &Task) -> TaskboardResult<()> {
        match &self.acting_as {
            Some(session) if !session.can_move(task) => Err(TaskboardError::Unauthorized(format!(
                "user {} may not edit task {}",
                session.user_id, task.id
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list_tasks_for_user(&self, user_id: &str) -> TaskboardResult<Vec<Task>> {
        let state = self.state.lock().await;
        tracing::debug!("Listing tasks for {}", user_id);
        Ok(state
            .tasks
            .iter()
            .filter(|t| self.visible(t))
            .cloned()
            .collect())
    }

    /// Slots in `command` count only the tasks the caller can see; they are
    /// mapped onto the full column before the move, and only visible tasks
    /// are sent back.
    async fn move_task(&self, command: &MoveCommand) -> TaskboardResult<Vec<Task>> {
        let mut state = self.state.lock().await;
        state.moves.push(command.clone());

        if let Some(failure) = state.failures.pop_front() {
            tracing::debug!("Injected {:?} for move of {}", failure, command.task_id);
            return Err(failure.into_error(&command.task_id));
        }

        let task = state
            .tasks
            .iter()
            .find(|t| t.id == command.task_id)
            .ok_or_else(|| TaskboardError::NotFound(format!("task {}", command.task_id)))?;
        self.check_permission(task)?;

        let mut resolved = command.clone();
        if self.restricted_viewer().is_some() {
            resolved.over_position =
                resolve_visible_slot(&state.tasks, command, |t| self.visible(t));
            tracing::debug!(
                "Slot {} of {} resolved to {}",
                command.over_position,
                command.over_status,
                resolved.over_position
            );
        }
        apply_move(&mut state.tasks, &resolved)?;

        let mut affected: Vec<Task> = column_sequence(&state.tasks, command.over_status)
            .into_iter()
            .filter(|t| self.visible(t))
            .cloned()
            .collect();
        if command.changes_column() {
            affected.extend(
                column_sequence(&state.tasks, command.start_status)
                    .into_iter()
                    .filter(|t| self.visible(t))
                    .cloned(),
            );
        }
        Ok(affected)
    }

    async fn update_task(&self, task_id: &str, patch: &TaskPatch) -> TaskboardResult<Task> {
        let mut state = self.state.lock().await;
        let task = state
            .tasks
            .iter()
            .find(|t| t.id == task_id)
            .ok_or_else(|| TaskboardError::NotFound(format!("task {}", task_id)))?;
        self.check_permission(task)?;

        let command = UpdateTask {
            task_id: task_id.to_string(),
            patch: patch.clone(),
        };
        command.execute(&mut CommandContext {
            tasks: &mut state.tasks,
        })?;
        state
            .tasks
            .iter()
            .find(|t| t.id == task_id)
            .cloned()
            .ok_or_else(|| TaskboardError::NotFound(format!("task {}", task_id)))
    }

    async fn take_task(&self, task_id: &str) -> TaskboardResult<Task> {
        let session = self.signed_in("taking a task")?;
        let mut state = self.state.lock().await;
        let task = state
            .tasks
            .iter()
            .find(|t| t.id == task_id && session.can_see(t))
            .ok_or_else(|| TaskboardError::NotFound(format!("task {}", task_id)))?;
        if !session.can_take(task) {
            return Err(TaskboardError::Conflict(format!(
                "task {} is already assigned",
                task_id
            )));
        }

        assign(&mut state.tasks, task_id, Some(session.user_id.clone()))
    }

    async fn drop_task(&self, task_id: &str) -> TaskboardResult<Task> {
        let session = self.signed_in("dropping a task")?;
        let mut state = self.state.lock().await;
        let task = state
            .tasks
            .iter()
            .find(|t| t.id == task_id && session.can_see(t))
            .ok_or_else(|| TaskboardError::NotFound(format!("task {}", task_id)))?;
        if !task.is_assigned_to(&session.user_id) {
            return Err(TaskboardError::Unauthorized(format!(
                "user {} does not hold task {}",
                session.user_id, task_id
            )));
        }
        if !session.can_drop(task) {
            return Err(TaskboardError::Validation(format!(
                "task {} is private or already started",
                task_id
            )));
        }

        assign(&mut state.tasks, task_id, None)
    }
}

fn assign(tasks: &mut Vec<Task>, task_id: &str, assignee: Option<String>) -> TaskboardResult<Task> {
    let command = AssignTask {
        task_id: task_id.to_string(),
        assignee,
    };
    tracing::debug!("Executing: {}", command.description());
    command.execute(&mut CommandContext { tasks })?;
    tasks
        .iter()
        .find(|t| t.id == task_id)
        .cloned()
        .ok_or_else(|| TaskboardError::NotFound(format!("task {}", task_id)))
}
