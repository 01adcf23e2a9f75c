use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskboard_core::TaskboardResult;
use taskboard_domain::{MoveCommand, Task, TaskPatch};

/// Remote task service. Implementations own persistence and ordering on the
/// server side; the client only reads lists and submits moves and edits.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_tasks_for_user(&self, user_id: &str) -> TaskboardResult<Vec<Task>>;

    /// Returns the authoritative tasks of the affected column(s). An empty
    /// list means the store accepted the move but sent nothing back.
    async fn move_task(&self, command: &MoveCommand) -> TaskboardResult<Vec<Task>>;

    async fn update_task(&self, task_id: &str, patch: &TaskPatch) -> TaskboardResult<Task>;

    /// Assign an unassigned task to the signed-in user.
    async fn take_task(&self, task_id: &str) -> TaskboardResult<Task>;

    /// Give back a task the signed-in user holds. Only public tasks that are
    /// still to do can be dropped.
    async fn drop_task(&self, task_id: &str) -> TaskboardResult<Task>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

/// Fire-and-forget user feedback (toasts, status bar, ...).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);
}
