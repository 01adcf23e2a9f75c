use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use taskboard_core::TaskboardError;

/// Opaque task identity as issued by the task store.
pub type TaskId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    ToDo,
    InProgress,
    Done,
    Cancel,
    /// Any status the client does not recognise. Such tasks are kept in the
    /// collection but never rendered in a column.
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub const KNOWN: [TaskStatus; 4] = [
        TaskStatus::ToDo,
        TaskStatus::InProgress,
        TaskStatus::Done,
        TaskStatus::Cancel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ToDo => "TO_DO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
            Self::Cancel => "CANCEL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = TaskboardError;

    /// Case-insensitive; `todo`, `to_do`, `TO-DO` all parse to `ToDo`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "todo" | "open" => Ok(Self::ToDo),
            "inprogress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "cancel" | "cancelled" | "canceled" => Ok(Self::Cancel),
            _ => Err(TaskboardError::Validation(format!(
                "unknown task status: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub position: i64,
    #[serde(default)]
    pub assigned_user_id: Option<String>,
    #[serde(default)]
    pub assigned_user_display_name: Option<String>,
    #[serde(default)]
    pub creator_id: Option<String>,
    #[serde(default)]
    pub date_time_finish: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_public: bool,
}

impl Task {
    pub fn new(
        id: impl Into<TaskId>,
        name: impl Into<String>,
        status: TaskStatus,
        position: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            status,
            position,
            assigned_user_id: None,
            assigned_user_display_name: None,
            creator_id: None,
            date_time_finish: None,
            is_public: false,
        }
    }

    pub fn with_assignee(mut self, user_id: impl Into<String>) -> Self {
        self.assigned_user_id = Some(user_id.into());
        self
    }

    pub fn with_creator(mut self, user_id: impl Into<String>) -> Self {
        self.creator_id = Some(user_id.into());
        self
    }

    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }

    /// Status and rank are always written together.
    pub fn place(&mut self, status: TaskStatus, position: i64) {
        self.status = status;
        self.position = position;
    }

    /// Set or clear the assignee. The display name is the store's to fill in.
    pub fn assign(&mut self, user_id: Option<String>) {
        self.assigned_user_id = user_id;
        self.assigned_user_display_name = None;
    }

    pub fn is_assigned_to(&self, user_id: &str) -> bool {
        self.assigned_user_id.as_deref() == Some(user_id)
    }

    pub fn is_created_by(&self, user_id: &str) -> bool {
        self.creator_id.as_deref() == Some(user_id)
    }
}
