use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Member,
}

/// The signed-in user, passed explicitly to whatever needs to gate on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub role: Role,
}

impl Session {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Role::Admin)
    }

    pub fn member(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Role::Member)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins may move anything; members only tasks they created or are
    /// assigned to.
    pub fn can_move(&self, task: &Task) -> bool {
        self.is_admin() || task.is_assigned_to(&self.user_id) || task.is_created_by(&self.user_id)
    }

    /// Whether the task shows up in this user's task list at all.
    pub fn can_see(&self, task: &Task) -> bool {
        task.is_public || self.can_move(task)
    }

    /// Unassigned tasks can be claimed by anyone who sees them.
    pub fn can_take(&self, task: &Task) -> bool {
        task.assigned_user_id.is_none() && self.can_see(task)
    }

    /// Only the assignee may hand back a task, and only while it is public
    /// and not yet started.
    pub fn can_drop(&self, task: &Task) -> bool {
        task.is_assigned_to(&self.user_id) && task.is_public && task.status == TaskStatus::ToDo
    }
}
