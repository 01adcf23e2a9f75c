//! Which tasks a board shows.
//!
//! The same task list backs a private board (tasks assigned to the signed-in
//! user) and a public board (tasks flagged public). Both can be narrowed by a
//! name search.

use serde::{Deserialize, Serialize};

use crate::task::Task;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BoardScope {
    #[default]
    All,
    Private {
        user_id: String,
    },
    Public,
}

impl BoardScope {
    pub fn includes(&self, task: &Task) -> bool {
        match self {
            BoardScope::All => true,
            BoardScope::Private { user_id } => task.is_assigned_to(user_id),
            BoardScope::Public => task.is_public,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskFilter {
    pub scope: BoardScope,
    /// Case-insensitive substring of the task name.
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope(mut self, scope: BoardScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        let trimmed = search.trim();
        self.search = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        };
        self
    }

    pub fn has_active_filters(&self) -> bool {
        self.scope != BoardScope::All || self.search.is_some()
    }

    pub fn matches(&self, task: &Task) -> bool {
        if !self.scope.includes(task) {
            return false;
        }
        match &self.search {
            Some(term) => task.name.to_lowercase().contains(term),
            None => true,
        }
    }

    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        tasks.iter().filter(|t| self.matches(t)).cloned().collect()
    }
}
