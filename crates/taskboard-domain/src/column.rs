use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use taskboard_core::{ColumnConfig, TaskboardError, TaskboardResult};

use crate::task::TaskStatus;

pub type ColumnId = String;

/// A fixed rendering bucket for one task status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub status: TaskStatus,
    pub title: String,
}

impl Column {
    pub fn new(id: impl Into<ColumnId>, status: TaskStatus, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status,
            title: title.into(),
        }
    }

    /// The four columns every board starts with.
    pub fn defaults() -> Vec<Column> {
        vec![
            Column::new("col-1", TaskStatus::ToDo, "Open"),
            Column::new("col-2", TaskStatus::InProgress, "In Progress"),
            Column::new("col-3", TaskStatus::Done, "Done"),
            Column::new("col-4", TaskStatus::Cancel, "Cancel"),
        ]
    }

    /// Build columns from a config override.
    ///
    /// Each status may be rendered by at most one column, otherwise a task
    /// would show up twice.
    pub fn from_config(configs: &[ColumnConfig]) -> TaskboardResult<Vec<Column>> {
        let mut seen_ids = HashSet::new();
        let mut seen_statuses = HashSet::new();
        let mut columns = Vec::with_capacity(configs.len());

        for config in configs {
            let status: TaskStatus = config.status.parse()?;
            if !seen_ids.insert(config.id.clone()) {
                return Err(TaskboardError::Validation(format!(
                    "duplicate column id: {}",
                    config.id
                )));
            }
            if !seen_statuses.insert(status) {
                return Err(TaskboardError::Validation(format!(
                    "status {} is rendered by more than one column",
                    status
                )));
            }
            columns.push(Column::new(config.id.clone(), status, config.title.clone()));
        }

        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(id: &str, status: &str, title: &str) -> ColumnConfig {
        ColumnConfig {
            id: id.to_string(),
            status: status.to_string(),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_defaults_cover_known_statuses_in_order() {
        let statuses: Vec<_> = Column::defaults().iter().map(|c| c.status).collect();
        assert_eq!(statuses, TaskStatus::KNOWN.to_vec());
    }

    #[test]
    fn test_from_config() {
        let columns = Column::from_config(&[
            config("a", "TO_DO", "Backlog"),
            config("b", "done", "Shipped"),
        ])
        .unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[1].status, TaskStatus::Done);
        assert_eq!(columns[1].title, "Shipped");
    }

    #[test]
    fn test_from_config_rejects_duplicate_status() {
        let result = Column::from_config(&[
            config("a", "TO_DO", "Backlog"),
            config("b", "todo", "Also backlog"),
        ]);
        assert!(matches!(result, Err(TaskboardError::Validation(_))));
    }

    #[test]
    fn test_from_config_rejects_unknown_status() {
        let result = Column::from_config(&[config("a", "BLOCKED", "Blocked")]);
        assert!(result.is_err());
    }
}
