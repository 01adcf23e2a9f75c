//! Serialized board state: the columns to render and the task list.

use serde::{Deserialize, Serialize};
use taskboard_core::{TaskboardError, TaskboardResult};

use crate::{Column, Task};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Empty means the default four columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl BoardSnapshot {
    pub fn new(columns: Vec<Column>, tasks: Vec<Task>) -> Self {
        Self { columns, tasks }
    }

    pub fn effective_columns(&self) -> Vec<Column> {
        if self.columns.is_empty() {
            Column::defaults()
        } else {
            self.columns.clone()
        }
    }

    pub fn to_json_bytes(&self) -> TaskboardResult<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| TaskboardError::Serialization(e.to_string()))
    }

    pub fn from_json_bytes(bytes: &[u8]) -> TaskboardResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| TaskboardError::Serialization(e.to_string()))
    }
}
