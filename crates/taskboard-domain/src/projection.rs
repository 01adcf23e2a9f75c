//! Read-side view of the board: one position-sorted lane per column.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::column::{Column, ColumnId};
use crate::drag::Slot;
use crate::position::compare_in_column;
use crate::task::Task;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lane {
    pub column: Column,
    pub tasks: Vec<Task>,
}

impl Lane {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn slot_of(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BoardProjection {
    lanes: Vec<Lane>,
}

/// Project `tasks` into one lane per column, in column order.
///
/// Each lane holds the tasks whose status matches the column, sorted by
/// position then id. Tasks whose status no column renders are left out of
/// every lane; the input is never modified.
pub fn project(tasks: &[Task], columns: &[Column]) -> BoardProjection {
    let mut lanes: Vec<Lane> = columns
        .iter()
        .map(|column| Lane {
            column: column.clone(),
            tasks: Vec::new(),
        })
        .collect();

    let mut orphaned = 0usize;
    for task in tasks {
        match lanes.iter_mut().find(|lane| lane.column.status == task.status) {
            Some(lane) => lane.tasks.push(task.clone()),
            None => orphaned += 1,
        }
    }
    if orphaned > 0 {
        tracing::debug!("{} task(s) have a status no column renders", orphaned);
    }

    for lane in &mut lanes {
        lane.tasks.sort_by(compare_in_column);
    }

    BoardProjection { lanes }
}

impl BoardProjection {
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn lane(&self, column_id: &str) -> Option<&Lane> {
        self.lanes.iter().find(|lane| lane.column.id == column_id)
    }

    pub fn get(&self, column_id: &str) -> Option<&[Task]> {
        self.lane(column_id).map(|lane| lane.tasks.as_slice())
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.lanes
            .iter()
            .flat_map(|lane| lane.tasks.iter())
            .find(|t| t.id == task_id)
    }

    /// Column status and slot index of a rendered task.
    pub fn locate(&self, task_id: &str) -> Option<Slot> {
        self.lanes.iter().find_map(|lane| {
            lane.slot_of(task_id)
                .map(|position| Slot::new(lane.column.status, position))
        })
    }

    pub fn task_count(&self) -> usize {
        self.lanes.iter().map(Lane::len).sum()
    }

    /// The same board with one task removed, for rendering while that task
    /// is drawn as the drag overlay.
    pub fn without(&self, task_id: &str) -> BoardProjection {
        BoardProjection {
            lanes: self
                .lanes
                .iter()
                .map(|lane| Lane {
                    column: lane.column.clone(),
                    tasks: lane
                        .tasks
                        .iter()
                        .filter(|t| t.id != task_id)
                        .cloned()
                        .collect(),
                })
                .collect(),
        }
    }

    pub fn to_map(&self) -> BTreeMap<ColumnId, Vec<Task>> {
        self.lanes
            .iter()
            .map(|lane| (lane.column.id.clone(), lane.tasks.clone()))
            .collect()
    }
}
