//! Within-column ordering.
//!
//! Tasks are ordered by `position`, ties broken by id. A move rewrites the
//! affected columns with dense ranks `0..n`, so after a local commit no two
//! tasks in a column share a position.

use std::cmp::Ordering;
use taskboard_core::{TaskboardError, TaskboardResult};

use crate::drag::MoveCommand;
use crate::task::{Task, TaskId, TaskStatus};

pub fn compare_in_column(a: &Task, b: &Task) -> Ordering {
    a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id))
}

/// Indices into `tasks` of the given column, in display order.
fn column_indices(tasks: &[Task], status: TaskStatus) -> Vec<usize> {
    let mut indices: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.status == status)
        .map(|(i, _)| i)
        .collect();
    indices.sort_by(|&a, &b| compare_in_column(&tasks[a], &tasks[b]));
    indices
}

pub fn column_sequence(tasks: &[Task], status: TaskStatus) -> Vec<&Task> {
    column_indices(tasks, status)
        .into_iter()
        .map(|i| &tasks[i])
        .collect()
}

/// Adjacent pairs in an already sorted sequence that share a position.
pub fn find_ties<'a, I>(sequence: I) -> Vec<(TaskId, TaskId)>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut ties = Vec::new();
    let mut previous: Option<&Task> = None;
    for task in sequence {
        if let Some(prev) = previous {
            if prev.position == task.position {
                ties.push((prev.id.clone(), task.id.clone()));
            }
        }
        previous = Some(task);
    }
    ties
}

/// Map a slot counted among the tasks `is_visible` accepts onto the full
/// target column.
///
/// A slot that names a visible task lands just before it; a slot past the
/// last visible task lands right after that task, or at the end of the
/// column when none of it is visible. The moving task itself is never
/// counted.
pub fn resolve_visible_slot<F>(tasks: &[Task], command: &MoveCommand, is_visible: F) -> usize
where
    F: Fn(&Task) -> bool,
{
    let target: Vec<&Task> = column_sequence(tasks, command.over_status)
        .into_iter()
        .filter(|t| t.id != command.task_id)
        .collect();
    let visible: Vec<usize> = target
        .iter()
        .enumerate()
        .filter(|(_, t)| is_visible(t))
        .map(|(i, _)| i)
        .collect();

    match visible.get(command.over_position) {
        Some(&anchor) => anchor,
        None => visible.last().map_or(target.len(), |&last| last + 1),
    }
}

/// Apply a move locally: take the task out of its column, insert it at
/// `over_position` in the target column and re-rank both columns. Status and
/// position of every touched task are written before this returns.
pub fn apply_move(tasks: &mut [Task], command: &MoveCommand) -> TaskboardResult<()> {
    if command.over_status == TaskStatus::Unknown {
        return Err(TaskboardError::Validation(format!(
            "cannot move task {} into an unknown column",
            command.task_id
        )));
    }

    let active = tasks
        .iter()
        .position(|t| t.id == command.task_id)
        .ok_or_else(|| TaskboardError::NotFound(format!("task {}", command.task_id)))?;
    let from_status = tasks[active].status;

    let mut source: Vec<usize> = column_indices(tasks, from_status);
    source.retain(|&i| i != active);

    let mut target = if from_status == command.over_status {
        std::mem::take(&mut source)
    } else {
        column_indices(tasks, command.over_status)
    };
    let slot = command.over_position.min(target.len());
    target.insert(slot, active);

    tasks[active].place(command.over_status, slot as i64);
    for (rank, &idx) in target.iter().enumerate() {
        tasks[idx].position = rank as i64;
    }
    for (rank, &idx) in source.iter().enumerate() {
        tasks[idx].position = rank as i64;
    }

    tracing::debug!(
        "Placed task {} at {}[{}]",
        command.task_id,
        command.over_status,
        slot
    );
    Ok(())
}
