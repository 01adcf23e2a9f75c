//! Sends move commands to the store and folds the answers back into the
//! local task list.
//!
//! Requests go through a single background worker, so the store sees moves
//! in the order they were submitted. The local list is only touched when an
//! outcome is reconciled: a rejected move leaves the board exactly as it was
//! before the drag.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use taskboard_core::{AppConfig, TaskboardError, TaskboardResult};
use taskboard_domain::commands::{ApplyServerTasks, Command, CommandContext, MoveTask};
use taskboard_domain::{BoardProjection, MoveCommand, Task, TaskId};

use crate::traits::{NotificationKind, NotificationSink, TaskStore};

pub const UNAUTHORIZED_MESSAGE: &str = "Only creator and assignee can edit the task.";
const MOVED_MESSAGE: &str = "Task moved successfully";

struct MoveRequest {
    request_id: Uuid,
    command: MoveCommand,
}

/// What the worker got back from the store for one request.
#[derive(Debug)]
pub struct MoveOutcome {
    pub request_id: Uuid,
    pub command: MoveCommand,
    pub result: TaskboardResult<Vec<Task>>,
}

#[derive(Debug)]
pub enum MoveReport {
    Applied {
        request_id: Uuid,
        command: MoveCommand,
        /// Set when the store accepted the move but the local copy could
        /// not be patched; the caller should refetch.
        needs_refresh: bool,
    },
    Rejected {
        request_id: Uuid,
        command: MoveCommand,
        error: TaskboardError,
    },
}

impl MoveReport {
    pub fn command(&self) -> &MoveCommand {
        match self {
            MoveReport::Applied { command, .. } | MoveReport::Rejected { command, .. } => command,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, MoveReport::Applied { .. })
    }
}

#[derive(Debug, Clone)]
struct PendingMove {
    request_id: Uuid,
    submitted_at: DateTime<Utc>,
}

pub struct MoveDispatcher {
    request_tx: mpsc::UnboundedSender<MoveRequest>,
    outcome_rx: mpsc::UnboundedReceiver<MoveOutcome>,
    worker: JoinHandle<()>,
    pending: HashMap<TaskId, PendingMove>,
    notifier: Arc<dyn NotificationSink>,
    notify_on_success: bool,
}

impl MoveDispatcher {
    /// Start the worker on the current tokio runtime.
    pub fn spawn(
        store: Arc<dyn TaskStore>,
        notifier: Arc<dyn NotificationSink>,
        config: &AppConfig,
    ) -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(store, request_rx, outcome_tx));

        Self {
            request_tx,
            outcome_rx,
            worker,
            pending: HashMap::new(),
            notifier,
            notify_on_success: config.notify_on_success,
        }
    }

    pub fn is_pending(&self, task_id: &str) -> bool {
        self.pending.contains_key(task_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Queue `command` for the store.
    ///
    /// `board` must be the unfiltered projection of the current local tasks.
    /// The command is refused when the task already has a move in flight, or
    /// when the task no longer sits where the drag started.
    pub fn submit(
        &mut self,
        board: &BoardProjection,
        command: MoveCommand,
    ) -> TaskboardResult<Uuid> {
        if self.is_pending(&command.task_id) {
            let error = TaskboardError::MoveInFlight {
                task_id: command.task_id.clone(),
            };
            self.surface(&error);
            return Err(error);
        }

        if board.locate(&command.task_id) != Some(command.start()) {
            tracing::warn!(
                "Task {} left {}[{}] during the drag",
                command.task_id,
                command.start_status,
                command.start_position
            );
            let error = TaskboardError::StaleSnapshot {
                task_id: command.task_id.clone(),
            };
            self.surface(&error);
            return Err(error);
        }

        let request_id = Uuid::new_v4();
        let task_id = command.task_id.clone();
        tracing::info!(
            "Submitting move {}: {} {}[{}] -> {}[{}]",
            request_id,
            task_id,
            command.start_status,
            command.start_position,
            command.over_status,
            command.over_position
        );

        if self
            .request_tx
            .send(MoveRequest {
                request_id,
                command,
            })
            .is_err()
        {
            tracing::error!("Move worker channel closed; dropping move of {}", task_id);
            let error = TaskboardError::Internal("move worker is not running".to_string());
            self.surface(&error);
            return Err(error);
        }

        self.pending.insert(
            task_id,
            PendingMove {
                request_id,
                submitted_at: Utc::now(),
            },
        );
        Ok(request_id)
    }

    /// Reconcile every outcome that has already arrived, without waiting.
    pub fn try_reconcile(&mut self, tasks: &mut Vec<Task>) -> Vec<MoveReport> {
        let mut reports = Vec::new();
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            reports.push(self.reconcile(tasks, outcome));
        }
        reports
    }

    /// Wait for the next outcome. Returns `None` when nothing is in flight.
    pub async fn reconcile_next(&mut self, tasks: &mut Vec<Task>) -> Option<MoveReport> {
        if self.pending.is_empty() {
            return None;
        }
        let outcome = self.outcome_rx.recv().await?;
        Some(self.reconcile(tasks, outcome))
    }

    /// Stop accepting requests and wait for the worker to drain its queue.
    /// Outcomes still queued at that point are dropped.
    pub async fn shutdown(self) {
        let MoveDispatcher {
            request_tx,
            outcome_rx,
            worker,
            pending,
            ..
        } = self;
        drop(request_tx);
        drop(outcome_rx);
        if !pending.is_empty() {
            tracing::debug!("Shutting down with {} move(s) in flight", pending.len());
        }
        if let Err(e) = worker.await {
            tracing::error!("Move worker ended abnormally: {}", e);
        }
    }

    fn reconcile(&mut self, tasks: &mut Vec<Task>, outcome: MoveOutcome) -> MoveReport {
        let MoveOutcome {
            request_id,
            command,
            result,
        } = outcome;

        match self.pending.get(&command.task_id).cloned() {
            Some(pending) if pending.request_id == request_id => {
                self.pending.remove(&command.task_id);
                let elapsed = Utc::now() - pending.submitted_at;
                tracing::debug!(
                    "Move {} settled after {}ms",
                    request_id,
                    elapsed.num_milliseconds()
                );
            }
            Some(pending) => {
                tracing::warn!(
                    "Outcome {} does not match pending move {} for task {}",
                    request_id,
                    pending.request_id,
                    command.task_id
                );
            }
            None => tracing::debug!("No pending entry for move {}", request_id),
        }

        match result {
            Ok(server_tasks) => {
                let patch: Box<dyn Command> = if server_tasks.is_empty() {
                    Box::new(MoveTask {
                        command: command.clone(),
                    })
                } else {
                    Box::new(ApplyServerTasks {
                        tasks: server_tasks,
                    })
                };
                tracing::debug!("Executing: {}", patch.description());

                let mut context = CommandContext { tasks };
                let needs_refresh = match patch.execute(&mut context) {
                    Ok(()) => false,
                    Err(e) => {
                        tracing::warn!("Move {} accepted but local patch failed: {}", request_id, e);
                        true
                    }
                };
                if self.notify_on_success {
                    self.notifier
                        .notify(NotificationKind::Success, MOVED_MESSAGE);
                }
                MoveReport::Applied {
                    request_id,
                    command,
                    needs_refresh,
                }
            }
            Err(error) => {
                tracing::warn!("Move {} for task {} failed: {}", request_id, command.task_id, error);
                self.surface(&error);
                MoveReport::Rejected {
                    request_id,
                    command,
                    error,
                }
            }
        }
    }

    fn surface(&self, error: &TaskboardError) {
        if !error.is_user_visible() {
            return;
        }
        if error.is_authorization() {
            self.notifier
                .notify(NotificationKind::Warning, UNAUTHORIZED_MESSAGE);
            return;
        }
        match error {
            TaskboardError::MoveInFlight { .. } => self
                .notifier
                .notify(NotificationKind::Warning, "This task is still being moved."),
            TaskboardError::StaleSnapshot { .. } => self.notifier.notify(
                NotificationKind::Error,
                "Move task failed! The task was changed elsewhere.",
            ),
            other => self
                .notifier
                .notify(NotificationKind::Error, &format!("Move task failed! {}", other)),
        }
    }
}

async fn run_worker(
    store: Arc<dyn TaskStore>,
    mut request_rx: mpsc::UnboundedReceiver<MoveRequest>,
    outcome_tx: mpsc::UnboundedSender<MoveOutcome>,
) {
    while let Some(request) = request_rx.recv().await {
        tracing::debug!("Worker sending move {}", request.request_id);
        let result = store.move_task(&request.command).await;
        let outcome = MoveOutcome {
            request_id: request.request_id,
            command: request.command,
            result,
        };
        if outcome_tx.send(outcome).is_err() {
            tracing::debug!(
                "Board went away before move {} completed; discarding outcome",
                request.request_id
            );
        }
    }
    tracing::debug!("Move worker exiting");
}
