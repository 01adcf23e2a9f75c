//! Board-level glue: owns the task list, turns pointer input into drag
//! events, plans moves and hands them to the dispatcher.

use std::sync::Arc;

use taskboard_core::{AppConfig, TaskboardError, TaskboardResult};
use taskboard_domain::commands::{ApplyServerTasks, Command, CommandContext};
use taskboard_domain::position::{column_sequence, find_ties};
use taskboard_domain::{
    project, BoardProjection, Column, DragEvent, DragIntent, DragSource, DragTracker, DropTarget,
    MoveCommand, MovePlanner, Point, Session, Task, TaskFilter, TaskPatch,
};

use crate::dispatcher::{MoveDispatcher, MoveReport, UNAUTHORIZED_MESSAGE};
use crate::traits::{NotificationKind, NotificationSink, TaskStore};

pub struct BoardController {
    session: Session,
    columns: Vec<Column>,
    tasks: Vec<Task>,
    store: Arc<dyn TaskStore>,
    notifier: Arc<dyn NotificationSink>,
    tracker: DragTracker,
    planner: MovePlanner,
    dispatcher: MoveDispatcher,
    needs_refresh: bool,
}

impl BoardController {
    /// Must be called inside a tokio runtime; the move worker is spawned here.
    pub fn new(
        session: Session,
        columns: Vec<Column>,
        store: Arc<dyn TaskStore>,
        notifier: Arc<dyn NotificationSink>,
        config: &AppConfig,
    ) -> Self {
        let dispatcher = MoveDispatcher::spawn(store.clone(), notifier.clone(), config);
        Self {
            session,
            columns,
            tasks: Vec::new(),
            store,
            notifier,
            tracker: DragTracker::new(config.activation_distance),
            planner: MovePlanner::new(),
            dispatcher,
            needs_refresh: false,
        }
    }

    /// Like [`BoardController::new`], taking the columns from `config` when it
    /// overrides them.
    pub fn from_config(
        session: Session,
        store: Arc<dyn TaskStore>,
        notifier: Arc<dyn NotificationSink>,
        config: &AppConfig,
    ) -> TaskboardResult<Self> {
        let columns = match &config.columns {
            Some(overrides) => Column::from_config(overrides)?,
            None => Column::defaults(),
        };
        Ok(Self::new(session, columns, store, notifier, config))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    /// Fetch the user's tasks from the store and replace the local list.
    pub async fn load(&mut self) -> TaskboardResult<()> {
        match self.store.list_tasks_for_user(&self.session.user_id).await {
            Ok(tasks) => {
                tracing::info!("Loaded {} task(s) for {}", tasks.len(), self.session.user_id);
                self.replace_tasks(tasks);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load tasks: {}", e);
                self.notifier
                    .notify(NotificationKind::Error, "Fetch tasks failed!");
                Err(e)
            }
        }
    }

    /// Swap in a fresh task list. A drag whose task vanished is cancelled.
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.needs_refresh = false;

        for column in &self.columns {
            for (first, second) in find_ties(column_sequence(&self.tasks, column.status)) {
                tracing::warn!(
                    "Tasks {} and {} share a position in column {}; ordering by id",
                    first,
                    second,
                    column.id
                );
            }
        }

        let vanished = self
            .tracker
            .active_task()
            .filter(|active| !self.tasks.iter().any(|t| t.id == *active))
            .map(str::to_string);
        if let Some(task_id) = vanished {
            tracing::debug!("Dragged task {} disappeared on refresh", task_id);
            self.cancel_drag();
        }
    }

    /// Every task, in board order. Moves are planned against this view.
    pub fn projection(&self) -> BoardProjection {
        project(&self.tasks, &self.columns)
    }

    pub fn scoped_projection(&self, filter: &TaskFilter) -> BoardProjection {
        project(&filter.apply(&self.tasks), &self.columns)
    }

    /// What the board should draw: the scoped projection with the dragged
    /// task lifted out, since it is drawn as the overlay instead.
    pub fn render_projection(&self, filter: &TaskFilter) -> BoardProjection {
        let scoped = self.scoped_projection(filter);
        match self.dragged_task_id() {
            Some(task_id) => scoped.without(task_id),
            None => scoped,
        }
    }

    /// The task following the pointer, if a drag is active.
    pub fn overlay_task(&self) -> Option<&Task> {
        let task_id = self.dragged_task_id()?;
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn drag_intent(&self) -> Option<&DragIntent> {
        self.planner.intent()
    }

    pub fn is_pending(&self, task_id: &str) -> bool {
        self.dispatcher.is_pending(task_id)
    }

    /// Whether a press on `task_id` may turn into a drag.
    pub fn can_drag(&self, task_id: &str) -> bool {
        let Some(task) = self.tasks.iter().find(|t| t.id == task_id) else {
            return false;
        };
        self.session.can_move(task) && !self.dispatcher.is_pending(task_id)
    }

    pub fn pointer_down(&mut self, source: DragSource, at: Point) {
        if let DragSource::Task(task_id) = &source {
            if !self.can_drag(task_id) {
                tracing::debug!(
                    "Press on {} ignored for {} (not permitted or move in flight)",
                    task_id,
                    self.session.user_id
                );
                return;
            }
        }
        self.tracker.pointer_down(source, at);
    }

    pub fn pointer_move(&mut self, at: Point, over: Option<DropTarget>) {
        for event in self.tracker.pointer_move(at, over) {
            match event {
                DragEvent::Start { task_id } => {
                    let board = self.projection();
                    if let Err(e) = self.planner.begin(&task_id, &board) {
                        tracing::warn!("Could not start drag of {}: {}", task_id, e);
                        self.tracker.cancel();
                    }
                }
                DragEvent::Over { task_id, target } => {
                    let board = self.projection();
                    if let Some(intent) = self.planner.drag_over(&target, &board) {
                        tracing::trace!("{} now over {:?}", task_id, intent.target);
                    }
                }
                DragEvent::End { .. } | DragEvent::Cancelled { .. } => {}
            }
        }
    }

    /// Release the pointer. Returns the command that was submitted, if any.
    ///
    /// At most one command leaves per gesture. Gestures that do not change
    /// anything are dropped silently; other failures are already reported
    /// through the notifier when this returns.
    pub fn pointer_up(&mut self) -> Option<MoveCommand> {
        let Some(event) = self.tracker.pointer_up() else {
            self.planner.cancel();
            return None;
        };
        let DragEvent::End { task_id, target } = event else {
            self.tracker.finish();
            return None;
        };

        let board = self.projection();
        let submitted = match self.planner.drag_end(target.as_ref(), &board) {
            Ok(command) => match self.dispatcher.submit(&board, command.clone()) {
                Ok(request_id) => {
                    tracing::debug!("Drag of {} produced move {}", task_id, request_id);
                    Some(command)
                }
                Err(e) => {
                    tracing::debug!("Move of {} not submitted: {}", task_id, e);
                    None
                }
            },
            Err(TaskboardError::InvalidGesture(reason)) => {
                tracing::debug!("Discarding gesture: {}", reason);
                None
            }
            Err(e) => {
                tracing::warn!("Drag of {} failed: {}", task_id, e);
                None
            }
        };
        self.tracker.finish();
        submitted
    }

    pub fn cancel_drag(&mut self) {
        if let Some(DragEvent::Cancelled { task_id }) = self.tracker.cancel() {
            tracing::debug!("Drag of {} cancelled", task_id);
        }
        self.planner.cancel();
    }

    /// Apply every move outcome that has arrived so far.
    pub fn poll_outcomes(&mut self) -> Vec<MoveReport> {
        let reports = self.dispatcher.try_reconcile(&mut self.tasks);
        self.note_refresh(&reports);
        reports
    }

    /// Wait for the next move outcome; `None` when nothing is in flight.
    pub async fn next_outcome(&mut self) -> Option<MoveReport> {
        let report = self.dispatcher.reconcile_next(&mut self.tasks).await?;
        self.note_refresh(std::slice::from_ref(&report));
        Some(report)
    }

    /// Wait until every submitted move has been reconciled.
    pub async fn settle(&mut self) -> Vec<MoveReport> {
        let mut reports = Vec::new();
        while let Some(report) = self.next_outcome().await {
            reports.push(report);
        }
        reports
    }

    /// Edit the non-ordering fields of a task through the store.
    pub async fn update_task(&mut self, task_id: &str, patch: TaskPatch) -> TaskboardResult<Task> {
        let task = self.find_task(task_id)?;
        if !self.session.can_move(task) {
            self.notifier
                .notify(NotificationKind::Warning, UNAUTHORIZED_MESSAGE);
            return Err(TaskboardError::Unauthorized(format!(
                "user {} may not edit task {}",
                self.session.user_id, task_id
            )));
        }
        if patch.is_empty() {
            return Ok(task.clone());
        }

        match self.store.update_task(task_id, &patch).await {
            Ok(updated) => {
                let command = ApplyServerTasks {
                    tasks: vec![updated.clone()],
                };
                let mut context = CommandContext {
                    tasks: &mut self.tasks,
                };
                command.execute(&mut context)?;
                tracing::info!("Updated task {}", task_id);
                Ok(updated)
            }
            Err(e) => {
                if e.is_authorization() {
                    self.notifier
                        .notify(NotificationKind::Warning, UNAUTHORIZED_MESSAGE);
                } else {
                    self.notifier
                        .notify(NotificationKind::Error, &format!("Update task failed! {}", e));
                }
                Err(e)
            }
        }
    }

    /// Claim an unassigned task for the signed-in user.
    pub async fn take_task(&mut self, task_id: &str) -> TaskboardResult<Task> {
        let task = self.find_task(task_id)?;
        if !self.session.can_take(task) {
            let e = TaskboardError::Conflict(format!("task {} is already assigned", task_id));
            self.notifier
                .notify(NotificationKind::Error, &format!("Take task failed! {}", e));
            return Err(e);
        }
        let result = self.store.take_task(task_id).await;
        self.finish_assignment(result, "Take task")
    }

    /// Hand back a public, not yet started task the signed-in user holds.
    pub async fn drop_task(&mut self, task_id: &str) -> TaskboardResult<Task> {
        let task = self.find_task(task_id)?;
        if !self.session.can_drop(task) {
            let e = TaskboardError::Validation(format!(
                "only the assignee can drop task {} while it is public and to do",
                task_id
            ));
            self.notifier
                .notify(NotificationKind::Error, &format!("Drop task failed! {}", e));
            return Err(e);
        }
        let result = self.store.drop_task(task_id).await;
        self.finish_assignment(result, "Drop task")
    }

    /// Stop the move worker. Outcomes not yet reconciled are discarded.
    pub async fn shutdown(self) {
        self.dispatcher.shutdown().await;
    }

    fn find_task(&self, task_id: &str) -> TaskboardResult<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id == task_id)
            .ok_or_else(|| TaskboardError::NotFound(format!("task {}", task_id)))
    }

    fn finish_assignment(
        &mut self,
        result: TaskboardResult<Task>,
        action: &str,
    ) -> TaskboardResult<Task> {
        match result {
            Ok(updated) => {
                let command = ApplyServerTasks {
                    tasks: vec![updated.clone()],
                };
                command.execute(&mut CommandContext {
                    tasks: &mut self.tasks,
                })?;
                tracing::info!("{} {} done", action, updated.id);
                self.notifier.notify(
                    NotificationKind::Success,
                    &format!("{} successfully!", action),
                );
                Ok(updated)
            }
            Err(e) => {
                tracing::warn!("{} failed: {}", action, e);
                self.notifier
                    .notify(NotificationKind::Error, &format!("{} failed! {}", action, e));
                Err(e)
            }
        }
    }

    fn dragged_task_id(&self) -> Option<&str> {
        self.planner
            .intent()
            .map(|intent| intent.active_task_id.as_str())
    }

    fn note_refresh(&mut self, reports: &[MoveReport]) {
        if reports
            .iter()
            .any(|r| matches!(r, MoveReport::Applied { needs_refresh: true, .. }))
        {
            self.needs_refresh = true;
        }
    }
}
