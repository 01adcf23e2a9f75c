use std::sync::Arc;

use serde::{Deserialize, Serialize};
use taskboard_client::{
    BoardController, MemoryTaskStore, MoveReport, Notification, RecordingNotifier,
};
use taskboard_domain::{DragSource, DropTarget, MoveCommand, Point, Session};
use uuid::Uuid;

use crate::cli::ReplayArgs;
use crate::context::CliContext;
use crate::handlers::show::BoardView;
use crate::output;

/// One line of a replay script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ScriptEvent {
    Down {
        source: DragSource,
        at: Point,
    },
    Move {
        at: Point,
        #[serde(default)]
        over: Option<DropTarget>,
    },
    Up,
    Cancel,
    /// Wait for every submitted move to come back.
    Settle,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportView {
    request_id: Uuid,
    task_id: String,
    applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<&MoveReport> for ReportView {
    fn from(report: &MoveReport) -> Self {
        match report {
            MoveReport::Applied {
                request_id,
                command,
                ..
            } => Self {
                request_id: *request_id,
                task_id: command.task_id.clone(),
                applied: true,
                error: None,
            },
            MoveReport::Rejected {
                request_id,
                command,
                error,
            } => Self {
                request_id: *request_id,
                task_id: command.task_id.clone(),
                applied: false,
                error: Some(error.to_string()),
            },
        }
    }
}

#[derive(Serialize)]
struct ReplayResult<'a> {
    commands: Vec<MoveCommand>,
    reports: Vec<ReportView>,
    notifications: Vec<Notification>,
    board: BoardView<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    written_to: Option<String>,
}

pub fn parse_script(json: &str) -> anyhow::Result<Vec<ScriptEvent>> {
    serde_json::from_str(json).map_err(|e| anyhow::anyhow!("Invalid replay script: {}", e))
}

pub async fn handle(ctx: &CliContext, args: ReplayArgs) -> anyhow::Result<()> {
    let script = tokio::fs::read_to_string(&args.script)
        .await
        .map_err(|e| anyhow::anyhow!("Cannot read script {}: {}", args.script, e))?;
    let events = parse_script(&script)?;

    let session = Session::new(args.user, args.role.into());
    let columns = ctx.columns()?;
    let store =
        Arc::new(MemoryTaskStore::new(ctx.snapshot.tasks.clone()).acting_as(session.clone()));
    let notifier = Arc::new(RecordingNotifier::new());

    let mut controller =
        BoardController::new(session, columns, store.clone(), notifier.clone(), &ctx.config);
    controller.load().await?;

    let mut commands = Vec::new();
    let mut reports = Vec::new();
    for event in events {
        tracing::debug!("Replaying {:?}", event);
        match event {
            ScriptEvent::Down { source, at } => controller.pointer_down(source, at),
            ScriptEvent::Move { at, over } => controller.pointer_move(at, over),
            ScriptEvent::Up => commands.extend(controller.pointer_up()),
            ScriptEvent::Cancel => controller.cancel_drag(),
            ScriptEvent::Settle => reports.extend(controller.settle().await),
        }
    }
    reports.extend(controller.settle().await);

    let written_to = if args.write {
        // The controller only holds what the user can see.
        ctx.save(&store.tasks().await).await?;
        Some(ctx.path().display().to_string())
    } else {
        None
    };

    let projection = controller.projection();
    let result = ReplayResult {
        commands,
        reports: reports.iter().map(ReportView::from).collect(),
        notifications: notifier.entries(),
        board: BoardView::from(&projection),
        written_to,
    };
    output::output_success(result)?;

    controller.shutdown().await;
    Ok(())
}
