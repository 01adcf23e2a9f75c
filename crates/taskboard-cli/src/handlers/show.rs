use serde::Serialize;
use taskboard_domain::{project, BoardProjection, Lane, TaskFilter};

use crate::cli::ShowArgs;
use crate::context::CliContext;
use crate::output;

#[derive(Serialize)]
pub struct BoardView<'a> {
    pub task_count: usize,
    pub lanes: &'a [Lane],
}

impl<'a> From<&'a BoardProjection> for BoardView<'a> {
    fn from(projection: &'a BoardProjection) -> Self {
        Self {
            task_count: projection.task_count(),
            lanes: projection.lanes(),
        }
    }
}

pub fn handle(ctx: &CliContext, args: ShowArgs) -> anyhow::Result<()> {
    let mut filter = TaskFilter::new().with_scope(args.board_scope());
    if let Some(search) = args.search {
        filter = filter.with_search(search);
    }

    let columns = ctx.columns()?;
    let projection = project(&filter.apply(&ctx.snapshot.tasks), &columns);
    tracing::debug!(
        "Showing {} of {} task(s)",
        projection.task_count(),
        ctx.snapshot.tasks.len()
    );
    output::output_success(BoardView::from(&projection))
}
