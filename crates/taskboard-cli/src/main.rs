mod cli;
mod context;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::CliContext;
use taskboard_core::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    taskboard_core::logging::init_tracing()?;

    let Cli { file, command } = Cli::parse();

    if let Commands::Completions { shell } = command {
        clap_complete::generate(shell, &mut Cli::command(), "taskboard", &mut std::io::stdout());
        return Ok(());
    }

    let file_path = file
        .ok_or_else(|| anyhow::anyhow!("--file is required (or set TASKBOARD_FILE)"))?;
    let config = AppConfig::load();
    let ctx = match CliContext::load(&file_path, config).await {
        Ok(ctx) => ctx,
        Err(e) => output::output_error(&format!("Failed to load {}: {}", file_path, e)),
    };

    let result = match command {
        Commands::Show(args) => handlers::show::handle(&ctx, args),
        Commands::Replay(args) => handlers::replay::handle(&ctx, args).await,
        Commands::Completions { .. } => Ok(()),
    };
    if let Err(e) = result {
        output::output_error(&e.to_string());
    }

    Ok(())
}
