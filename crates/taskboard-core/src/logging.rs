//! Tracing subscriber setup shared by the binaries.
//!
//! Set `TASKBOARD_DEBUG_LOG=/path/to/file` to capture DEBUG output with
//! source locations; otherwise only warnings reach stderr. `RUST_LOG`
//! overrides the default level in either mode.

use crate::TaskboardResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEBUG_LOG_ENV: &str = "TASKBOARD_DEBUG_LOG";

pub fn init_tracing() -> TaskboardResult<()> {
    if let Ok(log_path) = std::env::var(DEBUG_LOG_ENV) {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let _ = tracing_subscriber::registry()
            .with(env_filter("debug"))
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(log_file)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false),
            )
            .try_init();
    } else {
        let _ = tracing_subscriber::registry()
            .with(env_filter("warn"))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init();
    }
    Ok(())
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}
