use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Prefix of the daily log files.
const LOG_FILE_PREFIX: &str = "product-export.log";

/// Route `tracing` output to a daily rolling file under `log_dir`. The
/// terminal belongs to the UI, so nothing is ever written to stdout/stderr.
/// Keep the returned guard alive for the lifetime of the program or buffered
/// lines are lost on exit.
pub fn init_logging(log_dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let file_appender = rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(true),
        )
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}
