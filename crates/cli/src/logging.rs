//! Tracing subscriber setup: console plus a timestamped log file

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Log file name for a run started at `started`.
pub fn log_file_name(started: chrono::DateTime<chrono::Local>) -> String {
    format!("riskscreen_{}.log", started.format("%Y%m%d_%H%M%S"))
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the default `info` filter. The returned guard flushes
/// the file writer on drop and must outlive the run.
pub fn init(log_dir: &Path) -> Result<(WorkerGuard, PathBuf)> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let file_name = log_file_name(chrono::Local::now());
    let appender = tracing_appender::rolling::never(log_dir, &file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()
        .context("installing tracing subscriber")?;

    Ok((guard, log_dir.join(file_name)))
}
