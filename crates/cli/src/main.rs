//! Riskscreen CLI - entity screening from the command line
//!
//! Usage:
//! ```bash
//! riskscreen batch
//! riskscreen screen "Acme Corp" "Jane Doe" --match-delay 30
//! riskscreen case 1234
//! riskscreen cases --offset 0 --limit 50
//! riskscreen transaction 1234 abcd
//! riskscreen matches 1234 --limit 500
//! riskscreen search name "Acme" --search-type precise
//! riskscreen profile 5678
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use riskscreen_infra::config::{load, load_from_file};
use tracing::{info, warn};

mod cli;
mod commands;
mod context;
mod logging;

use cli::Cli;
use context::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_from_file(Some(path.clone())),
        None => load(),
    }
    .context("loading configuration")?;

    let (_guard, log_file) = logging::init(Path::new(&config.batch.log_dir))?;
    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, "could not load .env file"),
    }
    info!(log_file = %log_file.display(), api_host = %config.api.host, "riskscreen starting");

    let context = AppContext::new(config).context("building application context")?;

    let cancel = context.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; cancelling pending waits");
            cancel.cancel();
        }
    });

    commands::dispatch(&context, cli.command).await
}
