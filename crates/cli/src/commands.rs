//! Subcommand handlers

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use riskscreen_domain::{EntityNameSearch, IdSearch, NameSearch, PersonNameSearch};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::cli::{Commands, SearchAction};
use crate::context::AppContext;

/// Run one subcommand and print its JSON result to stdout.
pub async fn dispatch(context: &AppContext, command: Commands) -> Result<()> {
    let client = &context.client;

    match command {
        Commands::Batch => run_batch(context).await,
        Commands::Screen { names, match_delay } => {
            let orchestrator = context.orchestrator(match_delay.map(Duration::from_secs));
            let outcome =
                orchestrator.create_and_await_matches(&names, context.case_details()).await?;
            print_json(&outcome)
        }
        Commands::Case { case_id } => print_json(&client.get_case(&case_id).await?.body),
        Commands::Cases { offset, limit } => {
            print_json(&client.list_cases(offset, limit).await?.body)
        }
        Commands::Transaction { case_id, transaction_id } => {
            print_json(&client.get_transaction(&case_id, &transaction_id).await?.body)
        }
        Commands::Matches { case_id, limit } => {
            let limit = limit.unwrap_or(client.config().match_page_limit);
            print_json(&client.get_case_matches(&case_id, limit).await?.body)
        }
        Commands::Search { action } => {
            let response = match action {
                SearchAction::Name { name, offset, limit, search_type } => {
                    let search = NameSearch {
                        offset,
                        limit,
                        search_type: search_type.into(),
                        ..NameSearch::new(name)
                    };
                    client.name_search(&search).await?
                }
                SearchAction::Person { first_name, middle_name, last_name, limit, search_type } => {
                    let search = PersonNameSearch {
                        first_name,
                        middle_name,
                        last_name,
                        search_type: search_type.into(),
                        limit,
                    };
                    client.person_search(&search).await?
                }
                SearchAction::Entity { entity_name, limit, search_type } => {
                    let search =
                        EntityNameSearch { entity_name, search_type: search_type.into(), limit };
                    client.entity_search(&search).await?
                }
                SearchAction::Id { id_number, id_type, limit } => {
                    client.id_search(&IdSearch { id_number, id_type, limit }).await?
                }
            };
            print_json(&response.body)
        }
        Commands::Profile { profile_id } => print_json(&client.get_profile(&profile_id).await?.body),
    }
}

async fn run_batch(context: &AppContext) -> Result<()> {
    let report = context.batch().run().await.context("batch run failed")?;

    info!(status = ?report.status, case_id = ?report.case_id, "batch run finished");
    for (target, ok) in &report.uploads {
        if !ok {
            error!(target = %target, "report was not delivered");
        }
    }
    if report.uploads.is_empty() && report.report_path.is_some() {
        warn!("no upload targets configured; report left in staging directory");
    }

    print_json(&report)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("serializing output")?;
    writeln!(stdout).context("writing output")?;
    Ok(())
}
