//! Screening batch job
//!
//! One run: download names, screen them as a single case, export the
//! matches and deliver the report. Whenever matches cannot be produced an
//! empty (header-only) report is still delivered so downstream consumers
//! always receive a file.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use riskscreen_domain::{CaseDetails, CaseHandle, MatchResults, Result};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::export::{FileTransfer, MatchTable, ReportWriter};
use crate::screening::CaseOrchestrator;

/// How a batch run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchStatus {
    /// The names file was empty; nothing was screened or delivered
    NoInput,
    /// Matches were exported
    Exported { rows: usize },
    /// A header-only report was delivered instead
    EmptyReport { reason: String },
}

/// Summary of a batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub status: BatchStatus,
    pub case_id: Option<String>,
    pub transaction_id: Option<String>,
    pub report_path: Option<PathBuf>,
    pub uploads: BTreeMap<String, bool>,
}

impl BatchReport {
    fn no_input() -> Self {
        Self {
            status: BatchStatus::NoInput,
            case_id: None,
            transaction_id: None,
            report_path: None,
            uploads: BTreeMap::new(),
        }
    }

    /// True when every upload target accepted the report.
    #[must_use]
    pub fn all_uploaded(&self) -> bool {
        self.uploads.values().all(|ok| *ok)
    }
}

/// Batch job service
pub struct ScreeningBatch {
    transfer: Arc<dyn FileTransfer>,
    writer: Arc<dyn ReportWriter>,
    orchestrator: Arc<CaseOrchestrator>,
    details: CaseDetails,
}

impl ScreeningBatch {
    /// Create a new batch job
    pub fn new(
        transfer: Arc<dyn FileTransfer>,
        writer: Arc<dyn ReportWriter>,
        orchestrator: Arc<CaseOrchestrator>,
        details: CaseDetails,
    ) -> Self {
        Self { transfer, writer, orchestrator, details }
    }

    /// Run the job once.
    ///
    /// Screening failures never surface as errors: they produce an
    /// [`BatchStatus::EmptyReport`].
    ///
    /// # Errors
    ///
    /// Fails when the names cannot be downloaded or a report cannot be
    /// written or delivered at all.
    pub async fn run(&self) -> Result<BatchReport> {
        info!("starting screening batch");

        let names = self.transfer.download_names().await?;
        if names.is_empty() {
            warn!("names file is empty, nothing to screen");
            return Ok(BatchReport::no_input());
        }
        info!(names = names.len(), "names downloaded");

        let (handle, screened) = self.screen(&names).await;
        let (table, status) = match screened {
            Ok(MatchResults::Ready(matches)) => {
                let table = MatchTable::from_matches(&matches);
                let status = BatchStatus::Exported { rows: table.len() };
                (table, status)
            }
            Ok(MatchResults::StillProcessing(_)) => {
                error!(
                    case_id = ?handle.as_ref().map(|h| &h.case_id),
                    "matches still processing after polling budget"
                );
                let reason = "matches still processing after polling budget".to_string();
                (MatchTable::empty(), BatchStatus::EmptyReport { reason })
            }
            Err(err) => {
                error!(
                    case_id = ?handle.as_ref().map(|h| &h.case_id),
                    error = %err,
                    error_kind = err.label(),
                    "screening failed, delivering empty report"
                );
                (MatchTable::empty(), BatchStatus::EmptyReport { reason: err.to_string() })
            }
        };
        let (case_id, transaction_id) = match handle {
            Some(handle) => (Some(handle.case_id), Some(handle.transaction_id)),
            None => (None, None),
        };

        let report_path = self.writer.write_report(&table).await?;
        info!(path = %report_path.display(), rows = table.len(), "report written");

        let uploads = self.transfer.upload_report(&report_path).await?;
        for (target, ok) in &uploads {
            if *ok {
                info!(target = %target, "report delivered");
            } else {
                error!(target = %target, "report delivery failed");
            }
        }

        Ok(BatchReport { status, case_id, transaction_id, report_path: Some(report_path), uploads })
    }

    /// Create the case and wait for its matches.
    ///
    /// The handle is returned whenever creation succeeded, even if a later
    /// step failed, so the case can be queried again by id.
    async fn screen(&self, names: &[String]) -> (Option<CaseHandle>, Result<MatchResults>) {
        let handle = match self.orchestrator.create_case(names, self.details.clone()).await {
            Ok(handle) => handle,
            Err(err) => return (None, Err(err)),
        };

        let results = async {
            self.orchestrator.await_transaction(&handle).await?;
            self.orchestrator.await_matches(&handle.case_id).await
        }
        .await;

        (Some(handle), results)
    }
}
