//! CSV report writer
//!
//! Writes a [`MatchTable`] as `DJ_Response_<YYYYmmdd_HHMMSS>.csv` into the
//! staging directory. A table without rows still produces a header line.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Local;
use riskscreen_core::{MatchTable, ReportWriter};
use riskscreen_domain::constants::REPORT_FILE_PREFIX;
use riskscreen_domain::{Result, ScreeningError};
use tracing::debug;

use crate::errors::InfraError;

/// [`ReportWriter`] backed by the local filesystem
#[derive(Debug, Clone)]
pub struct CsvReportWriter {
    staging_dir: PathBuf,
}

impl CsvReportWriter {
    pub fn new(staging_dir: impl Into<PathBuf>) -> Self {
        Self { staging_dir: staging_dir.into() }
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    fn report_path(&self) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        self.staging_dir.join(format!("{REPORT_FILE_PREFIX}_{stamp}.csv"))
    }
}

/// Write `table` to `path`, header first.
///
/// # Errors
/// Returns [`ScreeningError::Transfer`] on filesystem failures
pub fn write_table(table: &MatchTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(InfraError::from)?;

    writer.write_record(table.columns()).map_err(InfraError::from)?;
    for row in table.rows() {
        writer.write_record(row).map_err(InfraError::from)?;
    }
    writer.flush().map_err(InfraError::from)?;

    Ok(())
}

#[async_trait]
impl ReportWriter for CsvReportWriter {
    async fn write_report(&self, table: &MatchTable) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.staging_dir).await.map_err(InfraError::from)?;

        let path = self.report_path();
        let table = table.clone();
        let target = path.clone();

        tokio::task::spawn_blocking(move || write_table(&table, &target))
            .await
            .map_err(|e| ScreeningError::Internal(format!("report writer task failed: {e}")))??;

        debug!(path = %path.display(), "CSV report written");
        Ok(path)
    }
}
