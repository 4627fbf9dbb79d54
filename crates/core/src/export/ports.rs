//! Port interfaces for report delivery

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use riskscreen_domain::Result;

use super::flatten::MatchTable;

/// Source of input names and destination of finished reports
#[async_trait]
pub trait FileTransfer: Send + Sync {
    /// Fetch the names to screen
    async fn download_names(&self) -> Result<Vec<String>>;

    /// Deliver a report to every configured target.
    ///
    /// Returns per-target success; one failing target does not stop the
    /// others.
    async fn upload_report(&self, path: &Path) -> Result<BTreeMap<String, bool>>;
}

/// Persists a match table and returns where it was written
#[async_trait]
pub trait ReportWriter: Send + Sync {
    async fn write_report(&self, table: &MatchTable) -> Result<PathBuf>;
}
