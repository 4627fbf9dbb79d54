//! Directory-based file transfer
//!
//! Reads the names file from a local path and delivers reports by copying
//! them into each configured target directory. Mounted shares or a sync
//! agent take the place of remote servers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use riskscreen_core::FileTransfer;
use riskscreen_domain::constants::REPORT_UPLOAD_NAME;
use riskscreen_domain::{BatchConfig, Result, ScreeningError, UploadTarget};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

use crate::errors::InfraError;

/// [`FileTransfer`] over local directories
#[derive(Debug, Clone)]
pub struct LocalFileTransfer {
    input_file: PathBuf,
    targets: Vec<UploadTarget>,
}

impl LocalFileTransfer {
    pub fn new(input_file: impl Into<PathBuf>, targets: Vec<UploadTarget>) -> Self {
        Self { input_file: input_file.into(), targets }
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        Self::new(&config.input_file, config.upload_targets.clone())
    }

    async fn copy_to(&self, report: &Path, target: &UploadTarget) -> std::io::Result<PathBuf> {
        let dir = Path::new(&target.path);
        tokio::fs::create_dir_all(dir).await?;
        let destination = dir.join(REPORT_UPLOAD_NAME);
        tokio::fs::copy(report, &destination).await?;
        Ok(destination)
    }
}

#[derive(Deserialize)]
struct NamesFile {
    names: Value,
}

/// Decode a names file: UTF-8 (a leading BOM is dropped), falling back to
/// Latin-1 when the bytes are not valid UTF-8.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// Parse `{"names": [...]}`.
///
/// # Errors
/// [`ScreeningError::InvalidInput`] when the document is not JSON, has no
/// `names` key, or `names` is not a list of strings
pub fn parse_names(text: &str) -> Result<Vec<String>> {
    let file: NamesFile = serde_json::from_str(text).map_err(|e| {
        ScreeningError::InvalidInput(format!("expected {{\"names\": [...]}}: {e}"))
    })?;

    let Value::Array(items) = file.names else {
        return Err(ScreeningError::InvalidInput("'names' should be a list".to_string()));
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(name) => Ok(name),
            other => Err(ScreeningError::InvalidInput(format!("name is not a string: {other}"))),
        })
        .collect()
}

#[async_trait]
impl FileTransfer for LocalFileTransfer {
    async fn download_names(&self) -> Result<Vec<String>> {
        let bytes = tokio::fs::read(&self.input_file).await.map_err(InfraError::from)?;
        let names = parse_names(&decode_text(&bytes))?;
        info!(path = %self.input_file.display(), names = names.len(), "names file read");
        Ok(names)
    }

    async fn upload_report(&self, path: &Path) -> Result<BTreeMap<String, bool>> {
        let mut results = BTreeMap::new();

        for target in &self.targets {
            let ok = match self.copy_to(path, target).await {
                Ok(destination) => {
                    info!(target = %target.name, destination = %destination.display(), "report copied");
                    true
                }
                Err(err) => {
                    error!(target = %target.name, path = %target.path, error = %err, "failed to copy report");
                    false
                }
            };
            results.insert(target.name.clone(), ok);
        }

        Ok(results)
    }
}
