//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_HOST, DEFAULT_AUTH_HOST, DEFAULT_DEVICE, DEFAULT_MATCH_PAGE_LIMIT,
    DEFAULT_MAX_ATTEMPTS, MATCHES_BASE_DELAY_SECS, POLL_CAP_DELAY_SECS,
    TRANSACTION_BASE_DELAY_SECS,
};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub auth: AuthConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Identity provider credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_auth_host")]
    pub host: String,
    pub client_id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(default = "default_device")]
    pub device: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("host", &self.host)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("device", &self.device)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Screening API endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub timeout_secs: u64,
    pub match_page_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_API_HOST.to_string(),
            timeout_secs: default_timeout_secs(),
            match_page_limit: DEFAULT_MATCH_PAGE_LIMIT,
        }
    }
}

/// Backoff budget for one polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    pub base_delay_secs: u64,
    pub cap_delay_secs: u64,
    pub max_attempts: u32,
}

/// Polling budgets for the two case-orchestration loops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub transaction: BackoffConfig,
    pub matches: BackoffConfig,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            transaction: BackoffConfig {
                base_delay_secs: TRANSACTION_BASE_DELAY_SECS,
                cap_delay_secs: POLL_CAP_DELAY_SECS,
                max_attempts: DEFAULT_MAX_ATTEMPTS,
            },
            matches: BackoffConfig {
                base_delay_secs: MATCHES_BASE_DELAY_SECS,
                cap_delay_secs: POLL_CAP_DELAY_SECS,
                max_attempts: DEFAULT_MAX_ATTEMPTS,
            },
        }
    }
}

/// Batch job settings (input file, staging and upload locations)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub input_file: String,
    pub staging_dir: String,
    /// Named upload targets; each receives a copy of the report.
    pub upload_targets: Vec<UploadTarget>,
    pub log_dir: String,
    pub case_name: String,
    pub external_id: String,
    pub owner_id: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_file: "input/names.json".to_string(),
            staging_dir: "output".to_string(),
            upload_targets: Vec::new(),
            log_dir: "logs".to_string(),
            case_name: "screening_case".to_string(),
            external_id: "external_id_123".to_string(),
            owner_id: "DJ".to_string(),
        }
    }
}

/// A destination directory the report is delivered to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTarget {
    pub name: String,
    pub path: String,
}

/// Turn a configured host into a base URL.
///
/// Bare hosts get `https://`; values that already carry a scheme are kept.
#[must_use]
pub fn base_url(host: &str) -> String {
    let trimmed = host.trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

fn default_auth_host() -> String {
    DEFAULT_AUTH_HOST.to_string()
}

fn default_device() -> String {
    DEFAULT_DEVICE.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
