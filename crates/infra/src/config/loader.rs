//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the credentials are incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! Required:
//! - `DJ_CLIENT_ID`, `DJ_USERNAME`, `DJ_PASSWORD`: service account
//!
//! Optional:
//! - `DJ_AUTH_URL`: identity host (default `auth.accounts.dowjones.com`)
//! - `DJ_API_HOST`: screening API host (default `api.dowjones.com`)
//! - `DJ_DEVICE`: device reported on the password grant
//! - `SCREENING_INPUT_FILE`, `SCREENING_STAGING_DIR`, `SCREENING_LOG_DIR`
//! - `SCREENING_UPLOAD_DIRS`: comma-separated `name=path` (or bare `path`)
//! - `SCREENING_CASE_NAME`, `SCREENING_EXTERNAL_ID`, `SCREENING_OWNER_ID`
//! - `SCREENING_MATCH_PAGE_LIMIT`
//! - `SCREENING_TRANSACTION_MAX_ATTEMPTS`, `SCREENING_MATCHES_MAX_ATTEMPTS`
//! - `SCREENING_MATCHES_BASE_DELAY_SECS`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./riskscreen.{toml,json}` or `./config.{toml,json}` (current working
//!    directory)
//! 2. The same names in the parent and grandparent directories
//! 3. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use riskscreen_domain::constants::{DEFAULT_API_HOST, DEFAULT_AUTH_HOST, DEFAULT_DEVICE};
use riskscreen_domain::{
    ApiConfig, AuthConfig, BatchConfig, Config, PollingConfig, Result, ScreeningError,
    UploadTarget,
};

const CREDENTIAL_VARS: [&str; 3] = ["DJ_CLIENT_ID", "DJ_USERNAME", "DJ_PASSWORD"];

const CONFIG_FILE_NAMES: [&str; 4] =
    ["riskscreen.toml", "riskscreen.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// Uses environment variables when the service-account credentials are all
/// set; otherwise falls back to loading from a config file.
///
/// # Errors
/// Returns `ScreeningError::Config` if:
/// - Configuration cannot be loaded from either source
/// - An environment override is malformed
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    if CREDENTIAL_VARS.iter().all(|key| std::env::var_os(key).is_some()) {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    tracing::debug!("Service-account credentials not in environment, trying file");
    load_from_file(None)
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `ScreeningError::Config` if the credentials are missing or a
/// numeric override is not a number.
pub fn load_from_env() -> Result<Config> {
    let auth = AuthConfig {
        host: env_or("DJ_AUTH_URL", DEFAULT_AUTH_HOST),
        client_id: env_var("DJ_CLIENT_ID")?,
        username: env_var("DJ_USERNAME")?,
        password: env_var("DJ_PASSWORD")?,
        device: env_or("DJ_DEVICE", DEFAULT_DEVICE),
        timeout_secs: 30,
    };

    let mut api = ApiConfig { host: env_or("DJ_API_HOST", DEFAULT_API_HOST), ..ApiConfig::default() };
    if let Some(limit) = env_parse("SCREENING_MATCH_PAGE_LIMIT")? {
        api.match_page_limit = limit;
    }

    let mut polling = PollingConfig::default();
    if let Some(attempts) = env_parse("SCREENING_TRANSACTION_MAX_ATTEMPTS")? {
        polling.transaction.max_attempts = attempts;
    }
    if let Some(attempts) = env_parse("SCREENING_MATCHES_MAX_ATTEMPTS")? {
        polling.matches.max_attempts = attempts;
    }
    if let Some(delay) = env_parse("SCREENING_MATCHES_BASE_DELAY_SECS")? {
        polling.matches.base_delay_secs = delay;
    }

    let defaults = BatchConfig::default();
    let batch = BatchConfig {
        input_file: env_or("SCREENING_INPUT_FILE", &defaults.input_file),
        staging_dir: env_or("SCREENING_STAGING_DIR", &defaults.staging_dir),
        upload_targets: std::env::var("SCREENING_UPLOAD_DIRS")
            .map(|raw| parse_upload_targets(&raw))
            .unwrap_or_default(),
        log_dir: env_or("SCREENING_LOG_DIR", &defaults.log_dir),
        case_name: env_or("SCREENING_CASE_NAME", &defaults.case_name),
        external_id: env_or("SCREENING_EXTERNAL_ID", &defaults.external_id),
        owner_id: env_or("SCREENING_OWNER_ID", &defaults.owner_id),
    };

    Ok(Config { auth, api, polling, batch })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ScreeningError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ScreeningError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ScreeningError::Config(
                "No config file found and DJ_CLIENT_ID/DJ_USERNAME/DJ_PASSWORD not set"
                    .to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ScreeningError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ScreeningError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ScreeningError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(ScreeningError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Parse `name=path` pairs; a bare path is named after its last component.
fn parse_upload_targets(raw: &str) -> Vec<UploadTarget> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((name, path)) => {
                UploadTarget { name: name.trim().to_string(), path: path.trim().to_string() }
            }
            None => {
                let name = Path::new(entry)
                    .file_name()
                    .map_or_else(|| entry.to_string(), |n| n.to_string_lossy().into_owned());
                UploadTarget { name, path: entry.to_string() }
            }
        })
        .collect()
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        ScreeningError::Config(format!("Missing required environment variable: {}", key))
    })
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional numeric override
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ScreeningError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}
