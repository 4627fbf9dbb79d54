//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for screening operations
///
/// Transient "still processing" conditions are deliberately absent: they are
/// absorbed by the polling loops and never surface as errors.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ScreeningError {
    /// Every grant in the token fallback chain failed
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Remote API answered with a 4xx/5xx status (other than 202)
    #[error("Remote API error (status {status}): {body}")]
    RemoteApi { status: u16, body: String },

    /// A required field was missing from a success response
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A "ready" match response carried no matches at any known location
    #[error("No matches found: {0}")]
    NoMatchesFound(String),

    /// Transaction stayed PENDING/PROCESSING for the whole attempt budget
    #[error("Transaction did not complete after {attempts} attempts")]
    TransactionTimeout { attempts: u32 },

    /// Transaction reported a status outside the known lifecycle
    #[error("Unexpected transaction status: {0}")]
    UnexpectedStatus(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transfer error: {0}")]
    Transfer(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScreeningError {
    /// Stable label suitable for metrics and structured logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::RemoteApi { .. } => "remote_api",
            Self::MalformedResponse(_) => "malformed_response",
            Self::NoMatchesFound(_) => "no_matches_found",
            Self::TransactionTimeout { .. } => "transaction_timeout",
            Self::UnexpectedStatus(_) => "unexpected_status",
            Self::Network(_) => "network",
            Self::Config(_) => "config",
            Self::InvalidInput(_) => "invalid_input",
            Self::Transfer(_) => "transfer",
            Self::Cancelled => "cancelled",
            Self::Internal(_) => "internal",
        }
    }

    /// HTTP status a protocol layer should answer with for this error.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::RemoteApi { status, .. } => *status,
            Self::Auth(_) => 401,
            Self::InvalidInput(_) => 400,
            Self::NoMatchesFound(_) => 404,
            Self::TransactionTimeout { .. } => 504,
            Self::Network(_) | Self::MalformedResponse(_) | Self::UnexpectedStatus(_) => 502,
            Self::Config(_) | Self::Transfer(_) | Self::Cancelled | Self::Internal(_) => 500,
        }
    }
}

/// Result type alias for screening operations
pub type Result<T> = std::result::Result<T, ScreeningError>;
