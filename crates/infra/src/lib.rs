//! # Riskscreen Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP transport and the authenticated screening API client
//! - Configuration loading (environment, TOML, JSON)
//! - CSV report writing
//! - Local directory file transfer
//!
//! ## Architecture
//! - Implements traits defined in `riskscreen-core`
//! - Depends on `riskscreen-common`, `riskscreen-domain` and `riskscreen-core`
//! - Contains all "impure" code (network, filesystem)

pub mod api;
pub mod config;
pub mod errors;
pub mod export;
pub mod http;
pub mod transfer;

// Re-export commonly used items
pub use api::{build_auth_client, AccessTokenProvider, ScreeningClient, ScreeningClientConfig};
pub use errors::InfraError;
pub use export::CsvReportWriter;
pub use http::HttpClient;
pub use transfer::LocalFileTransfer;
