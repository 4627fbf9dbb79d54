//! Screening API access
//!
//! - [`auth`]: bearer-token provider wired to the shared token store
//! - [`client`]: authenticated client for the screening endpoints

pub mod auth;
pub mod client;

pub use auth::{build_auth_client, AccessTokenProvider};
pub use client::{ScreeningClient, ScreeningClientBuilder, ScreeningClientConfig};
