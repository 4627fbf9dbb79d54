//! Two-stage OAuth token lifecycle
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   AuthClient    │  get_valid_token() + renewal chain
//! └────────┬────────┘
//!          │
//!          ├──► GrantExchange  (OAuthClient: password / jwt-bearer / refresh)
//!          └──► TokenStore     (shared Credential behind one async mutex)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use riskscreen_common::auth::{AuthClient, OAuthClient, OAuthConfig, TokenStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OAuthConfig::new(
//!     "https://auth.accounts.dowjones.com",
//!     "client_id",
//!     "service-user",
//!     "password",
//! );
//! let store = Arc::new(TokenStore::new());
//! let auth = AuthClient::new(OAuthClient::new(config)?, Arc::clone(&store));
//!
//! let header = auth.get_valid_token().await?;
//! # let _ = header;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod service;
pub mod store;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use client::OAuthClient;
pub use service::AuthClient;
pub use store::TokenStore;
pub use traits::GrantExchange;
pub use types::{AuthError, AuthnTokens, BearerToken, Credential, GrantKind, OAuthConfig};
