//! API authentication wiring
//!
//! Connects the screening client to the shared two-stage OAuth token cache
//! in `riskscreen-common`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use riskscreen_common::auth::{AuthClient, GrantExchange, OAuthClient, OAuthConfig, TokenStore};
use riskscreen_common::time::Clock;
use riskscreen_domain::{base_url, AuthConfig, Result, ScreeningError};

use crate::errors::InfraError;

/// Trait for providing `Authorization` header values
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid `"<token_type> <token>"` value, renewing if needed.
    async fn access_token(&self) -> Result<String>;
}

#[async_trait]
impl<E, C> AccessTokenProvider for AuthClient<E, C>
where
    E: GrantExchange,
    C: Clock,
{
    async fn access_token(&self) -> Result<String> {
        self.get_valid_token().await.map_err(|err| InfraError::from(err).into())
    }
}

/// Build the production auth client from configuration.
///
/// The token store is passed in so every client in the process shares one
/// cached credential.
///
/// # Errors
///
/// Returns [`ScreeningError::Config`] if the identity HTTP client cannot be
/// built.
pub fn build_auth_client(config: &AuthConfig, store: Arc<TokenStore>) -> Result<AuthClient> {
    let oauth = OAuthConfig::new(
        base_url(&config.host),
        config.client_id.clone(),
        config.username.clone(),
        config.password.clone(),
    )
    .with_device(config.device.clone())
    .with_timeout(Duration::from_secs(config.timeout_secs));

    let exchange = OAuthClient::new(oauth)
        .map_err(|err| ScreeningError::Config(format!("failed to build OAuth client: {err}")))?;

    Ok(AuthClient::new(exchange, store))
}
