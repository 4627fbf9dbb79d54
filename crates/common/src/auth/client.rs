//! HTTP client for the identity provider token endpoint
//!
//! All three grants are JSON `POST`s to the same endpoint; only the body
//! differs. Field names and constant values must match the provider
//! byte-for-byte.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::traits::GrantExchange;
use super::types::{
    AuthError, AuthnTokens, BearerToken, GrantKind, JwtBearerGrantRequest, OAuthConfig,
    PasswordGrantRequest, RefreshGrantRequest, TokenResponse, JWT_BEARER_GRANT_TYPE,
    JWT_BEARER_SCOPE, PASSWORD_GRANT_CONNECTION, PASSWORD_GRANT_SCOPE, PASSWORD_GRANT_TYPE,
    REFRESH_GRANT_SCOPE, REFRESH_GRANT_TYPE,
};

/// Token endpoint client
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    client: Client,
}

impl OAuthClient {
    /// Create a new client with the configured request timeout.
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be built
    pub fn new(config: OAuthConfig) -> Result<Self, AuthError> {
        let client = Client::builder().timeout(config.timeout).build().map_err(|e| {
            AuthError::Request { grant: GrantKind::Password, message: e.to_string() }
        })?;
        Ok(Self { config, client })
    }

    /// Get a reference to the OAuth configuration
    #[must_use]
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    async fn post_grant<B: Serialize + Sync>(
        &self,
        grant: GrantKind,
        body: &B,
    ) -> Result<TokenResponse, AuthError> {
        debug!(%grant, "requesting token grant");

        let response = self
            .client
            .post(self.config.token_url())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Request { grant, message: e.to_string() })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected { grant, status: status.as_u16(), body });
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::Request { grant, message: format!("invalid token response: {e}") })
    }
}

#[async_trait]
impl GrantExchange for OAuthClient {
    async fn password_grant(&self) -> Result<AuthnTokens, AuthError> {
        let body = PasswordGrantRequest {
            client_id: &self.config.client_id,
            username: &self.config.username,
            password: &self.config.password,
            connection: PASSWORD_GRANT_CONNECTION,
            device: &self.config.device,
            grant_type: PASSWORD_GRANT_TYPE,
            scope: PASSWORD_GRANT_SCOPE,
        };
        self.post_grant(GrantKind::Password, &body).await?.into_authn()
    }

    async fn jwt_bearer_grant(&self, authn_token: &str) -> Result<BearerToken, AuthError> {
        let body = JwtBearerGrantRequest {
            assertion: authn_token,
            client_id: &self.config.client_id,
            grant_type: JWT_BEARER_GRANT_TYPE,
            scope: JWT_BEARER_SCOPE,
        };
        self.post_grant(GrantKind::JwtBearer, &body).await?.into_bearer(GrantKind::JwtBearer)
    }

    async fn refresh_grant(&self, refresh_token: &str) -> Result<BearerToken, AuthError> {
        let body = RefreshGrantRequest {
            refresh_token,
            client_id: &self.config.client_id,
            grant_type: REFRESH_GRANT_TYPE,
            scope: REFRESH_GRANT_SCOPE,
        };
        self.post_grant(GrantKind::Refresh, &body).await?.into_bearer(GrantKind::Refresh)
    }
}
