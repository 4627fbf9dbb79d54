//! Traits for token grant operations
//!
//! Abstracting the identity provider lets the renewal chain be exercised
//! with scripted grant outcomes instead of a live server.

use async_trait::async_trait;

use super::types::{AuthError, AuthnTokens, BearerToken};

/// The three grants spoken by the identity provider
#[async_trait]
pub trait GrantExchange: Send + Sync {
    /// Password grant with the configured service account.
    ///
    /// # Errors
    /// Returns error if the provider rejects the credentials or is unreachable
    async fn password_grant(&self) -> Result<AuthnTokens, AuthError>;

    /// Exchange an authn token for a bearer token.
    ///
    /// # Errors
    /// Returns error if the assertion is rejected or the request fails
    async fn jwt_bearer_grant(&self, authn_token: &str) -> Result<BearerToken, AuthError>;

    /// Obtain a bearer token from a cached refresh token.
    ///
    /// # Errors
    /// Returns error if the refresh token is invalid/revoked or the request
    /// fails
    async fn refresh_grant(&self, refresh_token: &str) -> Result<BearerToken, AuthError>;
}
