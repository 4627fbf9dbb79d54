//! Two-stage OAuth types
//!
//! The identity provider issues an authn token (password grant) that is
//! only good for obtaining a bearer token (jwt-bearer or refresh grant).
//! Only the bearer token is accepted by resource APIs.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token endpoint path on the identity host
pub const TOKEN_PATH: &str = "/oauth2/v1/token";

pub const PASSWORD_GRANT_TYPE: &str = "password";
pub const PASSWORD_GRANT_SCOPE: &str = "openid service_account_id offline_access";
pub const PASSWORD_GRANT_CONNECTION: &str = "service-account";
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
pub const JWT_BEARER_SCOPE: &str = "openid pib";
pub const REFRESH_GRANT_TYPE: &str = "refresh_token";
pub const REFRESH_GRANT_SCOPE: &str = "openid service_account_id";

/// Seconds shaved off `expires_in` so a bearer token is renewed before the
/// provider starts rejecting it.
pub const EXPIRY_MARGIN_SECS: i64 = 300;

/// Upper bound applied to a provider-sent `expires_in` (one day).
pub const MAX_EXPIRES_IN_SECS: i64 = 86_400;

/// Lifetime assumed when the provider omits `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Identity provider settings
#[derive(Clone)]
pub struct OAuthConfig {
    /// Scheme + host of the identity provider, without trailing slash
    pub base_url: String,
    pub client_id: String,
    pub username: String,
    pub password: String,
    pub device: String,
    pub timeout: Duration,
}

impl OAuthConfig {
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            username: username.into(),
            password: password.into(),
            device: "mac".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}{TOKEN_PATH}", self.base_url)
    }
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("device", &self.device)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Which grant a request or failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantKind {
    Password,
    JwtBearer,
    Refresh,
}

impl fmt::Display for GrantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Password => "password",
            Self::JwtBearer => "jwt-bearer",
            Self::Refresh => "refresh",
        })
    }
}

/// Errors raised while obtaining tokens
#[derive(Debug, Error)]
pub enum AuthError {
    /// Transport failure or undecodable response
    #[error("{grant} grant request failed: {message}")]
    Request { grant: GrantKind, message: String },

    /// Provider answered with a non-success status
    #[error("{grant} grant rejected (status {status}): {body}")]
    Rejected { grant: GrantKind, status: u16, body: String },

    /// Success response without a required token
    #[error("{grant} grant response is missing `{field}`")]
    MissingField { grant: GrantKind, field: &'static str },

    /// The whole fallback chain failed twice
    #[error("authentication exhausted: {0}")]
    Exhausted(String),
}

/// First-stage tokens from the password grant
#[derive(Clone, PartialEq, Eq)]
pub struct AuthnTokens {
    pub id_token: String,
    pub refresh_token: Option<String>,
}

/// Second-stage token usable against resource APIs
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    pub token_type: String,
    pub access_token: String,
    pub expires_in: i64,
    /// Some providers rotate the refresh token on every grant
    pub refresh_token: Option<String>,
}

impl fmt::Debug for AuthnTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthnTokens")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

/// Cached credential state
///
/// `bearer_token` is usable only while `now < expires_at_epoch_seconds`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential {
    pub authn_token: Option<String>,
    pub refresh_token: Option<String>,
    pub bearer_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_at_epoch_seconds: Option<i64>,
}

impl Credential {
    /// Whether the bearer token may still be used at `now`.
    #[must_use]
    pub fn is_valid_at(&self, now_epoch_seconds: i64) -> bool {
        self.bearer_token.is_some()
            && self.expires_at_epoch_seconds.is_some_and(|expires_at| now_epoch_seconds < expires_at)
    }

    /// `Authorization` header value (`"<token_type> <bearer>"`).
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        let bearer = self.bearer_token.as_deref()?;
        let token_type = self.token_type.as_deref().unwrap_or("Bearer");
        Some(format!("{token_type} {bearer}"))
    }

    pub fn store_authn(&mut self, tokens: AuthnTokens) {
        self.authn_token = Some(tokens.id_token);
        if tokens.refresh_token.is_some() {
            self.refresh_token = tokens.refresh_token;
        }
    }

    /// Cache a bearer token, applying the expiry safety margin.
    ///
    /// `expires_in` is clamped to `0..=MAX_EXPIRES_IN_SECS`.
    pub fn store_bearer(&mut self, token: BearerToken, now_epoch_seconds: i64) {
        let lifetime = token.expires_in.clamp(0, MAX_EXPIRES_IN_SECS);
        self.expires_at_epoch_seconds =
            Some(now_epoch_seconds.saturating_add(lifetime).saturating_sub(EXPIRY_MARGIN_SECS));
        self.token_type = Some(token.token_type);
        self.bearer_token = Some(token.access_token);
        if token.refresh_token.is_some() {
            self.refresh_token = token.refresh_token;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("has_authn_token", &self.authn_token.is_some())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("has_bearer_token", &self.bearer_token.is_some())
            .field("token_type", &self.token_type)
            .field("expires_at_epoch_seconds", &self.expires_at_epoch_seconds)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Wire formats
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct PasswordGrantRequest<'a> {
    pub client_id: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub connection: &'a str,
    pub device: &'a str,
    pub grant_type: &'a str,
    pub scope: &'a str,
}

#[derive(Debug, Serialize)]
pub struct JwtBearerGrantRequest<'a> {
    pub assertion: &'a str,
    pub client_id: &'a str,
    pub grant_type: &'a str,
    pub scope: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RefreshGrantRequest<'a> {
    pub refresh_token: &'a str,
    pub client_id: &'a str,
    pub grant_type: &'a str,
    pub scope: &'a str,
}

/// Token endpoint response; which fields are present depends on the grant.
#[derive(Debug, Default, Deserialize)]
pub struct TokenResponse {
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub access_token: Option<String>,
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    /// # Errors
    ///
    /// [`AuthError::MissingField`] when `id_token` is absent.
    pub fn into_authn(self) -> Result<AuthnTokens, AuthError> {
        let id_token = self
            .id_token
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingField { grant: GrantKind::Password, field: "id_token" })?;
        Ok(AuthnTokens { id_token, refresh_token: self.refresh_token })
    }

    /// # Errors
    ///
    /// [`AuthError::MissingField`] when `access_token` is absent.
    pub fn into_bearer(self, grant: GrantKind) -> Result<BearerToken, AuthError> {
        let access_token = self
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingField { grant, field: "access_token" })?;
        Ok(BearerToken {
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_string()),
            access_token,
            expires_in: self.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS),
            refresh_token: self.refresh_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bearer(expires_in: i64) -> BearerToken {
        BearerToken {
            token_type: "Bearer".into(),
            access_token: "abc".into(),
            expires_in,
            refresh_token: None,
        }
    }

    #[test]
    fn bearer_expiry_applies_safety_margin() {
        let mut credential = Credential::default();
        credential.store_bearer(bearer(3600), 1_000);

        assert_eq!(credential.expires_at_epoch_seconds, Some(1_000 + 3600 - 300));
        assert!(credential.is_valid_at(4_299));
        assert!(!credential.is_valid_at(4_300));
        assert_eq!(credential.authorization().as_deref(), Some("Bearer abc"));
    }

    #[test]
    fn provider_lifetime_is_clamped() {
        let mut credential = Credential::default();
        credential.store_bearer(bearer(i64::MAX), 1_700_000_000);
        assert_eq!(
            credential.expires_at_epoch_seconds,
            Some(1_700_000_000 + MAX_EXPIRES_IN_SECS - EXPIRY_MARGIN_SECS)
        );

        credential.store_bearer(bearer(-10), 1_700_000_000);
        assert!(!credential.is_valid_at(1_700_000_000));

        credential.store_bearer(bearer(3600), i64::MAX);
        assert_eq!(credential.expires_at_epoch_seconds, Some(i64::MAX - EXPIRY_MARGIN_SECS));
    }

    #[test]
    fn empty_credential_is_never_valid() {
        assert!(!Credential::default().is_valid_at(0));
        assert!(Credential::default().authorization().is_none());
    }

    #[test]
    fn refresh_token_survives_grants_that_do_not_rotate_it() {
        let mut credential = Credential::default();
        credential.store_authn(AuthnTokens { id_token: "id".into(), refresh_token: Some("r1".into()) });
        credential.store_bearer(bearer(60), 0);
        assert_eq!(credential.refresh_token.as_deref(), Some("r1"));

        credential.clear();
        assert_eq!(credential, Credential::default());
    }

    #[test]
    fn missing_expires_in_defaults_to_one_hour() {
        let response = TokenResponse {
            access_token: Some("abc".into()),
            token_type: Some("Bearer".into()),
            ..TokenResponse::default()
        };
        let token = response.into_bearer(GrantKind::JwtBearer).unwrap();
        assert_eq!(token.expires_in, 3600);
    }

    #[test]
    fn password_response_requires_id_token() {
        let err = TokenResponse::default().into_authn().unwrap_err();
        assert!(matches!(err, AuthError::MissingField { field: "id_token", .. }));
    }

    #[test]
    fn debug_output_never_contains_secrets() {
        let mut credential = Credential::default();
        credential.store_bearer(bearer(60), 0);
        assert!(!format!("{credential:?}").contains("abc"));

        let config = OAuthConfig::new("https://auth.example", "client", "svc", "hunter2");
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
