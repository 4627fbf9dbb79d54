//! Token lifecycle orchestrator
//!
//! `AuthClient::get_valid_token` hands out a cached bearer token while it is
//! inside its validity window and otherwise runs the renewal chain:
//!
//! 1. password grant when no authn token is cached (failure is fatal)
//! 2. jwt-bearer grant with the authn token
//! 3. refresh grant when step 2 fails and a refresh token is cached
//! 4. clear everything and run 1-3 once more; a second failure is fatal
//!
//! The store lock is held from the expiry check until the new token is
//! cached, so concurrent callers observing an expired token share one
//! renewal instead of each hitting the provider.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::client::OAuthClient;
use super::store::TokenStore;
use super::traits::GrantExchange;
use super::types::{AuthError, Credential, GrantKind};
use crate::time::{Clock, SystemClock};

/// Hands out valid `Authorization` header values
pub struct AuthClient<E = OAuthClient, C = SystemClock>
where
    E: GrantExchange,
    C: Clock,
{
    exchange: E,
    store: Arc<TokenStore>,
    clock: C,
}

impl<E: GrantExchange> AuthClient<E, SystemClock> {
    #[must_use]
    pub fn new(exchange: E, store: Arc<TokenStore>) -> Self {
        Self::with_clock(exchange, store, SystemClock)
    }
}

impl<E: GrantExchange, C: Clock> AuthClient<E, C> {
    #[must_use]
    pub fn with_clock(exchange: E, store: Arc<TokenStore>, clock: C) -> Self {
        Self { exchange, store, clock }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<TokenStore> {
        &self.store
    }

    #[must_use]
    pub fn exchange(&self) -> &E {
        &self.exchange
    }

    /// Return a valid `"<token_type> <bearer>"` value, renewing first if the
    /// cached one is missing or expired.
    ///
    /// # Errors
    /// Returns error if the password grant fails, or if the full fallback
    /// chain fails twice in a row
    pub async fn get_valid_token(&self) -> Result<String, AuthError> {
        let mut credential = self.store.lock().await;

        if credential.is_valid_at(self.clock.unix_seconds()) {
            if let Some(header) = credential.authorization() {
                return Ok(header);
            }
        }

        debug!("bearer token missing or expired, renewing");
        let authn_token = self.ensure_authn(&mut credential).await?;

        if let Err(first) = self.obtain_bearer(&mut credential, &authn_token).await {
            warn!(error = %first, "bearer renewal failed, re-authenticating from scratch");
            credential.clear();

            let retry = async {
                let authn_token = self.ensure_authn(&mut credential).await?;
                self.obtain_bearer(&mut credential, &authn_token).await
            };
            retry.await.map_err(|second| {
                AuthError::Exhausted(format!("first attempt: {first}; retry: {second}"))
            })?;
        }

        info!(
            expires_at = credential.expires_at_epoch_seconds,
            "bearer token renewed"
        );

        credential
            .authorization()
            .ok_or(AuthError::MissingField { grant: GrantKind::JwtBearer, field: "access_token" })
    }

    /// Force the next call to authenticate from scratch.
    pub async fn invalidate(&self) {
        self.store.clear().await;
    }

    async fn ensure_authn(&self, credential: &mut Credential) -> Result<String, AuthError> {
        if let Some(token) = credential.authn_token.clone() {
            return Ok(token);
        }

        let tokens = self.exchange.password_grant().await?;
        let id_token = tokens.id_token.clone();
        credential.store_authn(tokens);
        debug!("obtained authn token via password grant");
        Ok(id_token)
    }

    async fn obtain_bearer(
        &self,
        credential: &mut Credential,
        authn_token: &str,
    ) -> Result<(), AuthError> {
        let jwt_error = match self.exchange.jwt_bearer_grant(authn_token).await {
            Ok(token) => {
                credential.store_bearer(token, self.clock.unix_seconds());
                return Ok(());
            }
            Err(err) => err,
        };

        let Some(refresh_token) = credential.refresh_token.clone() else {
            return Err(jwt_error);
        };

        warn!(error = %jwt_error, "jwt-bearer grant failed, trying refresh grant");
        let token = self.exchange.refresh_grant(&refresh_token).await?;
        credential.store_bearer(token, self.clock.unix_seconds());
        Ok(())
    }
}
