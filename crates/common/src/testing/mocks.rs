//! Mock implementations of common traits

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::auth::{AuthError, AuthnTokens, BearerToken, GrantExchange};

type Script<T> = Mutex<VecDeque<Result<T, AuthError>>>;

/// Scripted identity provider
///
/// Each grant pops its next scripted outcome; when the script is empty the
/// grant succeeds with a fresh, numbered token. Calls are counted per grant.
#[derive(Debug, Default)]
pub struct MockGrantExchange {
    password: Script<AuthnTokens>,
    jwt_bearer: Script<BearerToken>,
    refresh: Script<BearerToken>,
    password_calls: AtomicUsize,
    jwt_bearer_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    latency: Option<Duration>,
}

impl MockGrantExchange {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every grant, to widen race windows in concurrency tests.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn push_password(&self, outcome: Result<AuthnTokens, AuthError>) {
        push(&self.password, outcome);
    }

    pub fn push_jwt_bearer(&self, outcome: Result<BearerToken, AuthError>) {
        push(&self.jwt_bearer, outcome);
    }

    pub fn push_refresh(&self, outcome: Result<BearerToken, AuthError>) {
        push(&self.refresh, outcome);
    }

    #[must_use]
    pub fn password_calls(&self) -> usize {
        self.password_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn jwt_bearer_calls(&self) -> usize {
        self.jwt_bearer_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn push<T>(script: &Script<T>, outcome: Result<T, AuthError>) {
    script.lock().unwrap_or_else(PoisonError::into_inner).push_back(outcome);
}

fn pop<T>(script: &Script<T>) -> Option<Result<T, AuthError>> {
    script.lock().unwrap_or_else(PoisonError::into_inner).pop_front()
}

fn bearer(prefix: &str, call: usize) -> BearerToken {
    BearerToken {
        token_type: "Bearer".to_string(),
        access_token: format!("{prefix}-{call}"),
        expires_in: 3600,
        refresh_token: None,
    }
}

#[async_trait]
impl GrantExchange for MockGrantExchange {
    async fn password_grant(&self) -> Result<AuthnTokens, AuthError> {
        let call = self.password_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.simulate_latency().await;
        pop(&self.password).unwrap_or_else(|| {
            Ok(AuthnTokens {
                id_token: format!("authn-{call}"),
                refresh_token: Some(format!("refresh-{call}")),
            })
        })
    }

    async fn jwt_bearer_grant(&self, _authn_token: &str) -> Result<BearerToken, AuthError> {
        let call = self.jwt_bearer_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.simulate_latency().await;
        pop(&self.jwt_bearer).unwrap_or_else(|| Ok(bearer("bearer", call)))
    }

    async fn refresh_grant(&self, _refresh_token: &str) -> Result<BearerToken, AuthError> {
        let call = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.simulate_latency().await;
        pop(&self.refresh).unwrap_or_else(|| Ok(bearer("refreshed", call)))
    }
}
