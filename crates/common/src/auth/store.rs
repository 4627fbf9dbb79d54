//! Process-wide credential cache
//!
//! One `TokenStore` is created at startup and shared by handle with every
//! client. Access goes through a single async mutex so that checking expiry
//! and renewing happen under the same acquisition.

use tokio::sync::{Mutex, MutexGuard};

use super::types::Credential;

/// Holds the current [`Credential`]
#[derive(Debug, Default)]
pub struct TokenStore {
    credential: Mutex<Credential>,
}

impl TokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a previously obtained credential.
    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        Self { credential: Mutex::new(credential) }
    }

    /// Acquire exclusive access. Callers that renew must keep the guard for
    /// the whole renewal so concurrent callers wait for its result.
    pub async fn lock(&self) -> MutexGuard<'_, Credential> {
        self.credential.lock().await
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> Credential {
        self.credential.lock().await.clone()
    }

    /// Drop every cached token; the next request authenticates from scratch.
    pub async fn clear(&self) {
        self.credential.lock().await.clear();
    }
}
