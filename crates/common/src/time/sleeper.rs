//! Cancellable waits between polling attempts

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// How a wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepOutcome {
    Elapsed,
    Cancelled,
}

/// Suspends the caller for a backoff delay
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration) -> SleepOutcome;
}

/// Tokio timer that wakes early when its token is cancelled
#[derive(Debug, Clone, Default)]
pub struct TokioSleeper {
    cancel: CancellationToken,
}

impl TokioSleeper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an existing token, e.g. one cancelled by a Ctrl-C handler.
    #[must_use]
    pub fn with_token(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) -> SleepOutcome {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => SleepOutcome::Cancelled,
            () = tokio::time::sleep(duration) => SleepOutcome::Elapsed,
        }
    }
}
