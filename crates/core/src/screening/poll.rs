//! Poll result classification
//!
//! Each polling response is turned into a [`PollOutcome`] so the loops in
//! the orchestrator branch on a tag instead of on error identity.

use riskscreen_domain::{
    classify_match_response, ApiResponse, MatchReadiness, ScreeningError, TransactionStatus,
};
use serde_json::Value;

/// Result of one polling attempt
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T> {
    /// Resource materialized
    Ready(T),
    /// Still processing; carries the response for diagnostics
    Transient(Value),
    /// Permanent failure, stop polling
    Fatal(ScreeningError),
}

impl<T> PollOutcome<T> {
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Classify a transaction status response.
///
/// `COMPLETED` is ready, `PENDING`/`PROCESSING` are transient and anything
/// else fails immediately. A bare HTTP 202 without a status is transient.
#[must_use]
pub fn classify_transaction(response: ApiResponse) -> PollOutcome<TransactionStatus> {
    let status = TransactionStatus::from_transaction_response(&response.body);
    match status {
        TransactionStatus::Completed => PollOutcome::Ready(TransactionStatus::Completed),
        TransactionStatus::Pending | TransactionStatus::Processing => {
            PollOutcome::Transient(response.body)
        }
        TransactionStatus::Unknown(_) if response.is_accepted() && !has_status(&response.body) => {
            PollOutcome::Transient(response.body)
        }
        TransactionStatus::Unknown(raw) => {
            PollOutcome::Fatal(ScreeningError::UnexpectedStatus(raw))
        }
    }
}

fn has_status(body: &Value) -> bool {
    body.pointer("/data/attributes/status").is_some()
}

/// Classify a match-retrieval response.
#[must_use]
pub fn classify_matches(response: ApiResponse) -> PollOutcome<Value> {
    if response.is_accepted() {
        return PollOutcome::Transient(response.body);
    }
    match classify_match_response(&response.body) {
        MatchReadiness::Ready => PollOutcome::Ready(response.body),
        MatchReadiness::Processing => PollOutcome::Transient(response.body),
        MatchReadiness::Failed { status, detail } => {
            PollOutcome::Fatal(ScreeningError::RemoteApi { status, body: detail })
        }
    }
}
