//! Screening case lifecycle types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::matches::Match;
use crate::errors::{Result, ScreeningError};

/// Raw response from the screening API
///
/// Any 2xx status lands here, including 202 ("accepted, not yet
/// materialized"); interpreting it is left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    #[must_use]
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// True when the service accepted the request but has not produced the
    /// resource yet.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.status == 202
    }
}

/// Server-side transaction status of a bulk-association case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Processing,
    Completed,
    /// Anything outside the known lifecycle, kept verbatim for reporting
    Unknown(String),
}

impl TransactionStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PENDING" => Self::Pending,
            "PROCESSING" => Self::Processing,
            "COMPLETED" => Self::Completed,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Read `data.attributes.status` from a transaction response.
    ///
    /// A missing or non-string status parses as [`TransactionStatus::Unknown`]
    /// so the caller fails it the same way as an unrecognised value.
    #[must_use]
    pub fn from_transaction_response(body: &Value) -> Self {
        match body.pointer("/data/attributes/status") {
            Some(Value::String(raw)) => Self::parse(raw),
            Some(other) => Self::Unknown(other.to_string()),
            None => Self::Unknown("<missing>".to_string()),
        }
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Unknown(raw) => raw,
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Orchestration state of a single case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseState {
    Creating,
    AwaitingTransaction,
    AwaitingMatches,
    Completed,
    Failed,
}

impl CaseState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Creating => "CREATING",
            Self::AwaitingTransaction => "AWAITING_TRANSACTION",
            Self::AwaitingMatches => "AWAITING_MATCHES",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for CaseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifiers returned by case creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseHandle {
    pub case_id: String,
    pub transaction_id: String,
}

impl CaseHandle {
    /// Extract the case and transaction ids from a bulk-association creation
    /// response (`data.attributes.case_id` and `data.id`).
    ///
    /// # Errors
    ///
    /// Returns [`ScreeningError::MalformedResponse`] when either id is absent.
    pub fn from_creation_response(body: &Value) -> Result<Self> {
        let case_id = string_at(body, "/data/attributes/case_id").ok_or_else(|| {
            ScreeningError::MalformedResponse("case creation response has no data.attributes.case_id".into())
        })?;
        let transaction_id = string_at(body, "/data/id").ok_or_else(|| {
            ScreeningError::MalformedResponse("case creation response has no data.id".into())
        })?;
        Ok(Self { case_id, transaction_id })
    }
}

fn string_at(body: &Value, pointer: &str) -> Option<String> {
    match body.pointer(pointer)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Match retrieval result after the polling budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "payload", rename_all = "snake_case")]
pub enum MatchResults {
    /// Matches were materialized and extracted
    Ready(Vec<Match>),
    /// The budget ran out while the service still reported processing; the
    /// last response is returned as-is for the caller to inspect.
    StillProcessing(Value),
}

impl MatchResults {
    #[must_use]
    pub fn matches(&self) -> Option<&[Match]> {
        match self {
            Self::Ready(matches) => Some(matches),
            Self::StillProcessing(_) => None,
        }
    }
}

/// Final result of a create-and-await run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub case_id: String,
    pub transaction_id: String,
    pub results: MatchResults,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_known_and_unknown_statuses() {
        assert_eq!(TransactionStatus::parse("PENDING"), TransactionStatus::Pending);
        assert_eq!(TransactionStatus::parse("COMPLETED"), TransactionStatus::Completed);
        assert_eq!(
            TransactionStatus::parse("ERROR_XYZ"),
            TransactionStatus::Unknown("ERROR_XYZ".into())
        );
        assert!(TransactionStatus::Processing.is_in_progress());
        assert!(!TransactionStatus::Completed.is_in_progress());
    }

    #[test]
    fn reads_status_from_transaction_body() {
        let body = json!({"data": {"attributes": {"status": "PROCESSING"}}});
        assert_eq!(
            TransactionStatus::from_transaction_response(&body),
            TransactionStatus::Processing
        );
        assert!(matches!(
            TransactionStatus::from_transaction_response(&json!({})),
            TransactionStatus::Unknown(_)
        ));
    }

    #[test]
    fn case_handle_from_creation_response() {
        let body = json!({"data": {"id": "T1", "attributes": {"case_id": "C1"}}});
        let handle = CaseHandle::from_creation_response(&body).unwrap();
        assert_eq!(handle.case_id, "C1");
        assert_eq!(handle.transaction_id, "T1");
    }

    #[test]
    fn case_handle_requires_both_ids() {
        let missing_txn = json!({"data": {"attributes": {"case_id": "C1"}}});
        let err = CaseHandle::from_creation_response(&missing_txn).unwrap_err();
        assert!(matches!(err, ScreeningError::MalformedResponse(_)));

        let missing_case = json!({"data": {"id": "T1"}});
        assert!(CaseHandle::from_creation_response(&missing_case).is_err());
    }

    #[test]
    fn case_state_renders_screaming_case() {
        assert_eq!(CaseState::AwaitingTransaction.to_string(), "AWAITING_TRANSACTION");
        assert_eq!(serde_json::to_value(CaseState::Failed).unwrap(), json!("FAILED"));
    }
}
