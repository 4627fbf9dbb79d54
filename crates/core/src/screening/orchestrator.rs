//! Screening case orchestration
//!
//! Per case: `CREATING → AWAITING_TRANSACTION → AWAITING_MATCHES →
//! COMPLETED | FAILED`. The two polling loops run strictly one after the
//! other, each under its own capped exponential backoff and attempt budget.
//! The orchestrator holds no per-case state, so one instance can drive many
//! cases concurrently.

use std::sync::Arc;
use std::time::Duration;

use riskscreen_common::resilience::ExponentialBackoff;
use riskscreen_common::time::{SleepOutcome, Sleeper};
use riskscreen_domain::{
    extract_matches, BulkAssociationRequest, CaseDetails, CaseHandle, CaseOutcome, CaseState,
    MatchResults, PollingConfig, Result, ScreeningError,
};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::poll::{classify_matches, classify_transaction, PollOutcome};
use super::ports::ScreeningApi;

/// Backoff budgets for the transaction and match loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingPolicy {
    pub transaction: ExponentialBackoff,
    pub matches: ExponentialBackoff,
}

impl Default for PollingPolicy {
    fn default() -> Self {
        Self::from(&PollingConfig::default())
    }
}

impl From<&PollingConfig> for PollingPolicy {
    fn from(config: &PollingConfig) -> Self {
        let backoff = |c: &riskscreen_domain::BackoffConfig| {
            ExponentialBackoff::from_secs(c.base_delay_secs, c.cap_delay_secs, c.max_attempts)
        };
        Self { transaction: backoff(&config.transaction), matches: backoff(&config.matches) }
    }
}

/// Drives screening cases from creation to match retrieval
pub struct CaseOrchestrator {
    api: Arc<dyn ScreeningApi>,
    sleeper: Arc<dyn Sleeper>,
    policy: PollingPolicy,
}

impl CaseOrchestrator {
    /// Create a new orchestrator
    pub fn new(api: Arc<dyn ScreeningApi>, sleeper: Arc<dyn Sleeper>, policy: PollingPolicy) -> Self {
        Self { api, sleeper, policy }
    }

    /// Override the base delay of the match loop, keeping its cap and budget.
    #[must_use]
    pub fn with_match_delay(mut self, base: Duration) -> Self {
        self.policy.matches = self.policy.matches.with_base(base);
        self
    }

    pub fn policy(&self) -> &PollingPolicy {
        &self.policy
    }

    /// Create a case for `names`, wait for its transaction and return its
    /// matches.
    ///
    /// When the match budget runs out while the service is still processing,
    /// the last response is returned as [`MatchResults::StillProcessing`]
    /// rather than an error.
    ///
    /// # Errors
    ///
    /// - [`ScreeningError::InvalidInput`] for an empty name list
    /// - [`ScreeningError::MalformedResponse`] when creation returns no ids
    /// - [`ScreeningError::TransactionTimeout`] / [`ScreeningError::UnexpectedStatus`]
    ///   from the transaction loop
    /// - [`ScreeningError::RemoteApi`] / [`ScreeningError::NoMatchesFound`]
    ///   from the match loop
    /// - [`ScreeningError::Cancelled`] when a backoff wait is cancelled
    #[instrument(skip(self, names, details), fields(names = names.len()))]
    pub async fn create_and_await_matches(
        &self,
        names: &[String],
        details: CaseDetails,
    ) -> Result<CaseOutcome> {
        let handle = self.create_case(names, details).await?;

        let result = async {
            self.await_transaction(&handle).await?;
            self.await_matches(&handle.case_id).await
        }
        .await;

        match result {
            Ok(results) => {
                log_state(&handle.case_id, CaseState::Completed);
                Ok(CaseOutcome {
                    case_id: handle.case_id,
                    transaction_id: handle.transaction_id,
                    results,
                })
            }
            Err(err) => {
                warn!(
                    case_id = %handle.case_id,
                    transaction_id = %handle.transaction_id,
                    state = %CaseState::Failed,
                    error = %err,
                    error_kind = err.label(),
                    "case orchestration failed"
                );
                Err(err)
            }
        }
    }

    /// CREATING: submit the bulk-association case.
    ///
    /// # Errors
    ///
    /// Fails on empty input, remote errors, or a response without ids.
    pub async fn create_case(&self, names: &[String], details: CaseDetails) -> Result<CaseHandle> {
        let request = BulkAssociationRequest::from_names(names, details)?;
        info!(state = %CaseState::Creating, associations = request.association_count(), "creating screening case");

        let response = self.api.create_case(&request).await?;
        let handle = CaseHandle::from_creation_response(&response.body)?;

        info!(
            case_id = %handle.case_id,
            transaction_id = %handle.transaction_id,
            "screening case created"
        );
        Ok(handle)
    }

    /// AWAITING_TRANSACTION: poll until the transaction completes.
    ///
    /// Returns the number of polls it took.
    ///
    /// # Errors
    ///
    /// Times out after the attempt budget; any status outside
    /// `PENDING`/`PROCESSING`/`COMPLETED` fails immediately.
    pub async fn await_transaction(&self, handle: &CaseHandle) -> Result<u32> {
        log_state(&handle.case_id, CaseState::AwaitingTransaction);
        let backoff = self.policy.transaction;

        for attempt in 0..backoff.max_attempts() {
            let response = self.api.get_transaction(&handle.case_id, &handle.transaction_id).await?;

            match classify_transaction(response) {
                PollOutcome::Ready(_) => {
                    info!(case_id = %handle.case_id, polls = attempt + 1, "transaction completed");
                    return Ok(attempt + 1);
                }
                PollOutcome::Fatal(err) => return Err(err),
                PollOutcome::Transient(body) => {
                    if backoff.is_last_attempt(attempt) {
                        break;
                    }
                    let delay = backoff.delay(attempt);
                    debug!(
                        case_id = %handle.case_id,
                        attempt = attempt + 1,
                        status = transaction_status(&body),
                        delay_secs = delay.as_secs(),
                        "transaction still processing"
                    );
                    self.wait(delay).await?;
                }
            }
        }

        Err(ScreeningError::TransactionTimeout { attempts: backoff.max_attempts() })
    }

    /// AWAITING_MATCHES: poll until matches are materialized.
    ///
    /// # Errors
    ///
    /// Remote errors and a ready response without matches are fatal; running
    /// out of attempts is not.
    pub async fn await_matches(&self, case_id: &str) -> Result<MatchResults> {
        log_state(case_id, CaseState::AwaitingMatches);
        let backoff = self.policy.matches;
        let mut last = Value::Null;

        for attempt in 0..backoff.max_attempts() {
            let response = self.api.get_case_matches(case_id).await?;

            match classify_matches(response) {
                PollOutcome::Ready(body) => {
                    let matches = extract_matches(&body)?;
                    info!(case_id, matches = matches.len(), polls = attempt + 1, "matches ready");
                    return Ok(MatchResults::Ready(matches));
                }
                PollOutcome::Fatal(err) => return Err(err),
                PollOutcome::Transient(body) => {
                    last = body;
                    if backoff.is_last_attempt(attempt) {
                        break;
                    }
                    let delay = backoff.delay(attempt);
                    debug!(
                        case_id,
                        attempt = attempt + 1,
                        delay_secs = delay.as_secs(),
                        "matches still processing"
                    );
                    self.wait(delay).await?;
                }
            }
        }

        warn!(
            case_id,
            attempts = backoff.max_attempts(),
            "match budget exhausted, returning last processing response"
        );
        Ok(MatchResults::StillProcessing(last))
    }

    async fn wait(&self, delay: Duration) -> Result<()> {
        match self.sleeper.sleep(delay).await {
            SleepOutcome::Elapsed => Ok(()),
            SleepOutcome::Cancelled => Err(ScreeningError::Cancelled),
        }
    }
}

fn log_state(case_id: &str, state: CaseState) {
    info!(case_id, state = %state, "case state changed");
}

fn transaction_status(body: &Value) -> &str {
    body.pointer("/data/attributes/status").and_then(Value::as_str).unwrap_or("<accepted>")
}
