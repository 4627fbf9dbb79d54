//! Application context - dependency wiring for one CLI run

use std::sync::Arc;
use std::time::Duration;

use riskscreen_common::auth::TokenStore;
use riskscreen_common::TokioSleeper;
use riskscreen_core::{CaseOrchestrator, PollingPolicy, ScreeningBatch};
use riskscreen_domain::{CaseDetails, Config, Result};
use riskscreen_infra::{
    build_auth_client, CsvReportWriter, LocalFileTransfer, ScreeningClient, ScreeningClientConfig,
};
use tokio_util::sync::CancellationToken;

/// Holds the shared token store, the API client and the cancellable sleeper
pub struct AppContext {
    pub config: Config,
    pub client: Arc<ScreeningClient>,
    sleeper: Arc<TokioSleeper>,
}

impl AppContext {
    /// Build the context from loaded configuration.
    ///
    /// One `TokenStore` is created here and shared by every request of the
    /// run.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if an HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        let tokens = Arc::new(TokenStore::new());
        let auth = build_auth_client(&config.auth, tokens)?;
        let sleeper = Arc::new(TokioSleeper::new());
        let client = ScreeningClient::builder()
            .config(ScreeningClientConfig::from(&config.api))
            .auth(Arc::new(auth))
            .sleeper(sleeper.clone())
            .build()?;

        Ok(Self { config, client: Arc::new(client), sleeper })
    }

    /// Token that aborts pending backoff and connect-retry waits when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.sleeper.cancellation_token()
    }

    /// Orchestrator using the configured polling budgets.
    pub fn orchestrator(&self, match_delay: Option<Duration>) -> CaseOrchestrator {
        let orchestrator = CaseOrchestrator::new(
            self.client.clone(),
            self.sleeper.clone(),
            PollingPolicy::from(&self.config.polling),
        );
        match match_delay {
            Some(base) => orchestrator.with_match_delay(base),
            None => orchestrator,
        }
    }

    /// Case metadata from the batch section.
    pub fn case_details(&self) -> CaseDetails {
        CaseDetails {
            case_name: self.config.batch.case_name.clone(),
            external_id: self.config.batch.external_id.clone(),
            owner_id: self.config.batch.owner_id.clone(),
        }
    }

    /// Batch job over the local transfer and CSV writer.
    pub fn batch(&self) -> ScreeningBatch {
        ScreeningBatch::new(
            Arc::new(LocalFileTransfer::from_config(&self.config.batch)),
            Arc::new(CsvReportWriter::new(&self.config.batch.staging_dir)),
            Arc::new(self.orchestrator(None)),
            self.case_details(),
        )
    }
}

#[cfg(test)]
mod tests {
    use riskscreen_domain::{ApiConfig, AuthConfig, BatchConfig, PollingConfig};

    use super::*;

    fn config() -> Config {
        Config {
            auth: AuthConfig {
                host: "http://127.0.0.1:1".into(),
                client_id: "client".into(),
                username: "svc".into(),
                password: "secret".into(),
                device: "linux".into(),
                timeout_secs: 5,
            },
            api: ApiConfig::default(),
            polling: PollingConfig::default(),
            batch: BatchConfig { case_name: "nightly".into(), ..BatchConfig::default() },
        }
    }

    #[test]
    fn case_details_come_from_batch_section() {
        let context = AppContext::new(config()).unwrap();
        let details = context.case_details();

        assert_eq!(details.case_name, "nightly");
        assert_eq!(details.owner_id, "DJ");
    }

    #[test]
    fn match_delay_overrides_only_the_base() {
        let context = AppContext::new(config()).unwrap();
        let orchestrator = context.orchestrator(Some(Duration::from_secs(30)));

        assert_eq!(orchestrator.policy().matches.base(), Duration::from_secs(30));
        assert_eq!(orchestrator.policy().matches.cap(), Duration::from_secs(220));
        assert_eq!(orchestrator.policy().transaction.base(), Duration::from_secs(5));
    }

    #[test]
    fn cancelling_the_token_cancels_the_sleeper() {
        let context = AppContext::new(config()).unwrap();
        let token = context.cancellation_token();
        token.cancel();

        assert!(context.cancellation_token().is_cancelled());
    }
}
