//! Screening API client
//!
//! Thin authenticated transport over the vendor's REST API. Every request
//! carries the current bearer token and the fixed media type of its resource
//! family. Responses are classified only by HTTP status: 4xx/5xx become
//! [`ScreeningError::RemoteApi`], everything else (202 included) is returned
//! for the caller to interpret.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::Method;
use riskscreen_common::time::Sleeper;
use riskscreen_core::ScreeningApi;
use riskscreen_domain::constants::{
    MediaType, CASES_PATH, DEFAULT_API_HOST, DEFAULT_MATCH_PAGE_LIMIT, MAX_CASE_PAGE_LIMIT,
    PROFILES_PATH, SEARCH_PATH,
};
use riskscreen_domain::{
    base_url, ApiConfig, ApiResponse, BulkAssociationRequest, EntityNameSearch, IdSearch,
    NameSearch, PersonNameSearch, Result, RiskEntitySearch, ScreeningError,
};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::auth::AccessTokenProvider;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Configuration for the screening client
#[derive(Debug, Clone)]
pub struct ScreeningClientConfig {
    /// Scheme + host, e.g. `https://api.dowjones.com`
    pub base_url: String,
    pub timeout: Duration,
    /// `page[limit]` used when the orchestrator fetches matches
    pub match_page_limit: u32,
}

impl Default for ScreeningClientConfig {
    fn default() -> Self {
        Self {
            base_url: base_url(DEFAULT_API_HOST),
            timeout: Duration::from_secs(30),
            match_page_limit: DEFAULT_MATCH_PAGE_LIMIT,
        }
    }
}

impl From<&ApiConfig> for ScreeningClientConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: base_url(&config.host),
            timeout: Duration::from_secs(config.timeout_secs),
            match_page_limit: config.match_page_limit,
        }
    }
}

/// Authenticated client for the screening API
pub struct ScreeningClient {
    http_client: Arc<HttpClient>,
    auth: Arc<dyn AccessTokenProvider>,
    config: ScreeningClientConfig,
}

impl ScreeningClient {
    /// Create a new screening client
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be built
    pub fn new(
        config: ScreeningClientConfig,
        auth: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self> {
        let http_client = HttpClient::builder().timeout(config.timeout).build()?;

        Ok(Self { http_client: Arc::new(http_client), auth, config })
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ScreeningClientBuilder {
        ScreeningClientBuilder::default()
    }

    pub fn config(&self) -> &ScreeningClientConfig {
        &self.config
    }

    /// Send one authenticated request.
    ///
    /// `path` may carry a query string. An empty success body is returned as
    /// `null`.
    ///
    /// # Errors
    ///
    /// - [`ScreeningError::Auth`] when no token can be obtained
    /// - [`ScreeningError::RemoteApi`] for any 4xx/5xx status
    /// - [`ScreeningError::MalformedResponse`] for a non-JSON success body
    /// - [`ScreeningError::Network`] for transport failures
    #[instrument(skip(self, payload))]
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        media: MediaType,
        payload: Option<&Value>,
    ) -> Result<ApiResponse> {
        let url = format!("{}{}", self.config.base_url, path);
        let token = self.auth.access_token().await?;

        let mut request = self
            .http_client
            .request(method, url.as_str())
            .header(AUTHORIZATION, token)
            .header(ACCEPT, media.as_str())
            .header(CONTENT_TYPE, media.as_str());

        if media == MediaType::Profile {
            request = request.header(CACHE_CONTROL, "no-cache");
        }

        if let Some(body) = payload {
            let bytes = serde_json::to_vec(body).map_err(|e| {
                ScreeningError::InvalidInput(format!("failed to serialize request body: {e}"))
            })?;
            request = request.body(bytes);
        }

        debug!(url = %url, "screening request");
        let response = self.http_client.send(request).await?;

        let status = response.status();
        let text = response.text().await.map_err(|err| ScreeningError::from(InfraError::from(err)))?;

        if status.is_client_error() || status.is_server_error() {
            warn!(status = status.as_u16(), url = %url, "screening API returned error status");
            return Err(ScreeningError::RemoteApi { status: status.as_u16(), body: text });
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                ScreeningError::MalformedResponse(format!("{url} returned non-JSON body: {e}"))
            })?
        };

        info!(status = status.as_u16(), "screening request completed");
        Ok(ApiResponse::new(status.as_u16(), body))
    }

    async fn post_search(&self, request: &RiskEntitySearch) -> Result<ApiResponse> {
        let payload = to_payload(request)?;
        self.execute(Method::POST, SEARCH_PATH, MediaType::Search, Some(&payload)).await
    }

    /// Free-text name search over persons and entities.
    ///
    /// # Errors
    /// See [`ScreeningClient::execute`]
    pub async fn name_search(&self, search: &NameSearch) -> Result<ApiResponse> {
        self.post_search(&search.to_request()).await
    }

    /// Name search restricted to persons.
    ///
    /// # Errors
    /// See [`ScreeningClient::execute`]
    pub async fn person_search(&self, search: &PersonNameSearch) -> Result<ApiResponse> {
        self.post_search(&search.to_request()).await
    }

    /// Name search restricted to entities.
    ///
    /// # Errors
    /// See [`ScreeningClient::execute`]
    pub async fn entity_search(&self, search: &EntityNameSearch) -> Result<ApiResponse> {
        self.post_search(&search.to_request()).await
    }

    /// Exact identification-number search.
    ///
    /// # Errors
    /// See [`ScreeningClient::execute`]
    pub async fn id_search(&self, search: &IdSearch) -> Result<ApiResponse> {
        self.post_search(&search.to_request()).await
    }

    /// Fetch a risk profile, bypassing caches.
    ///
    /// # Errors
    /// See [`ScreeningClient::execute`]
    pub async fn get_profile(&self, profile_id: &str) -> Result<ApiResponse> {
        let path = format!("{PROFILES_PATH}/{profile_id}");
        self.execute(Method::GET, &path, MediaType::Profile, None).await
    }

    /// Submit a bulk-association screening case.
    ///
    /// Not retried: the vendor offers no idempotency key, so a retried
    /// create may open a second case.
    ///
    /// # Errors
    /// See [`ScreeningClient::execute`]
    pub async fn create_case(&self, request: &BulkAssociationRequest) -> Result<ApiResponse> {
        let payload = to_payload(request)?;
        let path = format!("{CASES_PATH}/bulk-associations?details=true");
        self.execute(Method::POST, &path, MediaType::BulkAssociations, Some(&payload)).await
    }

    /// # Errors
    /// See [`ScreeningClient::execute`]
    pub async fn get_case(&self, case_id: &str) -> Result<ApiResponse> {
        let path = format!("{CASES_PATH}/{case_id}");
        self.execute(Method::GET, &path, MediaType::BulkAssociations, None).await
    }

    /// List screening cases, one page at a time.
    ///
    /// # Errors
    /// [`ScreeningError::InvalidInput`] when `limit` is outside `1..=1000`;
    /// otherwise see [`ScreeningClient::execute`]
    pub async fn list_cases(&self, offset: u32, limit: u32) -> Result<ApiResponse> {
        if !(1..=MAX_CASE_PAGE_LIMIT).contains(&limit) {
            return Err(ScreeningError::InvalidInput(format!(
                "page limit must be between 1 and {MAX_CASE_PAGE_LIMIT}, got {limit}"
            )));
        }
        let path = format!("{CASES_PATH}?page[offset]={offset}&page[limit]={limit}");
        self.execute(Method::GET, &path, MediaType::BulkAssociations, None).await
    }

    /// # Errors
    /// See [`ScreeningClient::execute`]
    pub async fn get_transaction(&self, case_id: &str, transaction_id: &str) -> Result<ApiResponse> {
        let path = format!("{CASES_PATH}/{case_id}/bulk-associations/{transaction_id}?details=true");
        self.execute(Method::GET, &path, MediaType::Json, None).await
    }

    /// Alerting, valid matches of a case, up to `limit` records.
    ///
    /// # Errors
    /// See [`ScreeningClient::execute`]
    pub async fn get_case_matches(&self, case_id: &str, limit: u32) -> Result<ApiResponse> {
        let path = format!(
            "{CASES_PATH}/{case_id}/matches?filter[has_alerts]=true&filter[is_match_valid]=true&page[limit]={limit}"
        );
        self.execute(Method::GET, &path, MediaType::Json, None).await
    }
}

#[async_trait]
impl ScreeningApi for ScreeningClient {
    async fn create_case(&self, request: &BulkAssociationRequest) -> Result<ApiResponse> {
        ScreeningClient::create_case(self, request).await
    }

    async fn get_transaction(&self, case_id: &str, transaction_id: &str) -> Result<ApiResponse> {
        ScreeningClient::get_transaction(self, case_id, transaction_id).await
    }

    async fn get_case_matches(&self, case_id: &str) -> Result<ApiResponse> {
        ScreeningClient::get_case_matches(self, case_id, self.config.match_page_limit).await
    }
}

fn to_payload<T: serde::Serialize>(request: &T) -> Result<Value> {
    serde_json::to_value(request)
        .map_err(|e| ScreeningError::InvalidInput(format!("failed to serialize request: {e}")))
}

/// Builder for [`ScreeningClient`]
#[derive(Default)]
pub struct ScreeningClientBuilder {
    config: Option<ScreeningClientConfig>,
    auth: Option<Arc<dyn AccessTokenProvider>>,
    sleeper: Option<Arc<dyn Sleeper>>,
}

impl ScreeningClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ScreeningClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the authentication provider
    pub fn auth(mut self, auth: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Share a sleeper with the transport, so cancelling it also aborts
    /// connect retries
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Build the screening client
    ///
    /// # Errors
    ///
    /// Returns error if the auth provider is missing or client creation fails
    pub fn build(self) -> Result<ScreeningClient> {
        let config = self.config.unwrap_or_default();
        let auth = self
            .auth
            .ok_or_else(|| ScreeningError::Config("Auth provider not set".to_string()))?;

        let mut http = HttpClient::builder().timeout(config.timeout);
        if let Some(sleeper) = self.sleeper {
            http = http.sleeper(sleeper);
        }

        Ok(ScreeningClient { http_client: Arc::new(http.build()?), auth, config })
    }
}
