//! Port interfaces for the screening API

use async_trait::async_trait;
use riskscreen_domain::{ApiResponse, BulkAssociationRequest, Result};

/// Calls the case orchestrator needs from the remote screening service
///
/// Implementations attach authorization and media types; any 2xx response,
/// including 202, is returned as-is.
#[async_trait]
pub trait ScreeningApi: Send + Sync {
    /// Submit a bulk-association screening case
    async fn create_case(&self, request: &BulkAssociationRequest) -> Result<ApiResponse>;

    /// Fetch the transaction materializing a case
    async fn get_transaction(&self, case_id: &str, transaction_id: &str) -> Result<ApiResponse>;

    /// Fetch alerting, valid matches of a case
    async fn get_case_matches(&self, case_id: &str) -> Result<ApiResponse>;
}
