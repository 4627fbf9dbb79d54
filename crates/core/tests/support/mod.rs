//! Shared test helpers for `riskscreen-core` integration tests.
//!
//! In-memory doubles for the screening API, file transfer and report writer
//! so orchestration and batch tests can focus on behaviour.

#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use riskscreen_common::testing::RecordingSleeper;
use riskscreen_core::{
    CaseOrchestrator, FileTransfer, MatchTable, PollingPolicy, ReportWriter, ScreeningApi,
};
use riskscreen_domain::{ApiResponse, BulkAssociationRequest, Result, ScreeningError};
use serde_json::{json, Value};

type Script = Mutex<VecDeque<Result<ApiResponse>>>;

/// Scripted screening API
///
/// Each endpoint replays its queue in order; an exhausted queue answers with
/// an internal error so runaway polling shows up in assertions.
#[derive(Default)]
pub struct FakeScreeningApi {
    creates: Script,
    transactions: Script,
    matches: Script,
    create_calls: AtomicUsize,
    transaction_calls: AtomicUsize,
    match_calls: AtomicUsize,
    last_request: Mutex<Option<BulkAssociationRequest>>,
}

impl FakeScreeningApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creation answers with case `case_id` and transaction `transaction_id`.
    pub fn with_case(self, case_id: &str, transaction_id: &str) -> Self {
        self.push_create(Ok(created(case_id, transaction_id)));
        self
    }

    /// Queue one transaction response per status, all with HTTP 200.
    pub fn with_transaction_statuses(self, statuses: &[&str]) -> Self {
        for status in statuses {
            self.push_transaction(Ok(transaction(status)));
        }
        self
    }

    pub fn push_create(&self, response: Result<ApiResponse>) {
        self.creates.lock().unwrap().push_back(response);
    }

    pub fn push_transaction(&self, response: Result<ApiResponse>) {
        self.transactions.lock().unwrap().push_back(response);
    }

    pub fn push_matches(&self, response: Result<ApiResponse>) {
        self.matches.lock().unwrap().push_back(response);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn transaction_calls(&self) -> usize {
        self.transaction_calls.load(Ordering::SeqCst)
    }

    pub fn match_calls(&self) -> usize {
        self.match_calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<BulkAssociationRequest> {
        self.last_request.lock().unwrap().clone()
    }

    fn next(script: &Script, endpoint: &str) -> Result<ApiResponse> {
        script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ScreeningError::Internal(format!("{endpoint} script exhausted"))))
    }
}

#[async_trait]
impl ScreeningApi for FakeScreeningApi {
    async fn create_case(&self, request: &BulkAssociationRequest) -> Result<ApiResponse> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        Self::next(&self.creates, "create_case")
    }

    async fn get_transaction(&self, _case_id: &str, _transaction_id: &str) -> Result<ApiResponse> {
        self.transaction_calls.fetch_add(1, Ordering::SeqCst);
        Self::next(&self.transactions, "get_transaction")
    }

    async fn get_case_matches(&self, _case_id: &str) -> Result<ApiResponse> {
        self.match_calls.fetch_add(1, Ordering::SeqCst);
        Self::next(&self.matches, "get_case_matches")
    }
}

/// Case creation response body
pub fn created(case_id: &str, transaction_id: &str) -> ApiResponse {
    ApiResponse::new(
        201,
        json!({ "data": { "id": transaction_id, "attributes": { "case_id": case_id } } }),
    )
}

/// Transaction response with the given status
pub fn transaction(status: &str) -> ApiResponse {
    ApiResponse::new(200, json!({ "data": { "attributes": { "status": status } } }))
}

/// Ready match response with top-level `matches`
pub fn matches(records: Value) -> ApiResponse {
    ApiResponse::new(200, json!({ "matches": records }))
}

/// Match response still being materialized
pub fn matches_processing() -> ApiResponse {
    ApiResponse::new(200, json!({ "errors": [{ "status": "202", "detail": "Processing" }] }))
}

pub fn names(raw: &[&str]) -> Vec<String> {
    raw.iter().map(ToString::to_string).collect()
}

/// Orchestrator over `api` that never really sleeps
pub fn orchestrator(
    api: Arc<FakeScreeningApi>,
    sleeper: RecordingSleeper,
) -> CaseOrchestrator {
    CaseOrchestrator::new(api, Arc::new(sleeper), PollingPolicy::default())
}

/// In-memory names source and upload sink
pub struct MemoryTransfer {
    names: Mutex<Option<Result<Vec<String>>>>,
    targets: Vec<(String, bool)>,
    uploaded: Mutex<Vec<PathBuf>>,
}

impl MemoryTransfer {
    pub fn new(names: Vec<String>) -> Self {
        Self::with_result(Ok(names))
    }

    pub fn with_result(names: Result<Vec<String>>) -> Self {
        Self {
            names: Mutex::new(Some(names)),
            targets: vec![("archive".to_string(), true)],
            uploaded: Mutex::default(),
        }
    }

    /// Replace the upload targets and whether each one succeeds.
    pub fn with_targets(mut self, targets: &[(&str, bool)]) -> Self {
        self.targets = targets.iter().map(|(name, ok)| ((*name).to_string(), *ok)).collect();
        self
    }

    pub fn uploaded(&self) -> Vec<PathBuf> {
        self.uploaded.lock().unwrap().clone()
    }
}

#[async_trait]
impl FileTransfer for MemoryTransfer {
    async fn download_names(&self) -> Result<Vec<String>> {
        self.names.lock().unwrap().take().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn upload_report(&self, path: &Path) -> Result<BTreeMap<String, bool>> {
        self.uploaded.lock().unwrap().push(path.to_path_buf());
        Ok(self.targets.iter().cloned().collect())
    }
}

/// Report writer that keeps every table it is given
#[derive(Default)]
pub struct MemoryWriter {
    tables: Mutex<Vec<MatchTable>>,
}

impl MemoryWriter {
    pub fn tables(&self) -> Vec<MatchTable> {
        self.tables.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportWriter for MemoryWriter {
    async fn write_report(&self, table: &MatchTable) -> Result<PathBuf> {
        let mut tables = self.tables.lock().unwrap();
        tables.push(table.clone());
        Ok(PathBuf::from(format!("memory/report_{}.csv", tables.len())))
    }
}
