//! End-to-end tests: identity provider, screening API, orchestrator and
//! batch adapters wired together against mock servers.

mod support;

use std::sync::Arc;

use riskscreen_common::testing::RecordingSleeper;
use riskscreen_core::{BatchStatus, CaseOrchestrator, PollingPolicy, ScreeningBatch};
use riskscreen_domain::constants::MediaType;
use riskscreen_domain::{CaseDetails, ScreeningError, UploadTarget};
use riskscreen_infra::{CsvReportWriter, LocalFileTransfer};
use serde_json::json;
use support::{
    mount_case_creation, mount_identity, mount_transaction_statuses, screening_client, CASES,
};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Validates the documented end-to-end scenario.
///
/// Assertions:
/// - One password and one jwt-bearer grant for the whole run
/// - Transaction polled PROCESSING, PROCESSING, COMPLETED
/// - Result carries C1 / T1 and the single `{"score": 90}` match
#[tokio::test]
async fn create_and_await_matches_end_to_end() {
    let identity = MockServer::start().await;
    let api = MockServer::start().await;
    mount_identity(&identity).await;
    mount_case_creation(&api, "C1", "T1").await;
    mount_transaction_statuses(&api, "C1", "T1", &["PROCESSING", "PROCESSING", "COMPLETED"])
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{CASES}/C1/matches")))
        .and(query_param("filter[has_alerts]", "true"))
        .and(query_param("filter[is_match_valid]", "true"))
        .and(query_param("page[limit]", "5000"))
        .and(header("authorization", "Bearer bearer-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "matches": [{ "score": 90 }] })))
        .expect(1)
        .mount(&api)
        .await;

    let client = Arc::new(screening_client(&identity, &api));
    let sleeper = RecordingSleeper::new();
    let orchestrator =
        CaseOrchestrator::new(client, Arc::new(sleeper.clone()), PollingPolicy::default());

    let outcome = orchestrator
        .create_and_await_matches(&["Acme Corp".to_string()], CaseDetails::default())
        .await
        .unwrap();

    assert_eq!(outcome.case_id, "C1");
    assert_eq!(outcome.transaction_id, "T1");
    assert_eq!(outcome.results.matches().unwrap()[0]["score"], 90);
    assert_eq!(sleeper.delay_secs(), vec![5, 10]);

    let requests = api.received_requests().await.unwrap();
    let create = requests.iter().find(|r| r.method.as_str() == "POST").unwrap();
    assert_eq!(
        create.headers.get("content-type").unwrap(),
        MediaType::BulkAssociations.as_str()
    );
    assert_eq!(create.url.query(), Some("details=true"));
    let body: serde_json::Value = serde_json::from_slice(&create.body).unwrap();
    assert_eq!(
        body["data"]["attributes"]["case_info"]["associations"][0]["names"][0],
        json!({ "single_string_name": "Acme Corp", "name_type": "PRIMARY" })
    );
    assert_eq!(body["data"]["attributes"]["case_info"]["associations"][0]["record_type"], "UNKNOWN");
}

#[tokio::test]
async fn remote_error_during_polling_surfaces_status_and_body() {
    let identity = MockServer::start().await;
    let api = MockServer::start().await;
    mount_identity(&identity).await;
    mount_case_creation(&api, "C2", "T2").await;
    Mock::given(method("GET"))
        .and(path(format!("{CASES}/C2/bulk-associations/T2")))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&api)
        .await;

    let client = Arc::new(screening_client(&identity, &api));
    let orchestrator =
        CaseOrchestrator::new(client, Arc::new(RecordingSleeper::new()), PollingPolicy::default());

    let err = orchestrator
        .create_and_await_matches(&["Acme".to_string()], CaseDetails::default())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ScreeningError::RemoteApi { status: 500, body: "upstream exploded".to_string() }
    );
}

#[tokio::test]
async fn rejected_credentials_fail_before_any_api_call() {
    let identity = MockServer::start().await;
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/v1/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_grant"))
        .mount(&identity)
        .await;

    let client = screening_client(&identity, &api);
    let err = client.get_case("C1").await.unwrap_err();

    assert!(matches!(err, ScreeningError::Auth(_)));
    assert!(api.received_requests().await.unwrap().is_empty());
}

/// Validates a full batch run on local directories.
///
/// Assertions:
/// - Names are read from a BOM-prefixed JSON file
/// - The CSV lands in the staging dir and is copied to each target
/// - Matches nested under `data[].attributes.matches` are exported
#[tokio::test]
async fn batch_run_writes_and_delivers_csv() {
    let identity = MockServer::start().await;
    let api = MockServer::start().await;
    mount_identity(&identity).await;
    mount_case_creation(&api, "C3", "T3").await;
    mount_transaction_statuses(&api, "C3", "T3", &["COMPLETED"]).await;
    Mock::given(method("GET"))
        .and(path(format!("{CASES}/C3/matches")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "attributes": { "matches": [
                { "peid": "P1", "match_name": "Acme Corp", "primary_name": { "entity_name": "ACME" } }
            ] } }]
        })))
        .mount(&api)
        .await;

    let dir = TempDir::new().unwrap();
    let input = dir.path().join("names.json");
    std::fs::write(&input, "\u{FEFF}{\"names\": [\"Acme Corp\"]}").unwrap();
    let target = dir.path().join("share");
    let transfer = LocalFileTransfer::new(
        &input,
        vec![UploadTarget { name: "share".into(), path: target.display().to_string() }],
    );
    let writer = CsvReportWriter::new(dir.path().join("staging"));

    let client = Arc::new(screening_client(&identity, &api));
    let orchestrator = Arc::new(CaseOrchestrator::new(
        client,
        Arc::new(RecordingSleeper::new()),
        PollingPolicy::default(),
    ));
    let batch = ScreeningBatch::new(
        Arc::new(transfer),
        Arc::new(writer),
        orchestrator,
        CaseDetails::default(),
    );

    let report = batch.run().await.unwrap();

    assert_eq!(report.status, BatchStatus::Exported { rows: 1 });
    assert!(report.all_uploaded());
    let staged = report.report_path.unwrap();
    assert!(staged.starts_with(dir.path().join("staging")));

    let delivered = std::fs::read_to_string(target.join("DJ_Response.csv")).unwrap();
    let mut lines = delivered.lines();
    assert!(lines.next().unwrap().starts_with("peid,subscription_name,primary_name_entity_name"));
    assert!(lines.next().unwrap().starts_with("P1,,ACME,"));
}
