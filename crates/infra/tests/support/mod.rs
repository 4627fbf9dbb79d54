//! Shared wiremock fixtures for `riskscreen-infra` integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use riskscreen_common::auth::TokenStore;
use riskscreen_domain::AuthConfig;
use riskscreen_infra::{build_auth_client, ScreeningClient, ScreeningClientConfig};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CASES: &str = "/risk-entity-screening-cases";

/// Identity provider answering the password and jwt-bearer grants once each.
pub async fn mount_identity(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth2/v1/token"))
        .and(body_partial_json(json!({ "grant_type": "password" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id_token": "authn-1",
            "refresh_token": "refresh-1"
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth2/v1/token"))
        .and(body_partial_json(json!({
            "grant_type": "urn:ietf:params:oauth:grant-type:jwt-bearer",
            "assertion": "authn-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "access_token": "bearer-1",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(server)
        .await;
}

pub fn auth_config(identity: &MockServer) -> AuthConfig {
    AuthConfig {
        host: identity.uri(),
        client_id: "client-1".into(),
        username: "svc".into(),
        password: "secret".into(),
        device: "mac".into(),
        timeout_secs: 5,
    }
}

/// Screening client authenticating against `identity` and calling `api`.
pub fn screening_client(identity: &MockServer, api: &MockServer) -> ScreeningClient {
    let auth = build_auth_client(&auth_config(identity), Arc::new(TokenStore::new()))
        .expect("auth client");
    let config = ScreeningClientConfig { base_url: api.uri(), ..Default::default() };
    ScreeningClient::new(config, Arc::new(auth)).expect("screening client")
}

/// Case creation endpoint returning `case_id` / `transaction_id`.
pub async fn mount_case_creation(api: &MockServer, case_id: &str, transaction_id: &str) {
    Mock::given(method("POST"))
        .and(path(format!("{CASES}/bulk-associations")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "id": transaction_id, "attributes": { "case_id": case_id } }
        })))
        .expect(1)
        .mount(api)
        .await;
}

/// Transaction endpoint answering `statuses` in order, the last one forever.
pub async fn mount_transaction_statuses(
    api: &MockServer,
    case_id: &str,
    transaction_id: &str,
    statuses: &[&str],
) {
    let route = format!("{CASES}/{case_id}/bulk-associations/{transaction_id}");
    let Some((last, leading)) = statuses.split_last() else {
        return;
    };

    for status in leading {
        Mock::given(method("GET"))
            .and(path(route.as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": { "attributes": { "status": status } } })),
            )
            .up_to_n_times(1)
            .mount(api)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(route.as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "attributes": { "status": last } } })),
        )
        .mount(api)
        .await;
}
