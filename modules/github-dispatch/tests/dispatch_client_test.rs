use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;

use github_dispatch::{
    DispatchClient, DispatchError, DispatchPayload, DispatchRequest, GITHUB_V3_ACCEPT,
};

#[derive(Debug, Clone)]
struct Captured {
    headers: HeaderMap,
    body: serde_json::Value,
}

type Log = Arc<Mutex<Vec<Captured>>>;

async fn record(State(log): State<Log>, headers: HeaderMap, body: Bytes) -> StatusCode {
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    log.lock().unwrap().push(Captured { headers, body });
    StatusCode::NO_CONTENT
}

async fn reject() -> (StatusCode, &'static str) {
    (StatusCode::UNPROCESSABLE_ENTITY, "No ref found for: nope")
}

/// Serve a recording dispatch endpoint on an ephemeral port; returns its base URL.
async fn serve() -> (String, Log) {
    let log: Log = Arc::default();
    let app = Router::new()
        .route("/repos/acme/data/dispatches", post(record))
        .route("/repos/acme/data/actions/workflows/deploy_api.yml/dispatches", post(record))
        .route("/repos/acme/data/rejects", post(reject))
        .with_state(log.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), log)
}

#[tokio::test]
async fn repository_event_sends_bearer_and_event_body() {
    let (base, log) = serve().await;
    let client = DispatchClient::new().unwrap();

    client
        .send(&DispatchRequest {
            url: format!("{base}/repos/acme/data/dispatches"),
            token: "ghp_test".to_string(),
            payload: DispatchPayload::repository_event("update-source-data"),
            accept: None,
        })
        .await
        .unwrap();

    let captured = log.lock().unwrap().clone();
    assert_eq!(captured.len(), 1, "exactly one POST expected");
    let req = &captured[0];
    assert_eq!(req.headers["authorization"], "Bearer ghp_test");
    assert_eq!(
        req.body,
        serde_json::json!({ "event_type": "update-source-data" })
    );
    let agents: Vec<_> = req.headers.get_all("user-agent").iter().collect();
    assert_eq!(agents.len(), 1, "user agent must be sent once");
    assert!(agents[0].to_str().unwrap().starts_with("datapublic-orchestrator/"));
    let accept = req.headers.get("accept").map(|v| v.to_str().unwrap().to_string());
    assert_ne!(accept.as_deref(), Some(GITHUB_V3_ACCEPT));
}

#[tokio::test]
async fn workflow_dispatch_sends_accept_header_and_inputs() {
    let (base, log) = serve().await;
    let client = DispatchClient::new().unwrap();

    let mut inputs = BTreeMap::new();
    inputs.insert("trigger_api_build".to_string(), "true".to_string());
    client
        .send(&DispatchRequest {
            url: format!("{base}/repos/acme/data/actions/workflows/deploy_api.yml/dispatches"),
            token: "ghp_test".to_string(),
            payload: DispatchPayload::workflow("main", inputs),
            accept: Some(GITHUB_V3_ACCEPT.to_string()),
        })
        .await
        .unwrap();

    let captured = log.lock().unwrap().clone();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].headers["accept"], GITHUB_V3_ACCEPT);
    assert_eq!(captured[0].headers["authorization"], "Bearer ghp_test");
    assert_eq!(
        captured[0].body,
        serde_json::json!({ "ref": "main", "inputs": { "trigger_api_build": "true" } })
    );
}

#[tokio::test]
async fn non_success_status_surfaces_as_api_error() {
    let (base, _log) = serve().await;
    let client = DispatchClient::new().unwrap();

    let err = client
        .send(&DispatchRequest {
            url: format!("{base}/repos/acme/data/rejects"),
            token: "ghp_test".to_string(),
            payload: DispatchPayload::repository_event("x"),
            accept: None,
        })
        .await
        .unwrap_err();

    match err {
        DispatchError::Api { status, message } => {
            assert_eq!(status, 422);
            assert!(message.contains("No ref found"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    // Bind then drop to get a port nobody is listening on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = DispatchClient::new().unwrap();
    let err = client
        .send(&DispatchRequest {
            url: format!("http://{addr}/repos/acme/data/dispatches"),
            token: "ghp_test".to_string(),
            payload: DispatchPayload::repository_event("x"),
            accept: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::Network(_)));
}
