//! `AtlasClient` against an in-process HTTP server.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use serde_json::{Value, json};

use regmode_cli::Config;
use regmode_cli::client::AtlasClient;
use regmode_core::client::{RegionalModeClient, status};
use regmode_core::{ProjectId, RemoteError};

const KNOWN_PROJECT: &str = "5f1a2b3c4d5e6f7a8b9c0d1e";
const BROKEN_PROJECT: &str = "aaaaaaaaaaaaaaaaaaaaaaaa";
const GARBLED_PROJECT: &str = "bbbbbbbbbbbbbbbbbbbbbbbb";

#[derive(Clone, Default)]
struct ServerState {
    patches: Arc<Mutex<Vec<Value>>>,
    auth: Arc<Mutex<Option<String>>>,
}

async fn get_mode(
    State(state): State<ServerState>,
    Path(project): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    *state.auth.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match project.as_str() {
        KNOWN_PROJECT => (
            StatusCode::OK,
            json!({ "enabled": false, "status": "DELETING" }).to_string(),
        ),
        BROKEN_PROJECT => (StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()),
        GARBLED_PROJECT => (StatusCode::OK, "{not json".to_string()),
        _ => (StatusCode::NOT_FOUND, "no such group".to_string()),
    }
}

async fn patch_mode(
    State(state): State<ServerState>,
    Path(project): Path<String>,
    body: String,
) -> impl IntoResponse {
    let body: Value = serde_json::from_str(&body).unwrap();
    state.patches.lock().unwrap().push(body.clone());

    if project == KNOWN_PROJECT {
        (StatusCode::OK, json!({ "enabled": body["enabled"] }).to_string())
    } else {
        (StatusCode::NOT_FOUND, "no such group".to_string())
    }
}

async fn spawn_server(state: ServerState) -> String {
    let app = Router::new()
        .route(
            "/api/atlas/v1.0/groups/:project/privateEndpoint/regionalMode",
            get(get_mode).patch(patch_mode),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn client_for(state: ServerState) -> AtlasClient {
    let base = spawn_server(state).await;
    let config = Config {
        api_url: base,
        api_token: Some("secret-token".into()),
        ..Config::default()
    };
    AtlasClient::new(&config).unwrap()
}

fn project(id: &str) -> ProjectId {
    ProjectId::new(id).unwrap()
}

#[tokio::test]
async fn get_decodes_setting_and_sends_bearer_token() {
    let state = ServerState::default();
    let client = client_for(state.clone()).await;

    let setting = client.get_regional_mode(&project(KNOWN_PROJECT)).await.unwrap();

    assert!(!setting.enabled);
    assert_eq!(setting.status.as_deref(), Some(status::DELETING));
    assert_eq!(
        state.auth.lock().unwrap().as_deref(),
        Some("Bearer secret-token")
    );
}

#[tokio::test]
async fn patch_sends_enabled_flag() {
    let state = ServerState::default();
    let client = client_for(state.clone()).await;

    let setting = client
        .set_regional_mode(&project(KNOWN_PROJECT), false)
        .await
        .unwrap();

    assert!(!setting.enabled);
    assert_eq!(
        state.patches.lock().unwrap().as_slice(),
        &[json!({ "enabled": false })]
    );
}

#[tokio::test]
async fn missing_project_maps_to_not_found() {
    let client = client_for(ServerState::default()).await;

    let err = client
        .get_regional_mode(&project("cccccccccccccccccccccccc"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn server_error_keeps_status_and_body() {
    let client = client_for(ServerState::default()).await;

    let err = client
        .get_regional_mode(&project(BROKEN_PROJECT))
        .await
        .unwrap_err();

    assert_eq!(err, RemoteError::http(500, "boom"));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let client = client_for(ServerState::default()).await;

    let err = client
        .get_regional_mode(&project(GARBLED_PROJECT))
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::Decode { .. }));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let config = Config {
        api_url: "http://127.0.0.1:1".into(),
        ..Config::default()
    };
    let client = AtlasClient::new(&config).unwrap();

    let err = client
        .get_regional_mode(&project(KNOWN_PROJECT))
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteError::Transport { .. }));
}
