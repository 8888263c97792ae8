//! End-to-end tests of the HTTP API over an in-memory database

use axum::body::{to_bytes, Body};
use axum::Router;
use http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::prelude::{
    AccessPolicy, KeyVerifier, MetadataVisibility, NodeSettings, PaginationMode,
};
use evade_node::database::Database;
use evade_node::http_server::{self, MASTER_KEY_HEADER, READER_KEY_HEADER};
use evade_node::ServiceState;

async fn app_with(settings: NodeSettings) -> Router {
    let database = Database::in_memory().await.unwrap();
    let verifier = KeyVerifier::with_cost(8, 1, 1).unwrap();
    http_server::router(ServiceState::new(settings, database, verifier))
}

async fn app() -> Router {
    app_with(NodeSettings::default()).await
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

async fn get(app: &Router, uri: &str, headers: &[(&str, &str)]) -> (StatusCode, Value) {
    send(app, Method::GET, uri, headers, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, &[], Some(body)).await
}

fn error_message(body: &Value) -> &str {
    body["error_message"].as_str().unwrap()
}

#[tokio::test]
async fn test_status_routes() {
    let app = app().await;

    let (status, body) = get(&app, "/_status/livez", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _) = get(&app, "/_status/readyz", &[]).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app, "/_status/version", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["node"], "evade-node");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = app().await;
    let (status, _) = get(&app, "/api/v0/nowhere", &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wall_lifecycle() {
    let app = app().await;

    let (status, created) = post(
        &app,
        "/api/v0/pool/new/wall",
        json!({"tag": "lobby", "public": true, "master_key": "master-key"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["type"], "wall");
    assert_eq!(created["tag"], "lobby");
    assert_eq!(created["write_key_required"], false);
    assert!(created.get("master_key_hash").is_none());
    let id = created["id"].as_str().unwrap().to_string();

    let (status, info) = get(&app, "/api/v0/pool/lobby", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["id"], id.as_str());

    for text in ["one", "two", "three"] {
        let (status, written) = post(
            &app,
            "/api/v0/pool/lobby/write/plaintext",
            json!({"text": text}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(written["text"], text);
    }

    let (status, page) = get(&app, &format!("/api/v0/pool/{}/read?last=2", id), &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 3);
    assert_eq!(page["count"], 2);
    assert_eq!(page["messages"][0]["index"], 2);
    assert_eq!(page["messages"][1]["text"], "three");

    let (status, list) = get(&app, "/api/v0/pool/list?first=10", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 1);
    assert_eq!(list["pools"][0]["tag"], "lobby");
}

#[tokio::test]
async fn test_create_errors() {
    let app = app().await;

    let (status, body) = post(
        &app,
        "/api/v0/pool/new/wall",
        json!({"master_key": "master-key", "writer_key": "writer-key"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("`writer_key` is not allowed for `wall` pools"));

    let (status, _) = post(
        &app,
        "/api/v0/pool/new/forum",
        json!({"master_key": "master-key"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    post(
        &app,
        "/api/v0/pool/new/wall",
        json!({"tag": "taken", "master_key": "master-key"}),
    )
    .await;
    let (status, body) = post(
        &app,
        "/api/v0/pool/new/wall",
        json!({"tag": "taken", "master_key": "master-key"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_message(&body), "Tag is already in use.");
}

#[tokio::test]
async fn test_mailbox_reader_key_over_headers() {
    let app = app().await;
    post(
        &app,
        "/api/v0/pool/new/mailbox",
        json!({"tag": "inbox", "public": true, "master_key": "master-key", "reader_key": "reader-key"}),
    )
    .await;

    // anyone may drop a message into a mailbox
    let (status, _) = post(
        &app,
        "/api/v0/pool/inbox/write/plaintext",
        json!({"text": "psst"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = get(&app, "/api/v0/pool/inbox/read?first=1", &[]).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        error_message(&body),
        "access denied, reader key is required"
    );

    let (status, _) = get(
        &app,
        "/api/v0/pool/inbox/read?first=1",
        &[(READER_KEY_HEADER, "wrong-key")],
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, page) = get(
        &app,
        "/api/v0/pool/inbox/read?first=1",
        &[(READER_KEY_HEADER, "reader-key")],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["messages"][0]["text"], "psst");

    // the master key is not a reader key unless the node says so
    let (status, _) = get(
        &app,
        "/api/v0/pool/inbox/read?first=1",
        &[(MASTER_KEY_HEADER, "master-key")],
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_master_reads_when_enabled() {
    let app = app_with(NodeSettings {
        access: AccessPolicy {
            master_reads_messages: true,
            ..Default::default()
        },
        ..Default::default()
    })
    .await;
    post(
        &app,
        "/api/v0/pool/new/mailbox",
        json!({"tag": "inbox", "master_key": "master-key", "reader_key": "reader-key"}),
    )
    .await;

    let (status, _) = get(
        &app,
        "/api/v0/pool/inbox/read?first=1",
        &[(MASTER_KEY_HEADER, "master-key")],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_private_pool_metadata() {
    let app = app().await;
    post(
        &app,
        "/api/v0/pool/new/channel",
        json!({"tag": "news", "master_key": "master-key", "writer_key": "writer-key"}),
    )
    .await;

    let (status, _) = get(&app, "/api/v0/pool/news", &[]).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, info) = get(&app, "/api/v0/pool/news", &[(MASTER_KEY_HEADER, "master-key")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["write_key_required"], true);

    let (_, list) = get(&app, "/api/v0/pool/list?first=10", &[]).await;
    assert_eq!(list["total"], 0);

    let (status, _) = get(&app, "/api/v0/pool/missing", &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_key_presence_visibility() {
    let app = app_with(NodeSettings {
        access: AccessPolicy {
            metadata: MetadataVisibility::KeyPresence,
            ..Default::default()
        },
        ..Default::default()
    })
    .await;
    post(
        &app,
        "/api/v0/pool/new/channel",
        json!({"tag": "news", "master_key": "master-key", "writer_key": "writer-key"}),
    )
    .await;

    // no reader key, so the metadata is open even though the pool is not public
    let (status, _) = get(&app, "/api/v0/pool/news", &[]).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_channel_write_access_and_compatibility() {
    let app = app().await;
    post(
        &app,
        "/api/v0/pool/new/channel",
        json!({"tag": "news", "public": true, "master_key": "master-key", "writer_key": "writer-key"}),
    )
    .await;

    let (status, body) = post(&app, "/api/v0/pool/news/write/plaintext", json!({"text": "hi"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_message(&body), "access denied, writer key is required");

    let (status, body) = post(
        &app,
        "/api/v0/pool/news/write/plaintext",
        json!({"text": "hi", "writer_key": "wrong-key"}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_message(&body), "invalid writer key");

    // shape is checked before access
    let (status, _) = post(&app, "/api/v0/pool/news/write/plaintext", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        "/api/v0/pool/news/write/encrypted",
        json!({"ciphertext": "AAEC", "nonce": "AQ==", "tag": "Ag==", "writer_key": "writer-key"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, written) = post(
        &app,
        "/api/v0/pool/news/write/plaintext",
        json!({"text": "hi", "writer_key": "writer-key", "hide_date": true}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(written["index"], 1);
    assert!(written["created_at"].is_null());
}

#[tokio::test]
async fn test_update_and_delete_need_master_key() {
    let app = app().await;
    post(
        &app,
        "/api/v0/pool/new/wall",
        json!({"tag": "board", "public": true, "master_key": "master-key"}),
    )
    .await;
    post(&app, "/api/v0/pool/board/write/plaintext", json!({"text": "x"})).await;

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/v0/pool/board",
        &[],
        Some(json!({"master_key": "wrong-key", "description": "notes"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = send(
        &app,
        Method::PATCH,
        "/api/v0/pool/board",
        &[],
        Some(json!({"master_key": "master-key", "description": "notes", "new_master_key": "rotated"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], "notes");

    let (status, _) = send(&app, Method::DELETE, "/api/v0/pool/board", &[], None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::DELETE,
        "/api/v0/pool/board",
        &[(MASTER_KEY_HEADER, "master-key")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, deleted) = send(
        &app,
        Method::DELETE,
        "/api/v0/pool/board",
        &[(MASTER_KEY_HEADER, "rotated")],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["tag"], "board");

    let (status, _) = get(&app, "/api/v0/pool/board", &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signed_messages() {
    let app = app().await;

    let (status, signature) = post(
        &app,
        "/api/v0/signature/new",
        json!({"value": "alice", "key": "alice-key"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(signature.get("key_hash").is_none());
    let signature_id = signature["id"].as_str().unwrap().to_string();

    let (status, info) = get(&app, &format!("/api/v0/signature/{}", signature_id), &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["value"], "alice");

    post(
        &app,
        "/api/v0/pool/new/wall",
        json!({"tag": "signed", "public": true, "master_key": "master-key"}),
    )
    .await;

    let (status, _) = post(
        &app,
        "/api/v0/pool/signed/write/plaintext",
        json!({"text": "me", "signature": {"id": signature_id, "key": "not-alice"}}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, written) = post(
        &app,
        "/api/v0/pool/signed/write/plaintext",
        json!({"text": "me", "signature": {"id": signature_id, "key": "alice-key"}}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(written["signature"]["value"], "alice");

    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("/api/v0/signature/{}", signature_id),
        &[],
        Some(json!({"key": "alice-key", "value": "alice2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // signed messages show the signature as it is now
    let (_, page) = get(&app, "/api/v0/pool/signed/read?first=1", &[]).await;
    assert_eq!(page["messages"][0]["signature"]["value"], "alice2");

    let (status, _) = get(&app, "/api/v0/signature/zzzzz", &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_requests_get_json_errors() {
    let app = app().await;

    let (status, body) = post(&app, "/api/v0/pool/new/wall", json!({"tag": "lobby"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("master_key"));

    post(
        &app,
        "/api/v0/pool/new/wall",
        json!({"tag": "lobby", "public": true, "master_key": "master-key"}),
    )
    .await;

    let (status, body) = post(
        &app,
        "/api/v0/pool/lobby/write/encrypted",
        json!({"ciphertext": "not base64!", "nonce": "AQ==", "tag": "Ag=="}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!error_message(&body).is_empty());

    let (status, body) = get(&app, "/api/v0/pool/lobby/read?first=abc", &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!error_message(&body).is_empty());

    let (status, body) = get(&app, "/api/v0/pool/list?last=many", &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!error_message(&body).is_empty());
}

#[tokio::test]
async fn test_pagination_errors_and_modes() {
    let app = app().await;
    post(
        &app,
        "/api/v0/pool/new/wall",
        json!({"tag": "paged", "public": true, "master_key": "master-key"}),
    )
    .await;

    let (status, body) = get(&app, "/api/v0/pool/paged/read", &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_message(&body),
        "One of the following parameters must be specified (not both): `first`, `last`."
    );

    let (status, _) = get(&app, "/api/v0/pool/paged/read?first=0", &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let app = app_with(NodeSettings {
        pagination: PaginationMode::LimitOffset,
        ..Default::default()
    })
    .await;
    for i in 0..3 {
        post(
            &app,
            "/api/v0/pool/new/wall",
            json!({"tag": format!("w{}", i), "public": true, "master_key": "master-key"}),
        )
        .await;
    }

    let (status, list) = get(&app, "/api/v0/pool/list?limit=2&offset=1", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["count"], 2);
    assert_eq!(list["pools"][0]["tag"], "w1");

    let (status, body) = get(&app, "/api/v0/pool/list?offset=1", &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "`limit` must be specified.");
}

#[tokio::test]
async fn test_node_info_counts() {
    let app = app().await;
    post(
        &app,
        "/api/v0/pool/new/wall",
        json!({"master_key": "master-key"}),
    )
    .await;
    post(
        &app,
        "/api/v0/signature/new",
        json!({"value": "bob", "key": "bob-key"}),
    )
    .await;

    let (status, info) = get(&app, "/api/v0/node", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["name"], "evade-node");
    assert_eq!(info["pools_count"], 1);
    assert_eq!(info["signatures_count"], 1);
}
