// ABOUTME: End-to-end smoke test for the full steeple lifecycle on a SQLite file.
// ABOUTME: Tests config edits, admin publishing, backup export and restore, and persistence across reopen.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use http::Request;
use steeple_server::{AppState, create_router};
use steeple_store::{KvStore, Repository, SqliteStore};
use tower::ServiceExt;

/// Helper to create a test AppState over a SQLite file.
fn test_app_state(db: &std::path::Path) -> Arc<AppState> {
    let store: Arc<dyn KvStore> = Arc::new(SqliteStore::open(db).unwrap());
    let repo = Repository::new(store).with_latency(Duration::from_millis(1));
    Arc::new(AppState::new(repo, None, Duration::from_secs(1)))
}

/// Helper to extract JSON body from a response.
async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    if body.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(&body).unwrap()
}

async fn call(
    state: &Arc<AppState>,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (u16, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = create_router(Arc::clone(state)).oneshot(req).await.unwrap();
    let status = resp.status().as_u16();
    (status, json_body(resp).await)
}

#[tokio::test]
async fn smoke_test_full_lifecycle() {
    let dir = tempfile::TempDir::new().unwrap();
    let db = dir.path().join("steeple.db");
    let state = test_app_state(&db);

    // 1. A fresh site serves defaults.
    let (status, site) = call(&state, "GET", "/api/site", None).await;
    assert_eq!(status, 200);
    assert_eq!(site["churchName"], "Grace Community Church");

    // 2. The admin loads the workspace, edits, and publishes.
    let (_, mut ws) = call(&state, "GET", "/api/admin/workspace", None).await;
    ws["config"]["churchName"] = serde_json::json!("Test Church");
    ws["collections"]["jcbc_announcements"] = serde_json::json!([
        {"id": "a1", "title": "Picnic", "priority": "normal", "timestamp": 10},
        {"id": "a2", "title": "Storm closure", "priority": "urgent", "timestamp": 5}
    ]);
    let edit = serde_json::json!({"config": ws["config"], "collections": ws["collections"]});
    let (status, report) = call(&state, "POST", "/api/admin/publish", Some(edit)).await;
    assert_eq!(status, 200);
    assert_eq!(report["changed"].as_array().unwrap().len(), 2);

    let (_, announcements) = call(&state, "GET", "/api/announcements", None).await;
    assert_eq!(announcements[0]["id"], "a2");

    // 3. Export a backup, then damage the site.
    let (status, backup) = call(&state, "GET", "/api/backup", None).await;
    assert_eq!(status, 200);
    assert_eq!(backup["config"]["churchName"], "Test Church");

    let (status, _) = call(
        &state,
        "PUT",
        "/api/collections/jcbc_announcements",
        Some(serde_json::json!([])),
    )
    .await;
    assert_eq!(status, 204);
    let (status, _) = call(
        &state,
        "PUT",
        "/api/config",
        Some(serde_json::json!({"churchName": "Oops"})),
    )
    .await;
    assert_eq!(status, 204);

    // 4. Restoring the backup brings everything back.
    let (status, _) = call(&state, "POST", "/api/backup/restore", Some(backup.clone())).await;
    assert_eq!(status, 200);

    let (_, site) = call(&state, "GET", "/api/site", None).await;
    assert_eq!(site["churchName"], "Test Church");
    let (_, announcements) = call(&state, "GET", "/api/collections/jcbc_announcements", None).await;
    assert_eq!(announcements.as_array().unwrap().len(), 2);

    // 5. Everything survives reopening the database.
    drop(state);
    let reopened = test_app_state(&db);
    let (_, again) = call(&reopened, "GET", "/api/backup", None).await;
    assert_eq!(again["config"], backup["config"]);
    assert_eq!(again["data"], backup["data"]);
}

#[tokio::test]
async fn smoke_test_community_features() {
    let dir = tempfile::TempDir::new().unwrap();
    let state = test_app_state(&dir.path().join("steeple.db"));

    let (status, prayer) = call(
        &state,
        "POST",
        "/api/prayers",
        Some(serde_json::json!({"userId": "u1", "userName": "Ruth", "request": "Rain for the farms"})),
    )
    .await;
    assert_eq!(status, 201);

    let uri = format!("/api/prayers/{}/pray", prayer["id"].as_str().unwrap());
    let (_, prayed) = call(&state, "POST", &uri, None).await;
    assert_eq!(prayed["likes"], 1);

    let (status, _) = call(
        &state,
        "POST",
        "/api/chat",
        Some(serde_json::json!({"userId": "u1", "userName": "Ruth", "role": "member", "text": "Amen"})),
    )
    .await;
    assert_eq!(status, 201);

    let (_, chat) = call(&state, "GET", "/api/collections/jcbc_chat", None).await;
    assert_eq!(chat[0]["userRole"], "member");
}
