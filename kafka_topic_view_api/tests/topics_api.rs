use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use kafka_topic_view::scheduler::Scheduler;
use kafka_topic_view::snapshot_store::SnapshotStore;
use kafka_topic_view::test_utils::FakeMetadataSource;
use kafka_topic_view_api::routes::router;
use kafka_topic_view_api::AppState;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app(store: Arc<SnapshotStore>, static_dir: &Path) -> Router {
    router(Arc::new(AppState::new(store, true)), static_dir)
}

async fn refreshed_store() -> Arc<SnapshotStore> {
    let source = FakeMetadataSource::new()
        .with_brokers([1, 2, 3])
        .with_broker_config(1, "min.insync.replicas", "2")
        .with_broker_config(1, "transaction.state.log.min.isr", "2")
        .with_partition("orders", 0, 1, &[1, 2, 3], &[1, 2, 3])
        .with_partition("orders", 1, 2, &[2, 3], &[2]);

    let store = Arc::new(SnapshotStore::new());
    Scheduler::new(source, store.clone(), Duration::from_secs(60))
        .run_once()
        .await
        .unwrap();
    store
}

async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

#[tokio::test]
async fn topics_returns_broker_indexed_snapshot() {
    let static_dir = tempfile::tempdir().unwrap();
    let app = app(refreshed_store().await, static_dir.path());

    let (status, body) = send(app, Method::GET, "/api/topics").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        json,
        json!({
            "brokers": {
                "1": {"partitions": [
                    {"topic": "orders", "partition": 0, "state": "online", "leader": true}
                ]},
                "2": {"partitions": [
                    {"topic": "orders", "partition": 0, "state": "online", "leader": false},
                    {"topic": "orders", "partition": 1, "state": "under-min-isr", "leader": true}
                ]},
                "3": {"partitions": [
                    {"topic": "orders", "partition": 0, "state": "online", "leader": false},
                    {"topic": "orders", "partition": 1, "state": "under-min-isr", "leader": false}
                ]}
            }
        })
    );
}

#[tokio::test]
async fn topics_body_is_pretty_printed() {
    let static_dir = tempfile::tempdir().unwrap();
    let app = app(refreshed_store().await, static_dir.path());

    let (_, body) = send(app, Method::GET, "/api/topics").await;
    let text = String::from_utf8(body).unwrap();

    assert!(text.starts_with("{\n    \"brokers\": {\n"), "{text}");
}

#[tokio::test]
async fn topics_before_first_refresh_is_empty() {
    let static_dir = tempfile::tempdir().unwrap();
    let app = app(Arc::new(SnapshotStore::new()), static_dir.path());

    let (status, body) = send(app, Method::GET, "/api/topics").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, json!({"brokers": {}}));
}

#[tokio::test]
async fn non_get_requests_are_not_implemented() {
    let static_dir = tempfile::tempdir().unwrap();
    let store = refreshed_store().await;

    for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
        let (status, _) = send(app(store.clone(), static_dir.path()), method, "/api/topics").await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    }
}

#[tokio::test]
async fn health_reports_refresh_state() {
    let static_dir = tempfile::tempdir().unwrap();

    let (status, body) = send(
        app(Arc::new(SnapshotStore::new()), static_dir.path()),
        Method::GET,
        "/api/health",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, json!({"status": "ok", "refreshed_at": null, "brokers": 0}));

    let (_, body) = send(
        app(refreshed_store().await, static_dir.path()),
        Method::GET,
        "/api/health",
    )
    .await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["brokers"], 3);
    assert!(json["refreshed_at"].is_string());
}

#[tokio::test]
async fn other_paths_are_served_from_static_dir() {
    let static_dir = tempfile::tempdir().unwrap();
    std::fs::write(static_dir.path().join("index.html"), "<h1>topics</h1>").unwrap();
    let store = Arc::new(SnapshotStore::new());

    let (status, body) = send(app(store.clone(), static_dir.path()), Method::GET, "/index.html").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<h1>topics</h1>");

    let (status, _) = send(app(store, static_dir.path()), Method::GET, "/missing.js").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn root_serves_bundled_web_ui() {
    let static_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("static");
    let store = Arc::new(SnapshotStore::new());

    let (status, body) = send(app(store.clone(), &static_dir), Method::GET, "/").await;
    assert_eq!(status, StatusCode::OK);
    let page = String::from_utf8(body).unwrap();
    assert!(page.contains(r#"<script src="kafka-topic-view.js"></script>"#), "{page}");

    let (status, body) = send(app(store, &static_dir), Method::GET, "/kafka-topic-view.js").await;
    assert_eq!(status, StatusCode::OK);
    let script = String::from_utf8(body).unwrap();
    assert!(script.contains("fetch('/api/topics')"));
}
