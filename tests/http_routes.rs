use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use mongo_balancer::{
    app::build_router,
    config::{AppConfig, StoreBackend},
    memory::MemoryCluster,
    registry::NodeRegistry,
    state::AppState,
};
use serde_json::Value;
use tower::ServiceExt;

const PROXY_URI: &str = "mongodb://nginx:27017/";
const NODE_NAMES: [&str; 3] = ["mongo1", "mongo2", "mongo3"];

fn endpoint(name: &str) -> String {
    format!("mongodb://{name}:27017/")
}

fn app_with_cluster() -> (axum::Router, Arc<MemoryCluster>) {
    let registry = NodeRegistry::default_nodes();
    let cluster = Arc::new(MemoryCluster::for_registry(&registry).with_proxy_alias(PROXY_URI));

    let config = AppConfig {
        host: "0.0.0.0".to_string(),
        port: 5000,
        proxy_uri: PROXY_URI.to_string(),
        store_backend: StoreBackend::Memory,
    };

    let state = AppState::new(config, registry, cluster.clone());
    (build_router(state), cluster)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("response expected");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should be readable");

    if body.is_empty() {
        return (status, Value::Null);
    }

    let json = serde_json::from_slice::<Value>(&body).expect("body should be valid JSON");
    (status, json)
}

async fn get_text(app: &axum::Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("response expected");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should be readable");

    (status, String::from_utf8(body.to_vec()).expect("body should be UTF-8"))
}

fn node_count(stats: &Value, name: &str) -> u64 {
    stats["stats_por_host"][name]
        .as_u64()
        .unwrap_or_else(|| panic!("{name} should have a numeric count, got {stats}"))
}

#[tokio::test]
async fn index_returns_descriptive_text() {
    let (app, _cluster) = app_with_cluster();

    let (status, body) = get_text(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("MongoDB"));
    assert!(body.contains("balanceo"));
}

#[tokio::test]
async fn status_reports_connection_through_proxy() {
    let (app, _cluster) = app_with_cluster();

    let (status, body) = get(&app, "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mongo_uri"], PROXY_URI);
    assert!(!body["status"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn status_returns_500_when_proxy_is_down() {
    let (app, cluster) = app_with_cluster();
    cluster.set_down(PROXY_URI).await;

    let (status, body) = get(&app, "/status").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "Error");
    assert!(!body["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn request_routes_to_a_configured_node() {
    let (app, _cluster) = app_with_cluster();

    let (status, body) = get(&app, "/request").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Petición registrada");

    let node = body["mongo_node"].as_str().unwrap();
    assert!(NODE_NAMES.contains(&node), "unexpected node {node}");
    assert!(!body["inserted_id"].as_str().unwrap().is_empty());
    assert!(!body["mongo_host"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn request_returns_500_when_every_node_is_down() {
    let (app, cluster) = app_with_cluster();
    for name in NODE_NAMES {
        cluster.set_down(&endpoint(name)).await;
    }

    let (status, body) = get(&app, "/request").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "Error");
    assert!(!body["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn stats_total_equals_sum_of_node_counts() {
    let (app, _cluster) = app_with_cluster();

    for _ in 0..7 {
        let (status, _) = get(&app, "/request").await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, stats) = get(&app, "/stats").await;

    assert_eq!(status, StatusCode::OK);
    let sum: u64 = NODE_NAMES.iter().map(|name| node_count(&stats, name)).sum();
    assert_eq!(sum, 7);
    assert_eq!(stats["total_peticiones"], 7);
}

#[tokio::test]
async fn stats_isolates_a_down_node() {
    let (app, cluster) = app_with_cluster();

    for _ in 0..5 {
        let (status, _) = get(&app, "/request").await;
        assert_eq!(status, StatusCode::OK);
    }

    cluster.set_down(&endpoint("mongo2")).await;

    let (status, stats) = get(&app, "/stats").await;

    // Per-node failure never turns the aggregate into an error response.
    assert_eq!(status, StatusCode::OK);

    let failed = stats["stats_por_host"]["mongo2"].as_str().unwrap();
    assert!(failed.starts_with("Error: "), "got {failed}");

    let partial = node_count(&stats, "mongo1") + node_count(&stats, "mongo3");
    assert_eq!(stats["total_peticiones"].as_u64().unwrap(), partial);
}

#[tokio::test]
async fn repeated_stats_without_writes_are_identical() {
    let (app, _cluster) = app_with_cluster();

    for _ in 0..4 {
        let (status, _) = get(&app, "/request").await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, first) = get(&app, "/stats").await;
    let (_, second) = get(&app, "/stats").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn request_increments_exactly_the_routed_node() {
    let (app, _cluster) = app_with_cluster();

    for _ in 0..3 {
        let (status, _) = get(&app, "/request").await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, before) = get(&app, "/stats").await;

    let (status, routed) = get(&app, "/request").await;
    assert_eq!(status, StatusCode::OK);
    let routed_node = routed["mongo_node"].as_str().unwrap().to_string();

    let (_, after) = get(&app, "/stats").await;

    assert_eq!(
        after["total_peticiones"].as_u64().unwrap(),
        before["total_peticiones"].as_u64().unwrap() + 1
    );
    for name in NODE_NAMES {
        let expected = node_count(&before, name) + u64::from(name == routed_node);
        assert_eq!(node_count(&after, name), expected, "count mismatch for {name}");
    }
}

#[tokio::test]
async fn recovered_node_serves_stats_again() {
    let (app, cluster) = app_with_cluster();
    let mongo3 = endpoint("mongo3");

    cluster.set_down(&mongo3).await;
    let (_, degraded) = get(&app, "/stats").await;
    assert!(degraded["stats_por_host"]["mongo3"].is_string());

    cluster.set_up(&mongo3).await;
    let (_, healthy) = get(&app, "/stats").await;
    assert_eq!(healthy["stats_por_host"]["mongo3"], 0);
}
