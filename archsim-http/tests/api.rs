//! Endpoint tests driven through the router with oneshot requests

use archsim_http::router;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn simple_architecture(rps: i64) -> Value {
    json!({
        "nodes": [
            {"id": "c", "type": "client", "data": {"label": "Client", "nodeType": "client", "config": {}}},
            {"id": "a", "type": "api_server", "data": {"label": "API", "nodeType": "api_server",
                "config": {"capacityRPS": 2000, "latencyMS": 20, "instanceType": "t3.medium"}}}
        ],
        "edges": [{"id": "e", "source": "c", "target": "a"}],
        "workload": {"rps": rps, "durationSeconds": 5, "mode": "constant", "seed": 9}
    })
}

#[tokio::test]
async fn run_returns_a_result_document() {
    let (status, body) = post_json("/api/simulation/run", simple_architecture(1000)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["metrics"]["totalRequests"], json!(5000));
    assert_eq!(body["metrics"]["failedRequests"], json!(0));
    assert_eq!(body["metrics"]["latency"]["p50"], json!(20.0));
    assert_eq!(body["timeSeries"].as_array().unwrap().len(), 5);
    assert_eq!(body["metrics"]["autoscalingEvents"], json!([]));
}

#[tokio::test]
async fn run_rejects_empty_nodes() {
    let body = json!({
        "nodes": [],
        "edges": [],
        "workload": {"rps": 100, "durationSeconds": 5}
    });
    let (status, body) = post_json("/api/simulation/run", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("No nodes provided"));
}

#[tokio::test]
async fn run_rejects_non_positive_rps() {
    let (status, body) = post_json("/api/simulation/run", simple_architecture(0)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("RPS must be greater than 0"));
}

#[tokio::test]
async fn run_applies_duration_default() {
    let mut body = simple_architecture(1000);
    body["workload"]["durationSeconds"] = json!(0);

    let (status, body) = post_json("/api/simulation/run", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timeSeries"].as_array().unwrap().len(), 30);
}

#[tokio::test]
async fn estimate_cost_reports_breakdown_and_counts() {
    let (status, body) =
        post_json("/api/simulation/estimate-cost", simple_architecture(1000)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodeCount"], json!(2));
    assert_eq!(body["edgeCount"], json!(1));
    // t3.medium at $0.0416/hr over 730 hours
    let compute = body["breakdown"]["compute"].as_f64().unwrap();
    assert!((compute - 0.0416 * 730.0).abs() < 0.01);
    assert!(body["componentCosts"]["api_server"].as_f64().unwrap() > 0.0);
    assert_eq!(body["componentCosts"]["client"], json!(0.0));
}

#[tokio::test]
async fn estimate_cost_accepts_zero_rps() {
    let (status, _) = post_json("/api/simulation/estimate-cost", simple_architecture(0)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn presets_lists_the_six_templates() {
    let request = Request::builder()
        .method("GET")
        .uri("/api/simulation/presets")
        .body(Body::empty())
        .unwrap();
    let response = router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    let presets = body["presets"].as_array().unwrap();
    assert_eq!(presets.len(), 6);
    assert_eq!(presets[0]["id"], json!("low-traffic"));
    assert!(presets.iter().any(|p| p["workload"]["mode"] == json!("spike")));
}
