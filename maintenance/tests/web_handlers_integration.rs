// Integration tests for web API handlers
mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Duration;
use common::fixtures::*;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
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
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn future_body(items: Vec<Value>) -> Value {
    request_body(
        &timestamp_in(Duration::hours(1)),
        &timestamp_in(Duration::hours(2)),
        items,
    )
}

#[tokio::test]
async fn test_list_is_empty_initially() {
    let harness = TestHarness::new().await;
    let app = harness.router();

    let (status, body) = send(&app, "GET", "/api/maintenance", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_returns_window_id() {
    let harness = TestHarness::new().await;
    let app = harness.router();
    let payload = future_body(vec![
        json!(switches::SWITCH_1),
        vlan_item(interfaces::SWITCH_3_PORT_3, 241),
    ]);

    let (status, body) = send(&app, "POST", "/api/maintenance", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["mw_id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", &format!("/api/maintenance/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!(id));
    assert_eq!(body["start"], payload["start"]);
    assert_eq!(body["end"], payload["end"]);
    assert_eq!(body["items"], payload["items"]);
    assert_eq!(body["status"], json!("pending"));
}

#[tokio::test]
async fn test_create_rejects_unknown_items() {
    let harness = TestHarness::new().await;
    let app = harness.router();

    let (status, body) = send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_body(vec![json!(switches::UNKNOWN)])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!(messages::INVALID_ITEMS));
}

#[tokio::test]
async fn test_create_rejects_start_in_past() {
    let harness = TestHarness::new().await;
    let app = harness.router();
    let payload = request_body(
        &timestamp_in(-Duration::hours(1)),
        &timestamp_in(Duration::hours(1)),
        vec![json!(switches::SWITCH_1)],
    );

    let (status, body) = send(&app, "POST", "/api/maintenance", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!(messages::START_IN_PAST));
}

#[tokio::test]
async fn test_create_rejects_end_before_start() {
    let harness = TestHarness::new().await;
    let app = harness.router();
    let payload = request_body(
        &timestamp_in(Duration::hours(2)),
        &timestamp_in(Duration::hours(1)),
        vec![json!(switches::SWITCH_1)],
    );

    let (status, body) = send(&app, "POST", "/api/maintenance", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!(messages::END_BEFORE_START));
}

#[tokio::test]
async fn test_create_rejects_malformed_bodies() {
    let harness = TestHarness::new().await;
    let app = harness.router();

    // Missing end
    let (status, _) = send(
        &app,
        "POST",
        "/api/maintenance",
        Some(json!({"start": timestamp_in(Duration::hours(1)), "items": [switches::SWITCH_1]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Not JSON at all
    let request = Request::builder()
        .method("POST")
        .uri("/api/maintenance")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "GET", "/api/maintenance", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_list_returns_every_window() {
    let harness = TestHarness::new().await;
    let app = harness.router();

    let (_, first) = send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_body(vec![json!(switches::SWITCH_1)])),
    )
    .await;
    let (_, second) = send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_body(vec![json!(interfaces::SWITCH_1_PORT_2)])),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/maintenance", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["id"], first["mw_id"]);
    assert_eq!(listed[1]["id"], second["mw_id"]);
    assert_eq!(listed[1]["items"], json!([interfaces::SWITCH_1_PORT_2]));
}

#[tokio::test]
async fn test_unknown_id_returns_404() {
    let harness = TestHarness::new().await;
    let app = harness.router();
    let expected = json!({"response": "Maintenance with id 2345 not found"});

    let (status, body) = send(&app, "GET", "/api/maintenance/2345", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, expected);

    let (status, body) = send(&app, "DELETE", "/api/maintenance/2345", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, expected);

    let (status, _) = send(&app, "PATCH", "/api/maintenance/2345/end", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_window() {
    let harness = TestHarness::new().await;
    let app = harness.router();

    let (_, created) = send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_body(vec![json!(switches::SWITCH_2)])),
    )
    .await;
    let id = created["mw_id"].as_str().unwrap();

    let (status, body) = send(&app, "DELETE", &format!("/api/maintenance/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"response": format!("Maintenance with id {} successfully removed", id)})
    );

    let (status, _) = send(&app, "GET", &format!("/api/maintenance/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_window() {
    let harness = TestHarness::new().await;
    let app = harness.router();

    let (_, created) = send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_body(vec![json!(switches::SWITCH_1)])),
    )
    .await;
    let id = created["mw_id"].as_str().unwrap();
    let uri = format!("/api/maintenance/{}", id);

    let new_end = timestamp_in(Duration::hours(6));
    let (status, _) = send(&app, "PATCH", &uri, Some(json!({"end": new_end}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(body["end"], json!(new_end));

    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(json!({"start": timestamp_in(-Duration::hours(1))})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!(messages::START_IN_PAST));
}

#[tokio::test]
async fn test_end_window() {
    let harness = TestHarness::new().await;
    let app = harness.router();

    let (_, created) = send(
        &app,
        "POST",
        "/api/maintenance",
        Some(future_body(vec![json!(switches::SWITCH_3)])),
    )
    .await;
    let id = created["mw_id"].as_str().unwrap().to_string();
    let end_uri = format!("/api/maintenance/{}/end", id);

    // Still pending
    let (status, _) = send(&app, "PATCH", &end_uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    harness.scheduler.tick(at(Duration::minutes(90))).await;

    let (status, body) = send(&app, "PATCH", &end_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"response": format!("Maintenance window {} finished.", id)})
    );

    let (_, body) = send(&app, "GET", &format!("/api/maintenance/{}", id), None).await;
    assert_eq!(body["status"], json!("finished"));
}
