#![cfg(feature = "http_api")]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use resource_schedule::{
    InMemoryAllocationStore, ResourceAllocation, ScheduleReport, SchedulingConfig, http_api,
};
use serde_json::json;
use tower::util::ServiceExt;

fn new_router() -> axum::Router {
    let store = Arc::new(InMemoryAllocationStore::new());
    let state = http_api::AppState::new(store, SchedulingConfig::default());
    http_api::router(state)
}

fn post_json(uri: &str, payload: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn allocation_lifecycle_via_http_api() {
    let app = new_router();
    let payload = json!({
        "resource_id": "R1",
        "resource_name": "Dana Ruiz",
        "resource_type": "employee",
        "project_id": "P1",
        "allocation_start": "2025-06-01",
        "allocation_end": "2025-06-05",
        "hours_per_day": 8.0
    });

    let response = app.clone().oneshot(post_json("/allocations", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let created: ResourceAllocation = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(created.resource_name, "Dana Ruiz");

    let response = app
        .clone()
        .oneshot(get(&format!("/allocations/{}", created.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let status = json!({ "status": "cancelled" });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/allocations/{}/status", created.id))
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&status).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], json!("cancelled"));

    // Cancelled allocations cannot be revived.
    let revive = json!({ "status": "scheduled" });
    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/allocations/{}/status", created.id))
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&revive).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["error"], json!("conflict"));
}

#[tokio::test]
async fn unknown_allocation_returns_not_found() {
    let app = new_router();
    let response = app.oneshot(get("/allocations/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], json!("not_found"));
}

#[tokio::test]
async fn invalid_allocation_returns_bad_request() {
    let app = new_router();
    let payload = json!({
        "resource_id": "R1",
        "resource_type": "employee",
        "allocation_start": "2025-06-01",
        "allocation_end": "2025-06-05",
        "hours_per_day": 30.0
    });
    let response = app.oneshot(post_json("/allocations", &payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], json!("invalid_request"));
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("hours_per_day")
    );
}

#[tokio::test]
async fn report_shows_utilization_and_conflicts() {
    let app = new_router();
    for (project, start, end) in [
        ("P1", "2025-06-01", "2025-06-05"),
        ("P2", "2025-06-04", "2025-06-06"),
    ] {
        let payload = json!({
            "resource_id": "R1",
            "resource_type": "employee",
            "project_id": project,
            "allocation_start": start,
            "allocation_end": end,
            "hours_per_day": 8.0
        });
        let response = app.clone().oneshot(post_json("/allocations", &payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.oneshot(get("/report?project_id=P1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let report: ScheduleReport = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(report.resources.len(), 1);
    assert_eq!(report.resources[0].total_hours, 40.0);
    assert_eq!(report.resources[0].utilization_percent, 25.0);
    assert!(report.resources[0].conflicts.is_empty());
}

#[tokio::test]
async fn week_endpoint_returns_window_and_neighbours() {
    let app = new_router();
    let response = app.oneshot(get("/week?date=2025-06-04")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["window"]["start"], json!("2025-06-01"));
    assert_eq!(body["window"]["end"], json!("2025-06-07"));
    assert_eq!(body["days"].as_array().map(Vec::len), Some(7));
    assert_eq!(body["previous"], json!("2025-05-28"));
    assert_eq!(body["next"], json!("2025-06-11"));
}

#[tokio::test]
async fn week_endpoint_rejects_dates_at_the_calendar_edge() {
    let app = new_router();
    let response = app.oneshot(get("/week?date=%2B262142-12-31")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], json!("invalid_request"));
}
