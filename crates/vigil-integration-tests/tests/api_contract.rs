//! # Campaign 3: API Contract
//!
//! Tests the operator API's error surfaces over the assembled router —
//! validation (422), bad request (400), not found (404), conflict (409) —
//! plus response shapes and the served OpenAPI document.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

use vigil_api::state::{AppConfig, AppState};
use vigil_calendar::{HolidayCalendar, WorkingDayCalculator};
use vigil_core::{Clock, FixedClock};
use vigil_engine::{
    EnforcementConfig, MemoryStore, Notifier, NullNotifier, TimelineEnforcementService,
};
use vigil_monitor::{ComplianceMonitor, MonitorConfig};

/// Build a test app with auth disabled and the clock parked on Monday
/// 5 January 2026.
fn test_app() -> axum::Router {
    let clock = Arc::new(FixedClock::at(
        Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap(),
    ));
    let service = Arc::new(TimelineEnforcementService::new(
        Arc::new(MemoryStore::new()),
        Arc::new(NullNotifier) as Arc<dyn Notifier>,
        clock as Arc<dyn Clock>,
        WorkingDayCalculator::new(Arc::new(HolidayCalendar::netherlands())),
        EnforcementConfig::default(),
    ));
    let monitor = Arc::new(ComplianceMonitor::new(
        Arc::clone(&service),
        MonitorConfig::default(),
    ));
    vigil_api::app(AppState::new(service, monitor, AppConfig::default()))
}

/// Read response body as JSON Value.
async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// POST helper with JSON body.
fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// POST helper with no body.
fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// GET helper.
fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Register a case and return its id.
async fn register_case(app: &axum::Router) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/cases",
            json!({"trigger_date": "2026-01-05", "jurisdiction": "NL"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["case_id"]
        .as_str()
        .unwrap()
        .to_string()
}

// =========================================================================
// Error surfaces
// =========================================================================

#[tokio::test]
async fn unknown_case_returns_404_with_error_body() {
    let app = test_app();
    let missing = uuid::Uuid::new_v4();
    let response = app.oneshot(get(&format!("/v1/cases/{missing}"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let err = body_json(response).await;
    assert_eq!(err["error"]["code"], "NOT_FOUND");
    assert!(err["error"]["message"].as_str().unwrap().contains(&missing.to_string()));
}

#[tokio::test]
async fn duplicate_registration_returns_409() {
    let app = test_app();
    let case_id = register_case(&app).await;

    let response = app
        .oneshot(post_json(
            "/v1/cases",
            json!({"case_id": case_id, "trigger_date": "2026-01-05"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn blank_jurisdiction_returns_422() {
    let app = test_app();
    let response = app
        .oneshot(post_json(
            "/v1/cases",
            json!({"trigger_date": "2026-01-05", "jurisdiction": "   "}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn malformed_json_returns_400() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/cases")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn checking_a_closed_case_returns_409() {
    let app = test_app();
    let case_id = register_case(&app).await;

    let response = app
        .clone()
        .oneshot(post(&format!("/v1/cases/{case_id}/close")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(post(&format!("/v1/cases/{case_id}/check")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn scheduler_stop_before_start_returns_409() {
    let app = test_app();
    let response = app.oneshot(post("/v1/scheduler/stop")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"]["code"], "CONFLICT");
}

// =========================================================================
// Response shapes
// =========================================================================

#[tokio::test]
async fn assessment_shape_carries_the_full_countdown_context() {
    let app = test_app();
    let case_id = register_case(&app).await;

    let response = app.oneshot(get(&format!("/v1/cases/{case_id}"))).await.unwrap();
    let case = body_json(response).await;

    assert_eq!(case["trigger_date"], "2026-01-05");
    assert_eq!(case["deadline"], "2026-01-13");
    assert_eq!(case["required_working_days"], 6);
    assert_eq!(case["status"], "pending");
    assert_eq!(case["days_remaining"], 8);
    assert_eq!(case["emergency_protocol_active"], false);
    assert_eq!(case["jurisdiction"], "NL");
    assert!(case["registered_at"].is_string());
    assert!(case["closed_at"].is_null());
}

#[tokio::test]
async fn alert_shape_names_tier_audience_and_actions() {
    let app = test_app();
    let case_id = register_case(&app).await;

    let response = app
        .oneshot(get(&format!("/v1/cases/{case_id}/alerts")))
        .await
        .unwrap();
    let alerts = body_json(response).await;
    let alert = &alerts.as_array().unwrap()[0];

    assert_eq!(alert["status"], "pending");
    assert_eq!(alert["notify"], json!(["family", "funeral_director"]));
    assert!(!alert["actions"].as_array().unwrap().is_empty());
    assert!(alert["hours_remaining"].as_i64().unwrap() > 0);
    assert!(alert["message"].as_str().unwrap().len() > 10);
}

// =========================================================================
// OpenAPI document
// =========================================================================

#[tokio::test]
async fn openapi_document_matches_the_mounted_routes() {
    let app = test_app();
    let response = app.oneshot(get("/v1/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let spec = body_json(response).await;
    let paths = spec["paths"].as_object().unwrap();
    for expected in [
        "/v1/cases",
        "/v1/cases/{id}",
        "/v1/cases/{id}/check",
        "/v1/cases/{id}/alerts",
        "/v1/cases/{id}/timeline",
        "/v1/cases/{id}/close",
        "/v1/scheduler",
        "/v1/scheduler/start",
        "/v1/scheduler/stop",
    ] {
        assert!(paths.contains_key(expected), "missing path {expected}");
    }
    assert!(spec["components"]["schemas"]["ErrorBody"].is_object());
}
