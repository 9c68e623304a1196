mod common;

use axum::http::StatusCode;
use common::{build_test_context, request_json, submit_report};
use serde_json::json;

#[tokio::test]
async fn create_then_fetch_returns_same_id_and_pending_status() {
    let ctx = build_test_context().await;

    let id = submit_report(&ctx.app, "harassment", "en").await;
    let (status, body) = request_json(&ctx.app, "GET", &format!("/reports/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reportId"], id.as_str());
    assert_eq!(body["status"], "pending");
    // Minimal projection only
    assert!(body.get("description").is_none());
}

#[tokio::test]
async fn missing_fields_are_named_in_error() {
    let ctx = build_test_context().await;

    let (status, body) = request_json(
        &ctx.app,
        "POST",
        "/reports",
        Some(json!({ "description": "no type or language" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing fields: type, language");

    let (status, body) = request_json(
        &ctx.app,
        "POST",
        "/reports",
        Some(json!({ "type": "safety", "language": "en" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing fields: description");
}

#[tokio::test]
async fn empty_body_reports_every_required_field() {
    let ctx = build_test_context().await;

    let (status, body) = request_json(&ctx.app, "POST", "/reports", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing fields: type, description, language");
}

#[tokio::test]
async fn null_body_reports_every_required_field() {
    let ctx = build_test_context().await;

    let (status, body) = request_json(&ctx.app, "POST", "/reports", Some(json!(null))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing fields: type, description, language");
}

#[tokio::test]
async fn malformed_body_is_a_validation_error() {
    let ctx = build_test_context().await;

    let (status, body) = request_json(
        &ctx.app,
        "POST",
        "/reports",
        Some(json!({ "type": 42, "description": "x", "language": "en" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[tokio::test]
async fn unknown_report_is_not_found() {
    let ctx = build_test_context().await;

    let (status, body) = request_json(&ctx.app, "GET", "/reports/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Report not found");
}

#[tokio::test]
async fn location_is_persisted_and_listed() {
    let ctx = build_test_context().await;

    let (status, _) = request_json(
        &ctx.app,
        "POST",
        "/reports",
        Some(json!({
            "type": "safety",
            "description": "broken street light",
            "language": "en",
            "location": "Main street",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request_json(&ctx.app, "GET", "/api/reports", None).await;
    assert_eq!(status, StatusCode::OK);
    let reports = body.as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["location"], "Main street");
    assert_eq!(reports[0]["type"], "safety");
    assert_eq!(reports[0]["finalized"], false);
    assert!(reports[0]["notes"].is_null());
}

#[tokio::test]
async fn json_listing_is_newest_first_and_filters_by_language() {
    let ctx = build_test_context().await;

    let first = submit_report(&ctx.app, "safety", "en").await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = submit_report(&ctx.app, "other", "fr").await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let third = submit_report(&ctx.app, "harassment", "en").await;

    let (_, body) = request_json(&ctx.app, "GET", "/api/reports", None).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![third.as_str(), second.as_str(), first.as_str()]);

    let (_, body) = request_json(&ctx.app, "GET", "/api/reports?language=en", None).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![third.as_str(), first.as_str()]);
}
