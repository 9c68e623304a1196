#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use incident_api::{app, AppState, Config, Database};
use serde_json::{json, Value};
use tower::util::ServiceExt;

pub struct TestContext {
    pub state: AppState,
    pub app: Router,
}

pub async fn build_test_context() -> TestContext {
    let config = Config::in_memory();
    let db = Database::connect(&config.database)
        .await
        .expect("in-memory database should open");
    db.run_migrations().await.expect("migrations should run");

    let state = AppState { db, config };
    let app = app::build_router(state.clone());

    TestContext { state, app }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let resp = app
        .clone()
        .oneshot(req)
        .await
        .expect("router should respond");
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    (status, headers, bytes.to_vec())
}

pub async fn request_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let req_body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    let req = builder.body(req_body).expect("request should build");

    let (status, _, bytes) = send(app, req).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

pub async fn request_page(app: &Router, uri: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    let (status, _, bytes) = send(app, req).await;
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

/// Submit a url-encoded form; returns status, `Location` header and body text.
pub async fn post_form(app: &Router, uri: &str, form: &str) -> (StatusCode, Option<String>, String) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .expect("request should build");
    let (status, headers, bytes) = send(app, req).await;
    let location = headers
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    (status, location, String::from_utf8_lossy(&bytes).into_owned())
}

/// Create a report through the public API and return its id.
pub async fn submit_report(app: &Router, report_type: &str, language: &str) -> String {
    let (status, body) = request_json(
        app,
        "POST",
        "/reports",
        Some(json!({
            "type": report_type,
            "description": format!("{report_type} incident"),
            "language": language,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    body["reportId"]
        .as_str()
        .expect("reportId should be a string")
        .to_string()
}
