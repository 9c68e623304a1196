use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{CreateReportRequest, Report, ReportCreated, ReportStatusView};
use crate::services::ReportService;
use crate::AppState;

/// Submission and lookup, mounted under `/reports`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_report))
        .route("/:id", get(get_report))
}

/// JSON listing consumed by the dashboard, mounted under `/api`.
pub fn json_routes() -> Router<AppState> {
    Router::new().route("/reports", get(list_reports))
}

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    pub language: Option<String>,
}

async fn create_report(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ReportCreated>)> {
    // An absent or `null` body is reported as missing fields rather than a parse error.
    let request: CreateReportRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CreateReportRequest::default()
    } else {
        serde_json::from_slice::<Option<CreateReportRequest>>(&body)
            .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))?
            .unwrap_or_default()
    };

    let new_report = request.into_new_report()?;

    let report_service = ReportService::new(state.db.clone());
    let report_id = report_service.create_report(new_report).await?;

    Ok((StatusCode::CREATED, Json(ReportCreated { report_id })))
}

async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReportStatusView>> {
    let report_service = ReportService::new(state.db.clone());
    let report = report_service.get_report(&id).await?;

    Ok(Json(ReportStatusView::from(&report)))
}

async fn list_reports(
    State(state): State<AppState>,
    query: std::result::Result<Query<LanguageQuery>, QueryRejection>,
) -> Result<Json<Vec<Report>>> {
    let Query(query) = query?;
    let report_service = ReportService::new(state.db.clone());
    let reports = report_service.list_reports(query.language.as_deref()).await?;

    Ok(Json(reports))
}
