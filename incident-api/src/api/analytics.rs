use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{AnalyticsSummary, CategoryReport, ComprehensiveReport, TrendsReport};
use crate::services::AnalyticsService;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/stats", get(get_stats))
        .route("/analytics/categories", get(get_categories))
        .route("/analytics/trends", get(get_trends))
        .route("/analytics/summary", get(get_summary))
}

#[derive(Debug, Deserialize)]
pub struct TrendsQuery {
    pub days: Option<i64>,
}

fn analytics_service(state: &AppState) -> AnalyticsService {
    AnalyticsService::new(state.db.clone(), state.config.analytics.default_trend_days)
}

async fn get_stats(State(state): State<AppState>) -> Result<Json<ComprehensiveReport>> {
    let report = analytics_service(&state)
        .comprehensive_report()
        .await
        .map_err(AppError::analytics)?;

    Ok(Json(report))
}

async fn get_categories(State(state): State<AppState>) -> Result<Json<CategoryReport>> {
    let report = analytics_service(&state)
        .category_report()
        .await
        .map_err(AppError::analytics)?;

    Ok(Json(report))
}

async fn get_trends(
    State(state): State<AppState>,
    query: std::result::Result<Query<TrendsQuery>, QueryRejection>,
) -> Result<Json<TrendsReport>> {
    let Query(query) = query?;
    let report = analytics_service(&state)
        .trends_report(query.days)
        .await
        .map_err(AppError::analytics)?;

    Ok(Json(report))
}

async fn get_summary(State(state): State<AppState>) -> Result<Json<AnalyticsSummary>> {
    let summary = analytics_service(&state)
        .summary()
        .await
        .map_err(AppError::analytics)?;

    Ok(Json(summary))
}
