use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    routing::get,
    Form, Router,
};
use serde::Deserialize;

use crate::api::reports::LanguageQuery;
use crate::error::{AppError, PageError};
use crate::models::ModerationAction;
use crate::services::ReportService;
use crate::views;
use crate::AppState;

type PageResult<T> = std::result::Result<T, PageError>;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/reports", get(list_reports))
        .route("/admin/reports/:id/view", get(view_report))
        .route(
            "/admin/reports/:id/finalize",
            get(finalize_form).post(finalize_report),
        )
}

#[derive(Debug, Deserialize)]
pub struct FinalizeForm {
    pub action: Option<String>,
    pub notes: Option<String>,
}

async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<LanguageQuery>,
) -> PageResult<Html<String>> {
    let language = query.language.as_deref().map(str::trim).filter(|l| !l.is_empty());

    let report_service = ReportService::new(state.db.clone());
    let reports = report_service.list_reports(language).await?;

    Ok(Html(views::report_list(&reports, language)))
}

async fn view_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> PageResult<Html<String>> {
    let report_service = ReportService::new(state.db.clone());
    let report = report_service.get_report(&id).await?;

    Ok(Html(views::report_detail(&report)))
}

async fn finalize_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> PageResult<Html<String>> {
    let report_service = ReportService::new(state.db.clone());
    let report = report_service.get_report(&id).await?;

    Ok(Html(views::finalize_form(&report)))
}

async fn finalize_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<FinalizeForm>,
) -> PageResult<Redirect> {
    let action: ModerationAction = form
        .action
        .as_deref()
        .ok_or_else(|| AppError::InvalidAction("missing action".to_string()))?
        .parse()?;

    let report_service = ReportService::new(state.db.clone());
    report_service
        .finalize_report(&id, action, form.notes.as_deref())
        .await?;

    Ok(Redirect::to(views::LIST_PATH))
}
