// Report service - submission, lookup and moderation of incident reports
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{ModerationAction, NewReport, Report, ReportStatus};

const REPORT_COLUMNS: &str =
    "id, timestamp, type, description, location, language, status, finalized, notes";

pub struct ReportService {
    db: Database,
}

impl ReportService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Persist a validated submission as a pending report and return its id.
    pub async fn create_report(&self, input: NewReport) -> Result<String> {
        self.create_report_at(input, Utc::now()).await
    }

    /// Same as [`ReportService::create_report`] with an explicit creation
    /// time. Used when backfilling demo data.
    pub async fn create_report_at(&self, input: NewReport, timestamp: DateTime<Utc>) -> Result<String> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO reports (id, timestamp, type, description, location, language, status, finalized)
            VALUES (?, ?, ?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(&id)
        .bind(timestamp)
        .bind(&input.report_type)
        .bind(&input.description)
        .bind(&input.location)
        .bind(&input.language)
        .bind(ReportStatus::Pending.as_str())
        .execute(&self.db.pool)
        .await?;

        tracing::info!(
            report_id = %id,
            report_type = %input.report_type,
            language = %input.language,
            "Report created"
        );

        Ok(id)
    }

    /// Get report by ID
    pub async fn get_report(&self, id: &str) -> Result<Report> {
        let query = format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = ?");

        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(&self.db.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Report not found".to_string()))
    }

    /// All reports newest-first, optionally restricted to one language.
    pub async fn list_reports(&self, language: Option<&str>) -> Result<Vec<Report>> {
        let reports = match language.map(str::trim).filter(|l| !l.is_empty()) {
            Some(language) => {
                let query = format!(
                    "SELECT {REPORT_COLUMNS} FROM reports WHERE language = ? ORDER BY timestamp DESC, rowid DESC"
                );
                sqlx::query_as::<_, Report>(&query)
                    .bind(language)
                    .fetch_all(&self.db.pool)
                    .await?
            }
            None => {
                let query = format!("SELECT {REPORT_COLUMNS} FROM reports ORDER BY timestamp DESC, rowid DESC");
                sqlx::query_as::<_, Report>(&query)
                    .fetch_all(&self.db.pool)
                    .await?
            }
        };

        Ok(reports)
    }

    /// Full snapshot in submission order, as read by the analytics engine.
    pub async fn snapshot(&self) -> Result<Vec<Report>> {
        let query = format!("SELECT {REPORT_COLUMNS} FROM reports ORDER BY timestamp ASC, rowid ASC");

        let reports = sqlx::query_as::<_, Report>(&query)
            .fetch_all(&self.db.pool)
            .await?;

        Ok(reports)
    }

    /// Record a moderation decision. A report can be finalized only once.
    pub async fn finalize_report(
        &self,
        id: &str,
        action: ModerationAction,
        notes: Option<&str>,
    ) -> Result<Report> {
        let status = action.resulting_status();
        let notes = notes.map(str::trim).filter(|n| !n.is_empty());

        let result = sqlx::query(
            r#"
            UPDATE reports
            SET status = ?, finalized = 1, notes = ?
            WHERE id = ? AND finalized = 0
            "#,
        )
        .bind(status.as_str())
        .bind(notes)
        .bind(id)
        .execute(&self.db.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish an unknown id from a report that was already decided.
            let existing = self.get_report(id).await?;
            tracing::warn!(
                report_id = %id,
                status = %existing.status,
                "Refusing to finalize an already finalized report"
            );
            return Err(AppError::AlreadyFinalized(id.to_string()));
        }

        tracing::info!(report_id = %id, status = %status, "Report finalized");

        self.get_report(id).await
    }
}
