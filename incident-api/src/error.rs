use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Report {0} has already been finalized")]
    AlreadyFinalized(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Analytics error: {0}")]
    Analytics(anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidAction(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyFinalized(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Analytics(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show to a client. Server-side failures are logged and
    /// replaced by a generic text.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error occurred".to_string()
            }
            AppError::Analytics(e) => {
                tracing::error!("Analytics error: {:?}", e);
                "Failed to generate analytics".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Collapses any failure raised while computing analytics into the
    /// generic analytics error.
    pub fn analytics(err: AppError) -> AppError {
        match err {
            AppError::Validation(_) => err,
            AppError::Database(e) => AppError::Analytics(e.into()),
            AppError::Internal(e) | AppError::Analytics(e) => AppError::Analytics(e),
            other => AppError::Analytics(anyhow::anyhow!(other.to_string())),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.public_message() }));
        (status, body).into_response()
    }
}

/// Error for server-rendered moderation pages: same status codes as
/// [`AppError`], plain-text body.
#[derive(Debug)]
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        PageError(err)
    }
}

impl From<sqlx::Error> for PageError {
    fn from(err: sqlx::Error) -> Self {
        PageError(AppError::Database(err))
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (self.0.status_code(), self.0.public_message()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            AppError::Validation("Missing fields: type".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidAction("delete".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("Report not found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::AlreadyFinalized("abc".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_details_are_hidden() {
        let err = AppError::Internal(anyhow::anyhow!("secret path /var/db"));
        assert_eq!(err.public_message(), "Internal server error");

        let err = AppError::analytics(AppError::Database(sqlx::Error::RowNotFound));
        assert_eq!(err.public_message(), "Failed to generate analytics");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_passes_through_analytics_boundary() {
        let err = AppError::analytics(AppError::Validation("days must be between 1 and 365".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
