use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub report_type: String,
    pub description: String,
    pub location: Option<String>,
    pub language: String,
    #[sqlx(try_from = "String")]
    pub status: ReportStatus,
    pub finalized: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Approved => "approved",
            ReportStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReportStatus::Pending),
            "approved" => Ok(ReportStatus::Approved),
            "rejected" => Ok(ReportStatus::Rejected),
            other => Err(format!("unknown report status '{other}'")),
        }
    }
}

impl TryFrom<String> for ReportStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Decision recorded when a moderator finalizes a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Reject,
}

impl ModerationAction {
    pub fn resulting_status(&self) -> ReportStatus {
        match self {
            ModerationAction::Approve => ReportStatus::Approved,
            ModerationAction::Reject => ReportStatus::Rejected,
        }
    }
}

impl FromStr for ModerationAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "approve" => Ok(ModerationAction::Approve),
            "reject" => Ok(ModerationAction::Reject),
            other => Err(AppError::InvalidAction(format!(
                "'{other}' (expected 'approve' or 'reject')"
            ))),
        }
    }
}

/// Incoming submission body. Every field is optional at the wire level so
/// that all missing fields can be reported at once.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateReportRequest {
    #[serde(rename = "type")]
    #[validate(required)]
    pub report_type: Option<String>,
    #[validate(required)]
    pub description: Option<String>,
    #[validate(required)]
    pub language: Option<String>,
    pub location: Option<String>,
}

/// A submission that passed validation.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub report_type: String,
    pub description: String,
    pub language: String,
    pub location: Option<String>,
}

/// Required fields in reporting order, as (wire name, struct field).
const REQUIRED_FIELDS: [(&str, &str); 3] = [
    ("type", "report_type"),
    ("description", "description"),
    ("language", "language"),
];

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// Error keys follow the serde name when one is set, so both spellings are checked.
fn missing_from(errors: &ValidationErrors) -> Vec<&'static str> {
    let fields = errors.field_errors();
    REQUIRED_FIELDS
        .iter()
        .filter(|(wire, field)| fields.contains_key(*wire) || fields.contains_key(*field))
        .map(|(wire, _)| *wire)
        .collect()
}

impl CreateReportRequest {
    /// Trims every field; blank values become absent.
    pub fn normalized(self) -> Self {
        Self {
            report_type: trimmed(self.report_type),
            description: trimmed(self.description),
            language: trimmed(self.language),
            location: trimmed(self.location),
        }
    }

    /// Required fields that are absent or blank, in reporting order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        match self.clone().normalized().validate() {
            Ok(()) => Vec::new(),
            Err(errors) => missing_from(&errors),
        }
    }

    pub fn into_new_report(self) -> Result<NewReport, AppError> {
        let request = self.normalized();
        if let Err(errors) = request.validate() {
            return Err(AppError::Validation(format!(
                "Missing fields: {}",
                missing_from(&errors).join(", ")
            )));
        }

        match (request.report_type, request.description, request.language) {
            (Some(report_type), Some(description), Some(language)) => Ok(NewReport {
                report_type,
                description,
                language,
                location: request.location,
            }),
            _ => Err(AppError::Validation("Missing required fields".to_string())),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCreated {
    pub report_id: String,
}

/// Minimal projection returned by the public lookup endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStatusView {
    pub report_id: String,
    pub status: ReportStatus,
}

impl From<&Report> for ReportStatusView {
    fn from(report: &Report) -> Self {
        Self {
            report_id: report.id.clone(),
            status: report.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_are_listed_in_order() {
        let req = CreateReportRequest {
            report_type: None,
            description: Some("broken light".into()),
            language: Some("   ".into()),
            location: None,
        };
        assert_eq!(req.missing_fields(), vec!["type", "language"]);

        let err = req.into_new_report().unwrap_err();
        assert_eq!(err.to_string(), "Missing fields: type, language");
    }

    #[test]
    fn validate_trims_and_drops_blank_location() {
        let req = CreateReportRequest {
            report_type: Some(" harassment ".into()),
            description: Some("at the bus stop".into()),
            language: Some("en".into()),
            location: Some("".into()),
        };
        let new_report = req.into_new_report().unwrap();
        assert_eq!(new_report.report_type, "harassment");
        assert_eq!(new_report.location, None);
    }

    #[test]
    fn every_required_field_reported_for_empty_request() {
        let req = CreateReportRequest::default();
        assert!(req.validate().is_err());
        assert_eq!(req.missing_fields(), vec!["type", "description", "language"]);

        let complete = CreateReportRequest {
            report_type: Some("safety".into()),
            description: Some("no lights".into()),
            language: Some("fr".into()),
            location: Some("  Quai 3 ".into()),
        };
        assert!(complete.missing_fields().is_empty());
        assert_eq!(complete.into_new_report().unwrap().location.as_deref(), Some("Quai 3"));
    }

    #[test]
    fn moderation_action_parsing() {
        assert_eq!(
            "approve".parse::<ModerationAction>().unwrap().resulting_status(),
            ReportStatus::Approved
        );
        assert_eq!(
            "reject".parse::<ModerationAction>().unwrap().resulting_status(),
            ReportStatus::Rejected
        );
        assert!(matches!(
            "delete".parse::<ModerationAction>(),
            Err(AppError::InvalidAction(_))
        ));
        assert!("Approve".parse::<ModerationAction>().is_err());
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [ReportStatus::Pending, ReportStatus::Approved, ReportStatus::Rejected] {
            assert_eq!(status.as_str().parse::<ReportStatus>().unwrap(), status);
        }
        assert!(ReportStatus::try_from("archived".to_string()).is_err());
    }

    #[test]
    fn status_view_serializes_camel_case() {
        let view = ReportStatusView {
            report_id: "abc".into(),
            status: ReportStatus::Pending,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["reportId"], "abc");
        assert_eq!(json["status"], "pending");
    }
}
