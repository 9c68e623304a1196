//! Database seed script for creating demo incident reports
//! Run with: cargo run --bin seed

use chrono::{Duration, Utc};
use incident_api::models::{ModerationAction, NewReport};
use incident_api::services::ReportService;
use incident_api::{Config, Database};

struct DemoReport {
    report_type: &'static str,
    description: &'static str,
    language: &'static str,
    location: Option<&'static str>,
    days_ago: i64,
    decision: Option<ModerationAction>,
}

const DEMO_REPORTS: &[DemoReport] = &[
    DemoReport {
        report_type: "harassment",
        description: "Verbal harassment near the main bus terminal.",
        language: "en",
        location: Some("Central bus terminal"),
        days_ago: 1,
        decision: None,
    },
    DemoReport {
        report_type: "discrimination",
        description: "Refused service at a pharmacy.",
        language: "en",
        location: None,
        days_ago: 3,
        decision: Some(ModerationAction::Approve),
    },
    DemoReport {
        report_type: "safety",
        description: "Éclairage public en panne dans la rue.",
        language: "fr",
        location: Some("Rue de la Gare"),
        days_ago: 3,
        decision: None,
    },
    DemoReport {
        report_type: "harassment",
        description: "Repeated unwanted messages from a neighbour.",
        language: "en",
        location: None,
        days_ago: 7,
        decision: Some(ModerationAction::Reject),
    },
    DemoReport {
        report_type: "other",
        description: "تم الإبلاغ عن حادث في السوق",
        language: "ar",
        location: Some("Old market"),
        days_ago: 12,
        decision: Some(ModerationAction::Approve),
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    println!("Connecting to database {}...", config.database.url);
    let db = Database::connect(&config.database).await?;
    db.run_migrations().await?;
    println!("Connected successfully!");

    let report_service = ReportService::new(db);
    let now = Utc::now();

    for demo in DEMO_REPORTS {
        let report = NewReport {
            report_type: demo.report_type.to_string(),
            description: demo.description.to_string(),
            language: demo.language.to_string(),
            location: demo.location.map(str::to_string),
        };

        let id = report_service
            .create_report_at(report, now - Duration::days(demo.days_ago))
            .await?;

        if let Some(action) = demo.decision {
            report_service
                .finalize_report(&id, action, Some("Seeded decision"))
                .await?;
        }

        println!("  {} [{}] {}", id, demo.language, demo.report_type);
    }

    println!("\n========================================");
    println!("Seeded {} demo reports", DEMO_REPORTS.len());
    println!("========================================");

    Ok(())
}
