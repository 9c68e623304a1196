pub mod analytics_service;
pub mod charts;
mod report_service;

pub use analytics_service::AnalyticsService;
pub use report_service::ReportService;
