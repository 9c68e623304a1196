// Analytics service - statistics and charts over the full report snapshot
use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{
    AnalyticsSummary, CategoryReport, CategoryStats, ComprehensiveReport, LanguageStats,
    OrderedCounts, Report, ReportStatus, StatusStats, TrendsReport,
};
use crate::services::charts::{self, StackedSeries, CHART_FORMAT};
use crate::services::ReportService;

pub const MAX_TREND_DAYS: i64 = 365;

const CATEGORY_CHART_TITLE: &str = "Distribution of Incident Reports by Category";

/// Value counts in descending order; ties keep first-encountered order.
#[derive(Debug, Clone, PartialEq)]
pub struct Tally {
    entries: Vec<(String, u64)>,
    total: u64,
}

impl Tally {
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut entries: Vec<(String, u64)> = Vec::new();
        let mut positions: HashMap<&'a str, usize> = HashMap::new();
        let mut total = 0;

        for value in values {
            total += 1;
            match positions.get(value) {
                Some(&index) => entries[index].1 += 1,
                None => {
                    positions.insert(value, entries.len());
                    entries.push((value.to_string(), 1));
                }
            }
        }

        // Stable sort keeps first-seen order among equal counts.
        entries.sort_by(|a, b| b.1.cmp(&a.1));

        Self { entries, total }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    pub fn most_common(&self) -> Option<String> {
        self.entries.first().map(|(key, _)| key.clone())
    }

    pub fn counts(&self) -> OrderedCounts<u64> {
        OrderedCounts(self.entries.clone())
    }

    pub fn percentages(&self) -> OrderedCounts<f64> {
        OrderedCounts(
            self.entries
                .iter()
                .map(|(key, count)| (key.clone(), percentage(*count, self.total)))
                .collect(),
        )
    }

    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }
}

/// `part / total` as a percentage rounded to two decimals.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 100.0 * 100.0).round() / 100.0
}

pub fn category_stats(reports: &[Report]) -> CategoryStats {
    let tally = Tally::from_values(reports.iter().map(|r| r.report_type.as_str()));
    CategoryStats {
        total_reports: tally.total(),
        category_counts: tally.counts(),
        category_percentages: tally.percentages(),
        most_common_category: tally.most_common(),
        unique_categories: tally.distinct(),
    }
}

pub fn language_stats(reports: &[Report]) -> LanguageStats {
    let tally = Tally::from_values(reports.iter().map(|r| r.language.as_str()));
    LanguageStats {
        total_reports: tally.total(),
        language_counts: tally.counts(),
        language_percentages: tally.percentages(),
        most_common_language: tally.most_common(),
        unique_languages: tally.distinct(),
    }
}

pub fn status_stats(reports: &[Report]) -> StatusStats {
    let tally = Tally::from_values(reports.iter().map(|r| r.status.as_str()));
    StatusStats {
        total_reports: tally.total(),
        status_counts: tally.counts(),
        status_percentages: tally.percentages(),
        finalized_count: reports.iter().filter(|r| r.finalized).count() as u64,
        pending_count: count_status(reports, ReportStatus::Pending),
    }
}

fn count_status(reports: &[Report], status: ReportStatus) -> u64 {
    reports.iter().filter(|r| r.status == status).count() as u64
}

pub fn summary(reports: &[Report]) -> AnalyticsSummary {
    let categories = Tally::from_values(reports.iter().map(|r| r.report_type.as_str()));
    AnalyticsSummary {
        total_reports: reports.len() as u64,
        unique_categories: categories.distinct(),
        pending_reports: count_status(reports, ReportStatus::Pending),
        finalized_reports: reports.iter().filter(|r| r.finalized).count() as u64,
        approved_reports: count_status(reports, ReportStatus::Approved),
        rejected_reports: count_status(reports, ReportStatus::Rejected),
        most_common_category: categories.most_common(),
    }
}

/// Reports created within the last `days` days before `now`.
pub fn within_window(reports: &[Report], now: DateTime<Utc>, days: i64) -> Vec<&Report> {
    let cutoff = now - Duration::days(days);
    reports.iter().filter(|r| r.timestamp >= cutoff).collect()
}

/// Reports per UTC calendar date, in date order.
pub fn daily_counts(reports: &[&Report]) -> Vec<(NaiveDate, u64)> {
    let mut counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for report in reports {
        *counts.entry(report.timestamp.date_naive()).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// Reports per (date, type), categories sorted by name, absent pairs as zero.
pub fn daily_category_counts(reports: &[&Report]) -> StackedSeries {
    let dates: Vec<NaiveDate> = reports
        .iter()
        .map(|r| r.timestamp.date_naive())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let day_index: HashMap<NaiveDate, usize> =
        dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

    let mut by_category: BTreeMap<&str, Vec<u64>> = BTreeMap::new();
    for report in reports {
        let row = by_category
            .entry(report.report_type.as_str())
            .or_insert_with(|| vec![0; dates.len()]);
        row[day_index[&report.timestamp.date_naive()]] += 1;
    }

    StackedSeries {
        dates,
        categories: by_category
            .into_iter()
            .map(|(category, counts)| (category.to_string(), counts))
            .collect(),
    }
}

pub fn category_chart(stats: &CategoryStats) -> anyhow::Result<Option<String>> {
    if stats.category_counts.is_empty() {
        return Ok(None);
    }
    charts::pie_chart(CATEGORY_CHART_TITLE, &stats.category_counts.0).map(Some)
}

pub fn trends_chart(reports: &[Report], now: DateTime<Utc>, days: i64) -> anyhow::Result<Option<String>> {
    let window = within_window(reports, now, days);
    if window.is_empty() {
        return Ok(None);
    }
    let title = format!("Daily Report Trends (Last {days} days)");
    charts::line_chart(&title, &daily_counts(&window)).map(Some)
}

pub fn category_trends_chart(
    reports: &[Report],
    now: DateTime<Utc>,
    days: i64,
) -> anyhow::Result<Option<String>> {
    let window = within_window(reports, now, days);
    if window.is_empty() {
        return Ok(None);
    }
    let title = format!("Report Categories by Day (Last {days} days)");
    charts::stacked_bar_chart(&title, &daily_category_counts(&window)).map(Some)
}

/// Runs chart rendering on the blocking pool and waits for it.
async fn render<T, F>(job: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    let rendered = tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| anyhow::anyhow!("chart rendering task failed: {e}"))??;
    Ok(rendered)
}

pub struct AnalyticsService {
    reports: ReportService,
    default_days: i64,
}

impl AnalyticsService {
    pub fn new(db: Database, default_days: i64) -> Self {
        Self {
            reports: ReportService::new(db),
            default_days,
        }
    }

    /// Resolve the requested trend window, falling back to the configured default.
    pub fn resolve_days(&self, days: Option<i64>) -> Result<i64> {
        let days = days.unwrap_or(self.default_days);
        if !(1..=MAX_TREND_DAYS).contains(&days) {
            return Err(AppError::Validation(format!(
                "days must be between 1 and {MAX_TREND_DAYS}"
            )));
        }
        Ok(days)
    }

    pub async fn summary(&self) -> Result<AnalyticsSummary> {
        let snapshot = self.reports.snapshot().await?;
        Ok(summary(&snapshot))
    }

    pub async fn category_report(&self) -> Result<CategoryReport> {
        let snapshot = self.reports.snapshot().await?;
        let category_stats = category_stats(&snapshot);

        let stats = category_stats.clone();
        let category_chart = render(move || category_chart(&stats)).await?;

        Ok(CategoryReport {
            category_stats,
            category_chart,
            chart_format: CHART_FORMAT,
        })
    }

    pub async fn trends_report(&self, days: Option<i64>) -> Result<TrendsReport> {
        let days = self.resolve_days(days)?;
        let snapshot = self.reports.snapshot().await?;
        let now = Utc::now();

        let (trends_chart, category_trends_chart) = render(move || {
            Ok((
                trends_chart(&snapshot, now, days)?,
                category_trends_chart(&snapshot, now, days)?,
            ))
        })
        .await?;

        Ok(TrendsReport {
            days,
            trends_chart,
            category_trends_chart,
            chart_format: CHART_FORMAT,
        })
    }

    pub async fn comprehensive_report(&self) -> Result<ComprehensiveReport> {
        let days = self.resolve_days(None)?;
        let snapshot = self.reports.snapshot().await?;
        let now = Utc::now();

        let category_stats = category_stats(&snapshot);
        let language_stats = language_stats(&snapshot);
        let status_stats = status_stats(&snapshot);

        let stats = category_stats.clone();
        let (category_chart, trends_chart, category_trends_chart) = render(move || {
            Ok((
                category_chart(&stats)?,
                trends_chart(&snapshot, now, days)?,
                category_trends_chart(&snapshot, now, days)?,
            ))
        })
        .await?;

        Ok(ComprehensiveReport {
            category_stats,
            language_stats,
            status_stats,
            category_chart,
            trends_chart,
            category_trends_chart,
            chart_format: CHART_FORMAT,
        })
    }
}
