//! Payload types returned by the analytics endpoints.

use serde::{Serialize, Serializer};

/// Key/value pairs serialized as a JSON object that keeps insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderedCounts<T>(pub Vec<(String, T)>);

impl<T: Copy + Default> OrderedCounts<T> {
    pub fn get(&self, key: &str) -> T {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
            .unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Serialize> Serialize for OrderedCounts<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryStats {
    pub total_reports: u64,
    pub category_counts: OrderedCounts<u64>,
    pub category_percentages: OrderedCounts<f64>,
    pub most_common_category: Option<String>,
    pub unique_categories: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageStats {
    pub total_reports: u64,
    pub language_counts: OrderedCounts<u64>,
    pub language_percentages: OrderedCounts<f64>,
    pub most_common_language: Option<String>,
    pub unique_languages: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusStats {
    pub total_reports: u64,
    pub status_counts: OrderedCounts<u64>,
    pub status_percentages: OrderedCounts<f64>,
    pub finalized_count: u64,
    pub pending_count: u64,
}

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub total_reports: u64,
    pub unique_categories: usize,
    pub pending_reports: u64,
    pub finalized_reports: u64,
    pub approved_reports: u64,
    pub rejected_reports: u64,
    pub most_common_category: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub category_stats: CategoryStats,
    pub category_chart: Option<String>,
    pub chart_format: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendsReport {
    pub days: i64,
    pub trends_chart: Option<String>,
    pub category_trends_chart: Option<String>,
    pub chart_format: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComprehensiveReport {
    pub category_stats: CategoryStats,
    pub language_stats: LanguageStats,
    pub status_stats: StatusStats,
    pub category_chart: Option<String>,
    pub trends_chart: Option<String>,
    pub category_trends_chart: Option<String>,
    pub chart_format: &'static str,
}
