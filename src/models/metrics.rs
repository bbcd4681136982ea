use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate metrics stored as the singleton `system_metrics/current`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemMetrics {
    pub total_users: u64,
    pub total_items: u64,
    pub total_interactions: u64,
    pub total_recommendations: u64,
    pub average_rating: f64,
    pub click_through_rate: f64,
    pub conversion_rate: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl SystemMetrics {
    /// Metrics shown when the singleton document is absent
    pub fn fallback(recommendation_count: usize) -> Self {
        Self {
            total_recommendations: recommendation_count as u64,
            ..Default::default()
        }
    }
}
