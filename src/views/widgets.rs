use serde::Serialize;

use crate::{
    models::{Item, PipelineStage, Recommendation, StageStatus, SystemMetrics},
    views::Tone,
};

/// Number of item tags shown on a recommendation card
const CARD_TAGS: usize = 2;

/// Stages after this index are drawn without a connector line
const LAST_CONNECTED_STAGE: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: u64,
    pub subtitle: &'static str,
}

impl MetricCard {
    /// The four headline counts of the overview
    pub fn headline(metrics: &SystemMetrics) -> Vec<MetricCard> {
        vec![
            MetricCard {
                title: "Total Users",
                value: metrics.total_users,
                subtitle: "Active users in system",
            },
            MetricCard {
                title: "Total Items",
                value: metrics.total_items,
                subtitle: "Items in catalog",
            },
            MetricCard {
                title: "Total Interactions",
                value: metrics.total_interactions,
                subtitle: "User-item interactions",
            },
            MetricCard {
                title: "Recommendations",
                value: metrics.total_recommendations,
                subtitle: "Generated recommendations",
            },
        ]
    }
}

/// A labelled progress bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatBar {
    pub label: &'static str,
    pub value: f64,
    pub max: f64,
    /// `value / max` as a percentage with one decimal; 0 when `max` is 0
    pub percentage: f64,
}

impl StatBar {
    pub fn new(label: &'static str, value: f64, max: f64) -> Self {
        let percentage = if max == 0.0 {
            0.0
        } else {
            (value / max * 1000.0).round() / 10.0
        };

        Self {
            label,
            value,
            max,
            percentage,
        }
    }
}

pub fn stage_tone(status: StageStatus) -> Tone {
    match status {
        StageStatus::Completed => Tone::Success,
        StageStatus::Processing => Tone::Info,
        StageStatus::Pending => Tone::Neutral,
        StageStatus::Failed => Tone::Danger,
    }
}

pub fn stage_icon(status: StageStatus) -> &'static str {
    match status {
        StageStatus::Completed => "✓",
        StageStatus::Processing => "⟳",
        StageStatus::Pending => "○",
        StageStatus::Failed => "✗",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStageView {
    pub stage: String,
    pub description: String,
    pub status: StageStatus,
    pub icon: &'static str,
    pub tone: Tone,
    pub data_label: String,
    pub duration_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Draw the line to the next stage
    pub connector: bool,
}

impl PipelineStageView {
    pub fn new(stage: &PipelineStage, index: usize) -> Self {
        Self {
            stage: stage.stage.clone(),
            description: stage.description.clone(),
            status: stage.status,
            icon: stage_icon(stage.status),
            tone: stage_tone(stage.status),
            data_label: format!("Data: {} records", stage.data_count),
            duration_label: format!("Duration: {}ms", stage.duration),
            error: stage.error.clone(),
            connector: index < LAST_CONNECTED_STAGE,
        }
    }
}

pub fn algorithm_tone(algorithm: &str) -> Tone {
    match algorithm {
        "Collaborative Filtering" => Tone::Info,
        "Content-Based" => Tone::Accent,
        "Hybrid" => Tone::Success,
        _ => Tone::Neutral,
    }
}

/// A recommendation joined with its item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationCard {
    pub id: String,
    pub user_id: String,
    pub item_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub score: String,
    pub algorithm: String,
    pub algorithm_tone: Tone,
    pub reason: String,
}

impl RecommendationCard {
    pub fn new(recommendation: &Recommendation, item: &Item) -> Self {
        Self {
            id: recommendation.id.clone(),
            user_id: recommendation.user_id.clone(),
            item_id: item.id.clone(),
            title: item.title.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            tags: item.tags.iter().take(CARD_TAGS).cloned().collect(),
            score: format!("{}%", (recommendation.score * 100.0).round()),
            algorithm: recommendation.algorithm.clone(),
            algorithm_tone: algorithm_tone(&recommendation.algorithm),
            reason: recommendation.reason.clone(),
        }
    }
}
