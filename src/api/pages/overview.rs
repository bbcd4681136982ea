use axum::{extract::State, Json};
use serde::Serialize;

use super::PageResponse;
use crate::{
    api::AppState,
    models::{Item, PipelineStage, Recommendation, SystemMetrics},
    services::{fetch, ItemIndex},
    views::{MetricCard, PipelineStageView, RecommendationCard, StatBar, ViewName},
};

/// Recommendations shown in the recent section, before the item join
const RECENT_RECOMMENDATIONS: usize = 4;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatGroup {
    pub title: &'static str,
    pub bars: Vec<StatBar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewPage {
    pub title: &'static str,
    pub metrics: Vec<MetricCard>,
    pub performance: Vec<StatGroup>,
    /// Omitted when there are no stages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<Vec<PipelineStageView>>,
    /// Omitted when no recent recommendation has a known item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_recommendations: Option<Vec<RecommendationCard>>,
}

fn performance(metrics: &SystemMetrics) -> Vec<StatGroup> {
    vec![
        StatGroup {
            title: "Model Performance",
            bars: vec![
                StatBar::new("Precision", metrics.precision, 1.0),
                StatBar::new("Recall", metrics.recall, 1.0),
                StatBar::new("F1 Score", metrics.f1_score, 1.0),
            ],
            note: None,
        },
        StatGroup {
            title: "Business Metrics",
            bars: vec![
                StatBar::new("Click-Through Rate", metrics.click_through_rate, 1.0),
                StatBar::new("Conversion Rate", metrics.conversion_rate, 1.0),
            ],
            note: Some(format!("Average Rating: {}", metrics.average_rating)),
        },
    ]
}

/// Builds the overview from whatever the four loads produced
///
/// Missing metrics fall back to zeroes with the recommendation count.
pub fn assemble(
    metrics: Option<SystemMetrics>,
    stages: &[PipelineStage],
    recommendations: &[Recommendation],
    items: &[Item],
) -> OverviewPage {
    let metrics = metrics.unwrap_or_else(|| SystemMetrics::fallback(recommendations.len()));

    let index = ItemIndex::new(items);
    let recent: Vec<RecommendationCard> = index
        .join(recommendations.iter().take(RECENT_RECOMMENDATIONS))
        .into_iter()
        .map(|(rec, item)| RecommendationCard::new(rec, item))
        .collect();

    let pipeline: Vec<PipelineStageView> = stages
        .iter()
        .enumerate()
        .map(|(i, stage)| PipelineStageView::new(stage, i))
        .collect();

    OverviewPage {
        title: "System Overview",
        metrics: MetricCard::headline(&metrics),
        performance: performance(&metrics),
        pipeline: (!pipeline.is_empty()).then_some(pipeline),
        recent_recommendations: (!recent.is_empty()).then_some(recent),
    }
}

/// Overview view
///
/// Always renders: a failed load is logged by its handle and treated as empty.
pub async fn overview(State(state): State<AppState>) -> Json<PageResponse<OverviewPage>> {
    let metrics = fetch::system_metrics(state.store.clone());
    let stages = fetch::pipeline_stages(state.store.clone());
    let recommendations = fetch::recommendations(state.store.clone());
    let items = fetch::items(state.store.clone());

    let metrics = metrics.settle().await.into_data().flatten();
    let stages = stages.settle().await.into_data().unwrap_or_default();
    let recommendations = recommendations.settle().await.into_data().unwrap_or_default();
    let items = items.settle().await.into_data().unwrap_or_default();

    Json(PageResponse::ready(
        ViewName::Overview,
        assemble(metrics, &stages, &recommendations, &items),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recommendation(id: &str, item_id: &str) -> Recommendation {
        serde_json::from_value(json!({
            "id": id,
            "userId": "u1",
            "itemId": item_id,
            "score": 0.9,
            "algorithm": "Hybrid",
            "reason": "Trending"
        }))
        .unwrap()
    }

    fn item(id: &str) -> Item {
        serde_json::from_value(json!({
            "id": id,
            "title": "Desk Lamp",
            "category": "Home",
            "price": 30,
            "rating": 4.4
        }))
        .unwrap()
    }

    #[test]
    fn test_fallback_metrics_and_empty_sections() {
        let recommendations = vec![recommendation("r1", "i999")];
        let page = assemble(None, &[], &recommendations, &[]);

        assert_eq!(page.metrics[3].value, 1);
        assert_eq!(page.metrics[0].value, 0);
        assert!(page.pipeline.is_none());
        assert!(page.recent_recommendations.is_none());
        assert_eq!(page.performance[1].note.as_deref(), Some("Average Rating: 0"));
    }

    #[test]
    fn test_recent_recommendations_take_first_four_before_join() {
        let recommendations = vec![
            recommendation("r1", "i1"),
            recommendation("r2", "i999"),
            recommendation("r3", "i1"),
            recommendation("r4", "i1"),
            recommendation("r5", "i1"),
        ];
        let page = assemble(None, &[], &recommendations, &[item("i1")]);

        let ids: Vec<String> = page
            .recent_recommendations
            .unwrap()
            .into_iter()
            .map(|card| card.id)
            .collect();
        assert_eq!(ids, vec!["r1", "r3", "r4"]);
    }

    #[test]
    fn test_stored_metrics_feed_bars() {
        let metrics = SystemMetrics {
            total_users: 300,
            precision: 0.78,
            average_rating: 4.2,
            ..Default::default()
        };
        let stage: PipelineStage = serde_json::from_value(json!({
            "stage": "Data Collection",
            "status": "completed",
            "dataCount": 600,
            "duration": 1200
        }))
        .unwrap();

        let page = assemble(Some(metrics), &[stage], &[], &[]);
        assert_eq!(page.metrics[0].value, 300);
        assert_eq!(page.performance[0].bars[0].percentage, 78.0);
        assert_eq!(page.performance[1].note.as_deref(), Some("Average Rating: 4.2"));
        assert_eq!(page.pipeline.unwrap().len(), 1);
    }
}
