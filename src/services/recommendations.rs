use chrono::Utc;
use serde_json::{Map, Value};

use crate::{
    db::{decode_all, to_fields, Collection, Direction, DocumentStore, Query},
    error::AppResult,
    models::{Recommendation, RecommendationUpdate},
    services::sort_newest_first,
};

/// Default size of a per-user recommendation list
pub const DEFAULT_USER_LIMIT: usize = 20;

pub const LOAD_FAILURE: &str = "Failed to load recommendations";

/// Full snapshot of the recommendations collection, most recent first
pub async fn load_recommendations(store: &dyn DocumentStore) -> AppResult<Vec<Recommendation>> {
    let documents = store.list_documents(Collection::Recommendations).await?;
    let mut recommendations: Vec<Recommendation> = decode_all(documents)?;
    sort_newest_first(&mut recommendations, |rec| rec.timestamp);

    tracing::debug!(
        count = recommendations.len(),
        store = store.name(),
        "Loaded recommendations"
    );
    Ok(recommendations)
}

pub async fn get_recommendation(store: &dyn DocumentStore, id: &str) -> AppResult<Option<Recommendation>> {
    store
        .get_document(Collection::Recommendations, id)
        .await?
        .map(|doc| doc.decode())
        .transpose()
}

pub async fn get_recommendations(
    store: &dyn DocumentStore,
    limit: Option<usize>,
) -> AppResult<Vec<Recommendation>> {
    let query = Query::new()
        .order_by("timestamp", Direction::Descending)
        .limit(limit);
    decode_all(store.run_query(Collection::Recommendations, &query).await?)
}

/// Highest scoring recommendations for one user, newer first on equal scores
pub async fn get_user_recommendations(
    store: &dyn DocumentStore,
    user_id: &str,
    limit: Option<usize>,
) -> AppResult<Vec<Recommendation>> {
    let query = Query::new()
        .where_eq("userId", user_id)
        .order_by("score", Direction::Descending)
        .order_by("timestamp", Direction::Descending)
        .limit(Some(limit.unwrap_or(DEFAULT_USER_LIMIT)));
    decode_all(store.run_query(Collection::Recommendations, &query).await?)
}

pub async fn get_recommendations_by_algorithm(
    store: &dyn DocumentStore,
    algorithm: &str,
    limit: Option<usize>,
) -> AppResult<Vec<Recommendation>> {
    let query = Query::new()
        .where_eq("algorithm", algorithm)
        .order_by("timestamp", Direction::Descending)
        .limit(limit);
    decode_all(store.run_query(Collection::Recommendations, &query).await?)
}

/// Stores a new recommendation and returns its id
///
/// Flags are stored as given (false unless set); the timestamp defaults to now.
pub async fn create_recommendation(
    store: &dyn DocumentStore,
    recommendation: &Recommendation,
) -> AppResult<String> {
    let now = Utc::now();
    let recommendation = Recommendation {
        timestamp: recommendation.timestamp.or(Some(now)),
        created_at: Some(now),
        ..recommendation.clone()
    };

    let id = store
        .create_document(Collection::Recommendations, to_fields(&recommendation)?)
        .await?;
    tracing::info!(
        recommendation_id = %id,
        user_id = %recommendation.user_id,
        "Created recommendation"
    );
    Ok(id)
}

pub async fn update_recommendation(
    store: &dyn DocumentStore,
    id: &str,
    update: &RecommendationUpdate,
) -> AppResult<()> {
    store
        .update_document(Collection::Recommendations, id, to_fields(update)?)
        .await
}

async fn set_flag(store: &dyn DocumentStore, id: &str, flag: &str) -> AppResult<()> {
    let mut fields = Map::new();
    fields.insert(flag.to_string(), Value::Bool(true));
    store
        .update_document(Collection::Recommendations, id, fields)
        .await
}

pub async fn mark_shown(store: &dyn DocumentStore, id: &str) -> AppResult<()> {
    set_flag(store, id, "shown").await
}

pub async fn mark_clicked(store: &dyn DocumentStore, id: &str) -> AppResult<()> {
    set_flag(store, id, "clicked").await
}

pub async fn mark_converted(store: &dyn DocumentStore, id: &str) -> AppResult<()> {
    set_flag(store, id, "converted").await
}
