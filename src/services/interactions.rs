use chrono::Utc;

use crate::{
    db::{decode_all, to_fields, Collection, Direction, DocumentStore, Query},
    error::AppResult,
    models::{Interaction, InteractionType, InteractionUpdate},
    services::{sort_newest_first, DEFAULT_INTERACTION_LIMIT},
};

pub const LOAD_FAILURE: &str = "Failed to load interactions";

/// Full snapshot of the interactions collection, most recent first
pub async fn load_interactions(store: &dyn DocumentStore) -> AppResult<Vec<Interaction>> {
    let documents = store.list_documents(Collection::Interactions).await?;
    let mut interactions: Vec<Interaction> = decode_all(documents)?;
    sort_newest_first(&mut interactions, |interaction| interaction.timestamp);

    tracing::debug!(count = interactions.len(), store = store.name(), "Loaded interactions");
    Ok(interactions)
}

pub async fn get_interaction(store: &dyn DocumentStore, id: &str) -> AppResult<Option<Interaction>> {
    store
        .get_document(Collection::Interactions, id)
        .await?
        .map(|doc| doc.decode())
        .transpose()
}

pub async fn get_interactions(store: &dyn DocumentStore, limit: Option<usize>) -> AppResult<Vec<Interaction>> {
    let query = Query::new()
        .order_by("timestamp", Direction::Descending)
        .limit(limit);
    decode_all(store.run_query(Collection::Interactions, &query).await?)
}

async fn recent_where(
    store: &dyn DocumentStore,
    field: &str,
    value: &str,
    limit: Option<usize>,
) -> AppResult<Vec<Interaction>> {
    let query = Query::new()
        .where_eq(field, value)
        .order_by("timestamp", Direction::Descending)
        .limit(Some(limit.unwrap_or(DEFAULT_INTERACTION_LIMIT)));
    decode_all(store.run_query(Collection::Interactions, &query).await?)
}

pub async fn get_user_interactions(
    store: &dyn DocumentStore,
    user_id: &str,
    limit: Option<usize>,
) -> AppResult<Vec<Interaction>> {
    recent_where(store, "userId", user_id, limit).await
}

pub async fn get_item_interactions(
    store: &dyn DocumentStore,
    item_id: &str,
    limit: Option<usize>,
) -> AppResult<Vec<Interaction>> {
    recent_where(store, "itemId", item_id, limit).await
}

pub async fn get_interactions_by_type(
    store: &dyn DocumentStore,
    kind: InteractionType,
    limit: Option<usize>,
) -> AppResult<Vec<Interaction>> {
    recent_where(store, "type", kind.as_str(), limit).await
}

/// Stores a new interaction and returns its id
///
/// The timestamp defaults to now.
pub async fn create_interaction(store: &dyn DocumentStore, interaction: &Interaction) -> AppResult<String> {
    let interaction = Interaction {
        timestamp: interaction.timestamp.or_else(|| Some(Utc::now())),
        ..interaction.clone()
    };

    let id = store
        .create_document(Collection::Interactions, to_fields(&interaction)?)
        .await?;
    tracing::info!(interaction_id = %id, kind = interaction.kind.as_str(), "Created interaction");
    Ok(id)
}

pub async fn update_interaction(
    store: &dyn DocumentStore,
    id: &str,
    update: &InteractionUpdate,
) -> AppResult<()> {
    store
        .update_document(Collection::Interactions, id, to_fields(update)?)
        .await
}
