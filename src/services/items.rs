use chrono::Utc;
use serde_json::Value;

use crate::{
    db::{decode_all, to_fields, Collection, Direction, DocumentStore, Query},
    error::AppResult,
    models::{Item, ItemUpdate},
    services::sort_newest_first,
};

/// Default size of the popular-items list
pub const DEFAULT_POPULAR_LIMIT: usize = 10;

pub const LOAD_FAILURE: &str = "Failed to load items";

/// Full snapshot of the items collection, newest first
pub async fn load_items(store: &dyn DocumentStore) -> AppResult<Vec<Item>> {
    let documents = store.list_documents(Collection::Items).await?;
    let mut items: Vec<Item> = decode_all(documents)?;
    sort_newest_first(&mut items, |item| item.created_at);

    tracing::debug!(count = items.len(), store = store.name(), "Loaded items");
    Ok(items)
}

pub async fn get_item(store: &dyn DocumentStore, id: &str) -> AppResult<Option<Item>> {
    store
        .get_document(Collection::Items, id)
        .await?
        .map(|doc| doc.decode())
        .transpose()
}

pub async fn get_items(store: &dyn DocumentStore, limit: Option<usize>) -> AppResult<Vec<Item>> {
    let query = Query::new()
        .order_by("createdAt", Direction::Descending)
        .limit(limit);
    decode_all(store.run_query(Collection::Items, &query).await?)
}

/// Items of one category, best rated first
pub async fn get_items_by_category(
    store: &dyn DocumentStore,
    category: &str,
    limit: Option<usize>,
) -> AppResult<Vec<Item>> {
    let query = Query::new()
        .where_eq("category", category)
        .order_by("rating", Direction::Descending)
        .limit(limit);
    decode_all(store.run_query(Collection::Items, &query).await?)
}

/// Best rated items; ties go to the item with more ratings
pub async fn get_popular_items(store: &dyn DocumentStore, limit: Option<usize>) -> AppResult<Vec<Item>> {
    let query = Query::new()
        .order_by("rating", Direction::Descending)
        .order_by("ratingCount", Direction::Descending)
        .limit(Some(limit.unwrap_or(DEFAULT_POPULAR_LIMIT)));
    decode_all(store.run_query(Collection::Items, &query).await?)
}

/// Stores a new item and returns its id. The given `id` is ignored.
pub async fn create_item(store: &dyn DocumentStore, item: &Item) -> AppResult<String> {
    let now = Utc::now();
    let item = Item {
        created_at: Some(now),
        updated_at: Some(now),
        ..item.clone()
    };

    let id = store.create_document(Collection::Items, to_fields(&item)?).await?;
    tracing::info!(item_id = %id, "Created item");
    Ok(id)
}

pub async fn update_item(store: &dyn DocumentStore, id: &str, update: &ItemUpdate) -> AppResult<()> {
    let mut fields = to_fields(update)?;
    fields.insert("updatedAt".to_string(), Value::String(Utc::now().to_rfc3339()));
    store.update_document(Collection::Items, id, fields).await
}

pub async fn delete_item(store: &dyn DocumentStore, id: &str) -> AppResult<()> {
    store.delete_document(Collection::Items, id).await?;
    tracing::info!(item_id = %id, "Deleted item");
    Ok(())
}
