use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::{Collection, Direction, Document, DocumentStore, Fields, Filter, Query},
    error::{AppError, AppResult},
};

/// In-process document store
///
/// Mirrors the hosted store's read semantics: collections list in document id
/// order, ordered queries skip documents missing an ordered field.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<Collection, BTreeMap<String, Fields>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a document, replacing any document with the same id
    pub async fn insert(&self, collection: Collection, id: impl Into<String>, fields: Fields) {
        let mut inner = self.collections.write().await;
        inner.entry(collection).or_default().insert(id.into(), fields);
    }

    /// Number of documents stored in a collection
    pub async fn len(&self, collection: Collection) -> usize {
        let inner = self.collections.read().await;
        inner.get(&collection).map(BTreeMap::len).unwrap_or(0)
    }

    pub async fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection).await == 0
    }
}

fn matches_filter(fields: &Fields, filter: &Filter) -> bool {
    match filter {
        Filter::Equal { field, value } => fields.get(field) == Some(value),
        Filter::ArrayContains { field, value } => match fields.get(field) {
            Some(Value::Array(values)) => values.contains(value),
            _ => false,
        },
    }
}

/// Rank of a value's type in the store's cross-type ordering
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn list_documents(&self, collection: Collection) -> AppResult<Vec<Document>> {
        let inner = self.collections.read().await;
        Ok(inner
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_document(&self, collection: Collection, id: &str) -> AppResult<Option<Document>> {
        let inner = self.collections.read().await;
        Ok(inner
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id, fields.clone())))
    }

    async fn run_query(&self, collection: Collection, query: &Query) -> AppResult<Vec<Document>> {
        let mut documents: Vec<Document> = self
            .list_documents(collection)
            .await?
            .into_iter()
            .filter(|doc| query.filters.iter().all(|f| matches_filter(&doc.fields, f)))
            .filter(|doc| query.order_by.iter().all(|o| doc.fields.contains_key(&o.field)))
            .collect();

        documents.sort_by(|a, b| {
            query
                .order_by
                .iter()
                .map(|order| {
                    let ordering = compare_values(&a.fields[&order.field], &b.fields[&order.field]);
                    match order.direction {
                        Direction::Ascending => ordering,
                        Direction::Descending => ordering.reverse(),
                    }
                })
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        if let Some(limit) = query.limit {
            documents.truncate(limit);
        }

        Ok(documents)
    }

    async fn create_document(&self, collection: Collection, fields: Fields) -> AppResult<String> {
        let id = Uuid::new_v4().simple().to_string();
        self.insert(collection, id.clone(), fields).await;
        Ok(id)
    }

    async fn set_document(&self, collection: Collection, id: &str, fields: Fields) -> AppResult<()> {
        self.insert(collection, id, fields).await;
        Ok(())
    }

    async fn update_document(&self, collection: Collection, id: &str, fields: Fields) -> AppResult<()> {
        let mut inner = self.collections.write().await;
        let existing = inner
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| AppError::NotFound(format!("{}/{}", collection, id)))?;

        existing.extend(fields);
        Ok(())
    }

    async fn delete_document(&self, collection: Collection, id: &str) -> AppResult<()> {
        let mut inner = self.collections.write().await;
        if let Some(docs) = inner.get_mut(&collection) {
            docs.remove(id);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert(
                Collection::Recommendations,
                "r2",
                fields(json!({"userId": "u1", "score": 0.91, "algorithm": "Hybrid"})),
            )
            .await;
        store
            .insert(
                Collection::Recommendations,
                "r1",
                fields(json!({"userId": "u1", "score": 0.42, "algorithm": "Content-Based"})),
            )
            .await;
        store
            .insert(
                Collection::Recommendations,
                "r3",
                fields(json!({"userId": "u2", "score": 0.77, "algorithm": "Hybrid"})),
            )
            .await;
        store
            .insert(Collection::Recommendations, "r4", fields(json!({"userId": "u1"})))
            .await;
        store
    }

    #[tokio::test]
    async fn test_list_in_id_order() {
        let store = seeded_store().await;
        let docs = store.list_documents(Collection::Recommendations).await.unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2", "r3", "r4"]);
    }

    #[tokio::test]
    async fn test_list_missing_collection_is_empty() {
        let store = MemoryStore::new();
        let docs = store.list_documents(Collection::Users).await.unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_query_filters_orders_and_skips_missing_fields() {
        let store = seeded_store().await;
        let query = Query::new()
            .where_eq("userId", "u1")
            .order_by("score", Direction::Descending);

        let docs = store.run_query(Collection::Recommendations, &query).await.unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["r2", "r1"]);
    }

    #[tokio::test]
    async fn test_query_limit() {
        let store = seeded_store().await;
        let query = Query::new()
            .order_by("score", Direction::Ascending)
            .limit(Some(2));

        let docs = store.run_query(Collection::Recommendations, &query).await.unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r3"]);
    }

    #[tokio::test]
    async fn test_array_contains() {
        let store = MemoryStore::new();
        store
            .insert(Collection::Users, "u1", fields(json!({"preferences": ["books", "sports"]})))
            .await;
        store
            .insert(Collection::Users, "u2", fields(json!({"preferences": ["music"]})))
            .await;

        let query = Query::new().where_array_contains("preferences", "sports");
        let docs = store.run_query(Collection::Users, &query).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "u1");
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let store = MemoryStore::new();
        let id = store
            .create_document(Collection::Items, fields(json!({"title": "Lamp", "price": 20})))
            .await
            .unwrap();

        store
            .update_document(Collection::Items, &id, fields(json!({"price": 25})))
            .await
            .unwrap();

        let doc = store.get_document(Collection::Items, &id).await.unwrap().unwrap();
        assert_eq!(doc.fields["title"], json!("Lamp"));
        assert_eq!(doc.fields["price"], json!(25));

        store.delete_document(Collection::Items, &id).await.unwrap();
        assert!(store.get_document(Collection::Items, &id).await.unwrap().is_none());
        assert!(store.is_empty(Collection::Items).await);
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let store = MemoryStore::new();
        let result = store
            .update_document(Collection::Items, "nope", fields(json!({"price": 1})))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
