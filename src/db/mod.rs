use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

pub mod collections;
pub mod firestore;
pub mod memory;
pub mod value;

pub use collections::{Collection, METRICS_DOC_ID};
pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

/// Plain JSON fields of a stored document
pub type Fields = Map<String, Value>;

/// A document read from the store
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Decodes the document into an entity, exposing the document id as `id`
    pub fn decode<T: DeserializeOwned>(self) -> AppResult<T> {
        let mut fields = self.fields;
        fields.insert("id".to_string(), Value::String(self.id));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}

/// Decodes every document, failing on the first shape mismatch
pub fn decode_all<T: DeserializeOwned>(documents: Vec<Document>) -> AppResult<Vec<T>> {
    documents.into_iter().map(Document::decode).collect()
}

/// Serializes an entity or patch into storable fields; `id` lives in the
/// document name and is never written as a field
pub fn to_fields<T: Serialize>(value: &T) -> AppResult<Fields> {
    match serde_json::to_value(value)? {
        Value::Object(mut fields) => {
            fields.remove("id");
            Ok(fields)
        }
        other => Err(AppError::InvalidInput(format!(
            "Expected an object to store, got {}",
            other
        ))),
    }
}

/// Sort direction for ordered queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Field predicate for queries
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Equal { field: String, value: Value },
    ArrayContains { field: String, value: Value },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// A filtered and ordered read of one collection
///
/// Filters are ANDed. As in Firestore, documents missing an ordered field are
/// not returned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Equal {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn where_array_contains(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::ArrayContains {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by.push(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

/// Trait for the external document store
///
/// The dashboard only reads full collections; the remaining operations back
/// the entity service functions.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch every document of a collection
    async fn list_documents(&self, collection: Collection) -> AppResult<Vec<Document>>;

    /// Fetch one document by id, `None` if it does not exist
    async fn get_document(&self, collection: Collection, id: &str) -> AppResult<Option<Document>>;

    /// Fetch documents matching a filtered and ordered query
    async fn run_query(&self, collection: Collection, query: &Query) -> AppResult<Vec<Document>>;

    /// Create a document with a store-assigned id and return that id
    async fn create_document(&self, collection: Collection, fields: Fields) -> AppResult<String>;

    /// Create or replace a document under a caller-chosen id
    async fn set_document(&self, collection: Collection, id: &str, fields: Fields) -> AppResult<()>;

    /// Merge fields into an existing document
    async fn update_document(&self, collection: Collection, id: &str, fields: Fields) -> AppResult<()>;

    /// Delete a document; deleting a missing document is not an error
    async fn delete_document(&self, collection: Collection, id: &str) -> AppResult<()>;

    /// Store name for logging
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Tag {
        id: String,
        label: String,
    }

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_decode_injects_document_id() {
        let doc = Document::new("t1", fields(json!({"label": "sale"})));
        let tag: Tag = doc.decode().unwrap();
        assert_eq!(
            tag,
            Tag {
                id: "t1".to_string(),
                label: "sale".to_string()
            }
        );
    }

    #[test]
    fn test_decode_shape_mismatch() {
        let doc = Document::new("t1", fields(json!({"label": 5})));
        let result: AppResult<Tag> = doc.decode();
        assert!(matches!(result, Err(AppError::Decode(_))));
    }

    #[test]
    fn test_to_fields_drops_id() {
        let tag = Tag {
            id: "t1".to_string(),
            label: "sale".to_string(),
        };
        let stored = to_fields(&tag).unwrap();
        assert_eq!(Value::Object(stored), json!({"label": "sale"}));
    }

    #[test]
    fn test_to_fields_rejects_scalars() {
        assert!(matches!(to_fields(&5), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_query_builder() {
        let query = Query::new()
            .where_eq("userId", "u1")
            .order_by("score", Direction::Descending)
            .limit(Some(20));

        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.order_by[0].field, "score");
        assert_eq!(query.limit, Some(20));
    }
}
