/// Firestore REST document store
///
/// Talks to the hosted database through the public REST surface:
/// 1. Collection snapshot: `GET .../documents/{collection}` walked page by page
/// 2. Single document: `GET .../documents/{collection}/{id}`
/// 3. Ordered / filtered reads: `POST .../documents:runQuery`
///
/// Every call is authenticated with the project's web API key.
use std::{collections::HashMap, time::Duration};

use reqwest::{Client as HttpClient, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    config::Config,
    db::{
        value::{decode_fields, encode_fields, FirestoreValue},
        Collection, Direction, Document, DocumentStore, Fields, Filter, Query,
    },
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct FirestoreStore {
    http_client: HttpClient,
    api_key: String,
    /// `{base}/projects/{project}/databases/{database}/documents`
    documents_url: String,
    page_size: u32,
}

/// Document as returned by the REST API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: HashMap<String, FirestoreValue>,
}

impl RawDocument {
    fn into_document(self) -> Document {
        let id = self.name.rsplit('/').next().unwrap_or_default().to_string();
        Document::new(id, decode_fields(self.fields))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// One streamed row of a runQuery response; progress rows carry no document
#[derive(Debug, Deserialize)]
struct QueryRow {
    #[serde(default)]
    document: Option<RawDocument>,
}

impl FirestoreStore {
    /// Creates a store client from the loaded configuration
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let documents_url = format!(
            "{}/projects/{}/databases/{}/documents",
            config.firestore_url.trim_end_matches('/'),
            config.firebase_project_id,
            config.firestore_database
        );

        tracing::info!(url = %documents_url, "Configured Firestore document store");

        Ok(Self {
            http_client,
            api_key: config.firebase_api_key.clone(),
            documents_url,
            page_size: config.firestore_page_size,
        })
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!("{}/{}", self.documents_url, collection)
    }

    fn document_url(&self, collection: Collection, id: &str) -> String {
        format!("{}/{}/{}", self.documents_url, collection, id)
    }

    /// Turns a non-success status into a store error
    async fn check(response: Response) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::StoreStatus {
            status: status.as_u16(),
            body,
        })
    }
}

/// Builds the runQuery request body for a collection query
fn structured_query(collection: Collection, query: &Query) -> Value {
    let mut structured = json!({
        "from": [{ "collectionId": collection.as_str() }],
    });

    let filters: Vec<Value> = query
        .filters
        .iter()
        .map(|filter| {
            let (field, op, value) = match filter {
                Filter::Equal { field, value } => (field, "EQUAL", value),
                Filter::ArrayContains { field, value } => (field, "ARRAY_CONTAINS", value),
            };
            json!({
                "fieldFilter": {
                    "field": { "fieldPath": field },
                    "op": op,
                    "value": FirestoreValue::from_json(value),
                }
            })
        })
        .collect();

    match filters.len() {
        0 => {}
        1 => structured["where"] = filters.into_iter().next().unwrap_or_default(),
        _ => {
            structured["where"] = json!({
                "compositeFilter": { "op": "AND", "filters": filters }
            })
        }
    }

    if !query.order_by.is_empty() {
        let order: Vec<Value> = query
            .order_by
            .iter()
            .map(|order| {
                let direction = match order.direction {
                    Direction::Ascending => "ASCENDING",
                    Direction::Descending => "DESCENDING",
                };
                json!({ "field": { "fieldPath": order.field }, "direction": direction })
            })
            .collect();
        structured["orderBy"] = Value::Array(order);
    }

    if let Some(limit) = query.limit {
        structured["limit"] = json!(limit);
    }

    json!({ "structuredQuery": structured })
}

fn document_body(fields: &Fields) -> Value {
    json!({ "fields": encode_fields(fields) })
}

#[async_trait::async_trait]
impl DocumentStore for FirestoreStore {
    async fn list_documents(&self, collection: Collection) -> AppResult<Vec<Document>> {
        let url = self.collection_url(collection);
        let page_size = self.page_size.to_string();
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let response = {
                let mut params = vec![("key", self.api_key.as_str()), ("pageSize", page_size.as_str())];
                if let Some(token) = page_token.as_deref() {
                    params.push(("pageToken", token));
                }
                self.http_client.get(&url).query(&params).send().await?
            };
            let page: ListResponse = Self::check(response).await?.json().await?;

            documents.extend(page.documents.into_iter().map(RawDocument::into_document));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(
            collection = %collection,
            count = documents.len(),
            "Collection snapshot fetched"
        );

        Ok(documents)
    }

    async fn get_document(&self, collection: Collection, id: &str) -> AppResult<Option<Document>> {
        let response = self
            .http_client
            .get(self.document_url(collection, id))
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let raw: RawDocument = Self::check(response).await?.json().await?;
        Ok(Some(raw.into_document()))
    }

    async fn run_query(&self, collection: Collection, query: &Query) -> AppResult<Vec<Document>> {
        let url = format!("{}:runQuery", self.documents_url);

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&structured_query(collection, query))
            .send()
            .await?;

        let rows: Vec<QueryRow> = Self::check(response).await?.json().await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.document)
            .map(RawDocument::into_document)
            .collect())
    }

    async fn create_document(&self, collection: Collection, fields: Fields) -> AppResult<String> {
        let response = self
            .http_client
            .post(self.collection_url(collection))
            .query(&[("key", self.api_key.as_str())])
            .json(&document_body(&fields))
            .send()
            .await?;

        let raw: RawDocument = Self::check(response).await?.json().await?;
        let document = raw.into_document();

        tracing::info!(collection = %collection, id = %document.id, "Document created");

        Ok(document.id)
    }

    async fn set_document(&self, collection: Collection, id: &str, fields: Fields) -> AppResult<()> {
        let response = self
            .http_client
            .patch(self.document_url(collection, id))
            .query(&[("key", self.api_key.as_str())])
            .json(&document_body(&fields))
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    async fn update_document(&self, collection: Collection, id: &str, fields: Fields) -> AppResult<()> {
        let mut params: Vec<(&str, &str)> = vec![
            ("key", self.api_key.as_str()),
            ("currentDocument.exists", "true"),
        ];
        params.extend(fields.keys().map(|name| ("updateMask.fieldPaths", name.as_str())));

        let response = self
            .http_client
            .patch(self.document_url(collection, id))
            .query(&params)
            .json(&document_body(&fields))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("{}/{}", collection, id)));
        }

        Self::check(response).await?;
        Ok(())
    }

    async fn delete_document(&self, collection: Collection, id: &str) -> AppResult<()> {
        let response = self
            .http_client
            .delete(self.document_url(collection, id))
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        Self::check(response).await?;

        tracing::info!(collection = %collection, id = %id, "Document deleted");

        Ok(())
    }

    fn name(&self) -> &'static str {
        "firestore"
    }
}
