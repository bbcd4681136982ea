use chrono::Utc;
use serde_json::Value;

use crate::{
    db::{to_fields, Collection, DocumentStore, Fields, METRICS_DOC_ID},
    error::AppResult,
    models::SystemMetrics,
};

pub const LOAD_FAILURE: &str = "Failed to load system metrics";

/// Reads the singleton metrics document, `None` if it was never written
pub async fn get_system_metrics(store: &dyn DocumentStore) -> AppResult<Option<SystemMetrics>> {
    store
        .get_document(Collection::SystemMetrics, METRICS_DOC_ID)
        .await?
        .map(|doc| doc.decode())
        .transpose()
}

/// Merges `fields` into the singleton metrics document, creating it if absent
///
/// `lastUpdated` is always stamped with the current time.
pub async fn update_system_metrics(store: &dyn DocumentStore, mut fields: Fields) -> AppResult<()> {
    fields.insert("lastUpdated".to_string(), Value::String(Utc::now().to_rfc3339()));

    let exists = store
        .get_document(Collection::SystemMetrics, METRICS_DOC_ID)
        .await?
        .is_some();

    if exists {
        store
            .update_document(Collection::SystemMetrics, METRICS_DOC_ID, fields)
            .await
    } else {
        tracing::info!("Creating system metrics document");
        store
            .set_document(Collection::SystemMetrics, METRICS_DOC_ID, fields)
            .await
    }
}

/// Replaces every metric with the values of `metrics`
pub async fn store_system_metrics(store: &dyn DocumentStore, metrics: &SystemMetrics) -> AppResult<()> {
    update_system_metrics(store, to_fields(metrics)?).await
}
