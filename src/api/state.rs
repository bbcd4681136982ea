use std::sync::Arc;

use crate::db::DocumentStore;

/// Shared application state
///
/// Holds the document-store client built once at startup. Every page
/// activation reads through it; nothing else is shared between requests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        tracing::info!(store = store.name(), "Using document store");
        Self { store }
    }
}
