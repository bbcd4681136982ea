use std::{future::Future, sync::Arc};

use tokio::task::JoinHandle;

use crate::{
    db::{Collection, DocumentStore},
    error::{AppError, AppResult},
    models::{Interaction, Item, PipelineStage, Recommendation, SystemMetrics, User},
    services::{interactions, items, metrics, pipeline, recommendations, users},
};

/// Three-state result of one collection load
///
/// Leaves `Loading` exactly once; later outcomes are ignored.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            LoadState::Ready(data) => Some(data),
            _ => None,
        }
    }

    /// Records the outcome of the load. Errors are replaced by the fixed
    /// `failure` message. Returns false if the state had already settled.
    pub fn settle(&mut self, outcome: AppResult<T>, failure: &str) -> bool {
        if !self.is_loading() {
            return false;
        }

        *self = match outcome {
            Ok(data) => LoadState::Ready(data),
            Err(_) => LoadState::Failed(failure.to_string()),
        };
        true
    }
}

/// Handle to a single in-flight collection load
///
/// Started once per page activation. There is no retry and no sharing between
/// handles: two handles for the same collection issue two reads.
pub struct Fetch<T> {
    collection: Collection,
    failure: &'static str,
    handle: JoinHandle<AppResult<T>>,
}

impl<T: Send + 'static> Fetch<T> {
    /// Spawns the load on the runtime
    pub fn start<F>(collection: Collection, failure: &'static str, load: F) -> Self
    where
        F: Future<Output = AppResult<T>> + Send + 'static,
    {
        tracing::debug!(collection = %collection, "Starting collection load");

        Self {
            collection,
            failure,
            handle: tokio::spawn(load),
        }
    }

    /// Waits for the load and returns its terminal state
    pub async fn settle(self) -> LoadState<T> {
        let outcome = match self.handle.await {
            Ok(outcome) => outcome,
            Err(e) => Err(AppError::Internal(e.to_string())),
        };

        if let Err(e) = &outcome {
            tracing::error!(
                collection = %self.collection,
                error = %e,
                "{}",
                self.failure
            );
        }

        let mut state = LoadState::Loading;
        state.settle(outcome, self.failure);
        state
    }
}

pub fn users(store: Arc<dyn DocumentStore>) -> Fetch<Vec<User>> {
    Fetch::start(Collection::Users, users::LOAD_FAILURE, async move {
        users::load_users(store.as_ref()).await
    })
}

pub fn items(store: Arc<dyn DocumentStore>) -> Fetch<Vec<Item>> {
    Fetch::start(Collection::Items, items::LOAD_FAILURE, async move {
        items::load_items(store.as_ref()).await
    })
}

pub fn interactions(store: Arc<dyn DocumentStore>) -> Fetch<Vec<Interaction>> {
    Fetch::start(Collection::Interactions, interactions::LOAD_FAILURE, async move {
        interactions::load_interactions(store.as_ref()).await
    })
}

pub fn recommendations(store: Arc<dyn DocumentStore>) -> Fetch<Vec<Recommendation>> {
    Fetch::start(Collection::Recommendations, recommendations::LOAD_FAILURE, async move {
        recommendations::load_recommendations(store.as_ref()).await
    })
}

/// Settles as `Ready(None)` when the metrics document was never written
pub fn system_metrics(store: Arc<dyn DocumentStore>) -> Fetch<Option<SystemMetrics>> {
    Fetch::start(Collection::SystemMetrics, metrics::LOAD_FAILURE, async move {
        metrics::get_system_metrics(store.as_ref()).await
    })
}

pub fn pipeline_stages(store: Arc<dyn DocumentStore>) -> Fetch<Vec<PipelineStage>> {
    Fetch::start(Collection::PipelineStages, pipeline::LOAD_FAILURE, async move {
        pipeline::load_pipeline_stages(store.as_ref()).await
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    use crate::db::{Fields, MemoryStore, MockDocumentStore};

    #[test]
    fn test_settle_is_terminal() {
        let mut state: LoadState<u32> = LoadState::default();
        assert!(state.is_loading());

        assert!(state.settle(Ok(3), "Failed to load users"));
        assert_eq!(state, LoadState::Ready(3));

        assert!(!state.settle(Err(AppError::Internal("late".to_string())), "Failed to load users"));
        assert_eq!(state.data(), Some(&3));
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_failure_uses_fixed_message() {
        let mut state: LoadState<u32> = LoadState::Loading;
        state.settle(
            Err(AppError::StoreStatus {
                status: 403,
                body: "PERMISSION_DENIED".to_string(),
            }),
            "Failed to load items",
        );

        assert_eq!(state.error(), Some("Failed to load items"));
        assert_eq!(state.into_data(), None);
    }

    #[tokio::test]
    async fn test_fetch_ready() {
        let fetch = Fetch::start(Collection::Items, "Failed to load items", async {
            Ok::<_, AppError>(vec![1, 2, 3])
        });
        let state = fetch.settle().await;
        assert_eq!(state, LoadState::Ready(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_fetch_panicking_load_settles_as_failed() {
        async fn crash() -> AppResult<u32> {
            panic!("store client crashed")
        }

        let fetch = Fetch::start(Collection::Items, "Failed to load items", crash());
        let state = fetch.settle().await;
        assert_eq!(state, LoadState::Failed("Failed to load items".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_store_failure() {
        let mut store = MockDocumentStore::new();
        store
            .expect_list_documents()
            .with(eq(Collection::Users))
            .times(2)
            .returning(|_| {
                Err(AppError::StoreStatus {
                    status: 503,
                    body: "UNAVAILABLE".to_string(),
                })
            });

        let store: Arc<dyn DocumentStore> = Arc::new(store);
        let direct = users::load_users(store.as_ref()).await;
        assert_err!(&direct);

        let state = super::users(store).settle().await;
        assert_eq!(state.error(), Some("Failed to load users"));
    }

    #[tokio::test]
    async fn test_fetch_issues_exactly_one_read() {
        let mut store = MockDocumentStore::new();
        store
            .expect_list_documents()
            .with(eq(Collection::Users))
            .times(1)
            .returning(|_| Ok(vec![]));
        store.expect_name().return_const("mock");

        let store: Arc<dyn DocumentStore> = Arc::new(store);
        let fetch = super::users(store);
        let state = fetch.settle().await;
        let users = assert_ok!(state.data().ok_or("not ready"));
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_absent_metrics_settle_ready() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let state = system_metrics(store).settle().await;
        assert_eq!(state, LoadState::Ready(None));
    }

    #[tokio::test]
    async fn test_malformed_stage_fails_with_fixed_message() {
        let memory = MemoryStore::new();
        let mut fields = Fields::new();
        fields.insert("stage".to_string(), json!("Data Collection"));
        fields.insert("status".to_string(), json!("exploded"));
        memory.insert(Collection::PipelineStages, "stage-1", fields).await;

        let state = pipeline_stages(Arc::new(memory)).settle().await;
        assert_eq!(state.error(), Some("Failed to load pipeline stages"));
    }
}
