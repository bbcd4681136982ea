use crate::{
    db::{decode_all, Collection, Direction, DocumentStore, Query},
    error::AppResult,
    models::{PipelineStage, StageStatus},
    services::sort_newest_first,
};

pub const LOAD_FAILURE: &str = "Failed to load pipeline stages";

/// Full snapshot of the pipeline stages, most recently started first
pub async fn load_pipeline_stages(store: &dyn DocumentStore) -> AppResult<Vec<PipelineStage>> {
    let documents = store.list_documents(Collection::PipelineStages).await?;
    let mut stages: Vec<PipelineStage> = decode_all(documents)?;
    sort_newest_first(&mut stages, |stage| stage.started_at);

    tracing::debug!(count = stages.len(), store = store.name(), "Loaded pipeline stages");
    Ok(stages)
}

pub async fn get_pipeline_stage(store: &dyn DocumentStore, id: &str) -> AppResult<Option<PipelineStage>> {
    store
        .get_document(Collection::PipelineStages, id)
        .await?
        .map(|doc| doc.decode())
        .transpose()
}

pub async fn get_pipeline_stages(
    store: &dyn DocumentStore,
    limit: Option<usize>,
) -> AppResult<Vec<PipelineStage>> {
    let query = Query::new()
        .order_by("startedAt", Direction::Descending)
        .limit(limit);
    decode_all(store.run_query(Collection::PipelineStages, &query).await?)
}

pub async fn get_pipeline_stages_by_status(
    store: &dyn DocumentStore,
    status: StageStatus,
    limit: Option<usize>,
) -> AppResult<Vec<PipelineStage>> {
    let query = Query::new()
        .where_eq("status", status.as_str())
        .order_by("startedAt", Direction::Descending)
        .limit(limit);
    decode_all(store.run_query(Collection::PipelineStages, &query).await?)
}
