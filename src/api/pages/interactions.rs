use axum::{
    extract::{Query, State},
    Json,
};

use super::{assemble_table, PageResponse, TableLayout, TablePage, TableParams, TABLE_PAGE_SIZE};
use crate::{api::AppState, error::AppResult, services::fetch, views::ViewName};

const INTERACTIONS_TABLE: TableLayout = TableLayout {
    title: "Interactions",
    search_fields: &["userId", "itemId", "type", "id"],
    placeholder: "Search interactions by user ID, item ID, type, or ID...",
};

/// Interactions table view
pub async fn interactions(
    State(state): State<AppState>,
    Query(params): Query<TableParams>,
) -> AppResult<Json<PageResponse<TablePage>>> {
    let table_state = params.into_state(TABLE_PAGE_SIZE)?;
    let load = fetch::interactions(state.store.clone()).settle().await;

    let page = PageResponse::from_load(ViewName::Interactions, load, |interactions| {
        assemble_table(&interactions, table_state, &INTERACTIONS_TABLE)
    })?;
    Ok(Json(page))
}
