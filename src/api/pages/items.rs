use axum::{
    extract::{Query, State},
    Json,
};

use super::{assemble_table, PageResponse, TableLayout, TablePage, TableParams, TABLE_PAGE_SIZE};
use crate::{api::AppState, error::AppResult, services::fetch, views::ViewName};

const ITEMS_TABLE: TableLayout = TableLayout {
    title: "Items",
    search_fields: &["title", "category", "id"],
    placeholder: "Search items by title, category, or ID...",
};

/// Items table view
pub async fn items(
    State(state): State<AppState>,
    Query(params): Query<TableParams>,
) -> AppResult<Json<PageResponse<TablePage>>> {
    let table_state = params.into_state(TABLE_PAGE_SIZE)?;
    let load = fetch::items(state.store.clone()).settle().await;

    let page = PageResponse::from_load(ViewName::Items, load, |items| {
        assemble_table(&items, table_state, &ITEMS_TABLE)
    })?;
    Ok(Json(page))
}
