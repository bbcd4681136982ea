use axum::{
    extract::{Query, State},
    Json,
};

use super::{assemble_table, PageResponse, TableLayout, TablePage, TableParams, TABLE_PAGE_SIZE};
use crate::{api::AppState, error::AppResult, services::fetch, views::ViewName};

const USERS_TABLE: TableLayout = TableLayout {
    title: "Users",
    search_fields: &["name", "email", "id"],
    placeholder: "Search users by name, email, or ID...",
};

/// Users table view
pub async fn users(
    State(state): State<AppState>,
    Query(params): Query<TableParams>,
) -> AppResult<Json<PageResponse<TablePage>>> {
    let table_state = params.into_state(TABLE_PAGE_SIZE)?;
    let load = fetch::users(state.store.clone()).settle().await;

    let page = PageResponse::from_load(ViewName::Users, load, |users| {
        assemble_table(&users, table_state, &USERS_TABLE)
    })?;
    Ok(Json(page))
}
