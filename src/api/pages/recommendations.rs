use std::borrow::Cow;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{table_state, PageResponse};
use crate::{
    api::AppState,
    error::AppResult,
    models::{Item, Recommendation, User},
    services::{fetch, search, ItemIndex, SearchOptions, TableState},
    views::{PaginationControls, RecommendationCard, SearchBox, UserFilter, ViewName},
};

/// Cards per page unless the page size is changed
pub const CARDS_PAGE_SIZE: usize = 12;

const SEARCH_FIELDS: &[&str] = &["itemId", "algorithm", "reason"];
const EMPTY_MESSAGE: &str = "No recommendations found";

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationParams {
    #[serde(default)]
    pub q: String,
    pub page: Option<usize>,
    #[serde(rename = "perPage")]
    pub per_page: Option<usize>,
    /// Exact user filter; empty means all users
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Recommendation card grid with user filter
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsPage {
    pub title: &'static str,
    pub search: SearchBox,
    /// Selecting a user goes back to page 1
    pub user_filter: UserFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_label: Option<String>,
    pub cards: Vec<RecommendationCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<&'static str>,
    /// Present only when there is more than one page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationControls>,
    pub table_state: TableState,
}

/// Filters by user, searches, paginates and joins the page window with items
pub fn assemble(
    recommendations: &[Recommendation],
    users: &[User],
    items: &[Item],
    user_id: Option<&str>,
    state: TableState,
) -> RecommendationsPage {
    let by_user: Cow<'_, [Recommendation]> = match user_id {
        Some(user_id) => Cow::Owned(
            recommendations
                .iter()
                .filter(|rec| rec.user_id == user_id)
                .cloned()
                .collect(),
        ),
        None => Cow::Borrowed(recommendations),
    };

    let matched = search(&by_user[..], &state.query, &SearchOptions::fields(SEARCH_FIELDS));
    let info = state.pagination(matched.len());

    let index = ItemIndex::new(items);
    let cards: Vec<RecommendationCard> = index
        .join(info.window(&matched[..]))
        .into_iter()
        .map(|(rec, item)| RecommendationCard::new(rec, item))
        .collect();

    let count_label = (!matched.is_empty()).then(|| {
        format!(
            "Showing {}-{} of {} recommendations",
            info.start_index, info.end_index, info.total_items
        )
    });

    RecommendationsPage {
        title: "Recommendations",
        search: SearchBox::new(&state.query, "Search by item ID, algorithm, or reason...", matched.len())
            .keep_page(),
        user_filter: UserFilter::new(users, user_id),
        user_id: user_id.map(str::to_string),
        count_label,
        empty_message: cards.is_empty().then_some(EMPTY_MESSAGE),
        pagination: (!cards.is_empty() && info.total_pages > 1)
            .then(|| PaginationControls::new(&state, &info)),
        cards,
        table_state: state,
    }
}

/// Recommendations view
///
/// Users and items only feed the filter options and the join; if either fails
/// to load the page still renders without them.
pub async fn recommendations(
    State(state): State<AppState>,
    Query(params): Query<RecommendationParams>,
) -> AppResult<Json<PageResponse<RecommendationsPage>>> {
    let table_state = table_state(params.q, params.page, params.per_page, CARDS_PAGE_SIZE)?;
    let user_id = params.user_id.filter(|id| !id.is_empty());

    let recommendations = fetch::recommendations(state.store.clone());
    let users = fetch::users(state.store.clone());
    let items = fetch::items(state.store.clone());

    let recommendations = recommendations.settle().await;
    let users = users.settle().await.into_data().unwrap_or_default();
    let items = items.settle().await.into_data().unwrap_or_default();

    let page = PageResponse::from_load(ViewName::Recommendations, recommendations, |recommendations| {
        assemble(&recommendations, &users, &items, user_id.as_deref(), table_state)
    })?;
    Ok(Json(page))
}
