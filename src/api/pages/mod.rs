//! Page assemblers
//!
//! Each request is one page activation: the page starts its fetch handles,
//! waits for them to settle, then runs search and pagination over the
//! snapshots and renders the view model.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    services::{
        pagination::PAGE_SIZE_OPTIONS, search, LoadState, SearchOptions, TableState,
    },
    views::{table::DEFAULT_EMPTY_MESSAGE, PaginationControls, SearchBox, Table, TableRow, ViewName},
};

pub mod interactions;
pub mod items;
pub mod overview;
pub mod recommendations;
pub mod users;

/// Page size of the users, items and interactions tables
pub const TABLE_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageState {
    Ready,
    Error,
}

/// Envelope of every view response
#[derive(Debug, Serialize)]
pub struct PageResponse<C> {
    pub view: ViewName,
    pub state: PageState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub content: Option<C>,
}

impl<C> PageResponse<C> {
    pub fn ready(view: ViewName, content: C) -> Self {
        Self {
            view,
            state: PageState::Ready,
            error: None,
            content: Some(content),
        }
    }

    pub fn failed(view: ViewName, message: impl Into<String>) -> Self {
        Self {
            view,
            state: PageState::Error,
            error: Some(message.into()),
            content: None,
        }
    }

    /// Renders a settled load with `assemble`, or the load's failure message
    pub fn from_load<T>(view: ViewName, load: LoadState<T>, assemble: impl FnOnce(T) -> C) -> AppResult<Self> {
        match load {
            LoadState::Ready(data) => Ok(Self::ready(view, assemble(data))),
            LoadState::Failed(message) => Ok(Self::failed(view, message)),
            LoadState::Loading => Err(AppError::Internal(format!(
                "{} page rendered before its load settled",
                view.as_str()
            ))),
        }
    }
}

/// Search and paging parameters of a table view
#[derive(Debug, Default, Deserialize)]
pub struct TableParams {
    #[serde(default)]
    pub q: String,
    pub page: Option<usize>,
    #[serde(rename = "perPage")]
    pub per_page: Option<usize>,
}

impl TableParams {
    /// Validated table state; missing values take the view defaults
    pub fn into_state(self, default_per_page: usize) -> AppResult<TableState> {
        table_state(self.q, self.page, self.per_page, default_per_page)
    }
}

pub(crate) fn table_state(
    query: String,
    page: Option<usize>,
    per_page: Option<usize>,
    default_per_page: usize,
) -> AppResult<TableState> {
    let per_page = per_page.unwrap_or(default_per_page);
    if per_page != default_per_page && !PAGE_SIZE_OPTIONS.contains(&per_page) {
        return Err(AppError::InvalidInput(format!(
            "Unsupported page size {}, expected one of {:?}",
            per_page, PAGE_SIZE_OPTIONS
        )));
    }
    let per_page = NonZeroUsize::new(per_page)
        .ok_or_else(|| AppError::InvalidInput("Page size must be positive".to_string()))?;

    let page = page.unwrap_or(1);
    if page == 0 {
        return Err(AppError::InvalidInput("Pages are numbered from 1".to_string()));
    }

    Ok(TableState {
        query,
        page,
        per_page,
    })
}

/// A searchable, paginated table view
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePage {
    pub title: &'static str,
    pub search: SearchBox,
    pub table: Table,
    /// Omitted when nothing matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationControls>,
    pub table_state: TableState,
}

/// How a table view searches and labels its records
pub struct TableLayout {
    pub title: &'static str,
    pub search_fields: &'static [&'static str],
    pub placeholder: &'static str,
}

/// Search, paginate and render one snapshot
pub fn assemble_table<T>(records: &[T], state: TableState, layout: &TableLayout) -> TablePage
where
    T: TableRow + Serialize + Clone,
{
    let matched = search(records, &state.query, &SearchOptions::fields(layout.search_fields));
    let info = state.pagination(matched.len());
    let table = Table::new(info.window(&matched[..]), DEFAULT_EMPTY_MESSAGE);
    let pagination = (!matched.is_empty()).then(|| PaginationControls::new(&state, &info));

    TablePage {
        title: layout.title,
        search: SearchBox::new(&state.query, layout.placeholder, matched.len()),
        table,
        pagination,
        table_state: state,
    }
}
