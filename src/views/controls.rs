use serde::Serialize;

use crate::{
    models::User,
    services::pagination::{PaginationInfo, TableState, DEFAULT_MAX_VISIBLE, PAGE_SIZE_OPTIONS},
};

/// A navigation button and the state it leads to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageButton {
    pub label: String,
    pub target: TableState,
    pub disabled: bool,
    pub current: bool,
}

impl PageButton {
    fn nav(label: &str, target: TableState, disabled: bool) -> Self {
        Self {
            label: label.to_string(),
            target,
            disabled,
            current: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSizeOption {
    pub size: usize,
    pub target: TableState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSizeSelector {
    pub label: &'static str,
    pub selected: usize,
    pub options: Vec<PageSizeOption>,
}

/// Summary line, page-size selector and page navigation of a table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationControls {
    pub summary: String,
    pub info: PaginationInfo,
    pub page_size: PageSizeSelector,
    pub first: PageButton,
    pub previous: PageButton,
    pub pages: Vec<PageButton>,
    pub next: PageButton,
    pub last: PageButton,
}

impl PaginationControls {
    pub fn new(state: &TableState, info: &PaginationInfo) -> Self {
        let current = info.current_page;
        let at_start = current == 1;
        let at_end = current >= info.total_pages;

        let pages = info
            .page_numbers(DEFAULT_MAX_VISIBLE)
            .into_iter()
            .map(|page| PageButton {
                label: page.to_string(),
                target: state.go_to(page),
                disabled: false,
                current: page == current,
            })
            .collect();

        let options = PAGE_SIZE_OPTIONS
            .iter()
            .filter_map(|size| std::num::NonZeroUsize::new(*size))
            .map(|size| PageSizeOption {
                size: size.get(),
                target: state.with_page_size(size),
            })
            .collect();

        Self {
            summary: format!(
                "Showing {} to {} of {} results",
                info.start_index, info.end_index, info.total_items
            ),
            info: *info,
            page_size: PageSizeSelector {
                label: "Items per page:",
                selected: info.items_per_page,
                options,
            },
            first: PageButton::nav("First", state.go_to(1), at_start),
            previous: PageButton::nav("Previous", state.go_to(current.saturating_sub(1)), at_start),
            pages,
            next: PageButton::nav("Next", state.go_to(current.saturating_add(1)), at_end),
            last: PageButton::nav("Last", state.go_to(info.total_pages), at_end),
        }
    }
}

/// Free-text search input of a view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBox {
    pub query: String,
    pub placeholder: &'static str,
    /// Whether entering a new query returns to page 1
    pub resets_page: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_label: Option<String>,
}

impl SearchBox {
    pub fn new(query: &str, placeholder: &'static str, result_count: usize) -> Self {
        let searching = !query.is_empty();
        Self {
            query: query.to_string(),
            placeholder,
            resets_page: true,
            result_count: searching.then_some(result_count),
            result_label: searching.then(|| {
                let plural = if result_count == 1 { "" } else { "s" };
                format!("Found {} result{}", result_count, plural)
            }),
        }
    }

    pub fn keep_page(mut self) -> Self {
        self.resets_page = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// User selector of the recommendations view
///
/// Choosing an option always returns to page 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserFilter {
    pub label: &'static str,
    pub options: Vec<FilterOption>,
}

impl UserFilter {
    pub fn new(users: &[User], selected: Option<&str>) -> Self {
        let all = FilterOption {
            value: String::new(),
            label: "All Users".to_string(),
            selected: selected.is_none(),
        };

        let options = std::iter::once(all)
            .chain(users.iter().map(|user| FilterOption {
                value: user.id.clone(),
                label: format!("{} ({})", user.name, user.id),
                selected: selected == Some(user.id.as_str()),
            }))
            .collect();

        Self {
            label: "Filter by User:",
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn state(page: usize, per_page: usize) -> TableState {
        TableState::new(NonZeroUsize::new(per_page).unwrap()).go_to(page)
    }

    #[test]
    fn test_controls_on_middle_page() {
        let state = state(2, 10);
        let info = state.pagination(25);
        let controls = PaginationControls::new(&state, &info);

        assert_eq!(controls.summary, "Showing 11 to 20 of 25 results");
        assert!(!controls.first.disabled);
        assert!(!controls.next.disabled);
        assert_eq!(controls.previous.target.page, 1);
        assert_eq!(controls.next.target.page, 3);
        assert_eq!(controls.last.target.page, 3);

        let labels: Vec<&str> = controls.pages.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["1", "2", "3"]);
        assert!(controls.pages[1].current);
    }

    #[test]
    fn test_edges_disable_buttons() {
        let state = state(1, 10);
        let controls = PaginationControls::new(&state, &state.pagination(5));
        assert!(controls.first.disabled && controls.previous.disabled);
        assert!(controls.next.disabled && controls.last.disabled);
    }

    #[test]
    fn test_page_past_end_cannot_go_further() {
        let state = state(9, 10);
        let controls = PaginationControls::new(&state, &state.pagination(25));

        assert!(controls.next.disabled && controls.last.disabled);
        assert_eq!(controls.last.target.page, 3);
        assert!(!controls.previous.disabled);
        assert_eq!(controls.previous.target.page, 8);
    }

    #[test]
    fn test_page_size_targets_keep_page_and_query() {
        let state = state(3, 10).with_query("lamp").go_to(3);
        let controls = PaginationControls::new(&state, &state.pagination(40));

        let sizes: Vec<usize> = controls.page_size.options.iter().map(|o| o.size).collect();
        assert_eq!(sizes, vec![10, 20, 50, 100]);
        assert_eq!(controls.page_size.label, "Items per page:");
        assert_eq!(controls.page_size.selected, 10);

        let target = &controls.page_size.options[3].target;
        assert_eq!(target.page, 3);
        assert_eq!(target.query, "lamp");
        assert_eq!(target.per_page.get(), 100);
    }

    #[test]
    fn test_search_box_result_label() {
        assert_eq!(SearchBox::new("", "Search...", 9).result_label, None);
        assert_eq!(
            SearchBox::new("a", "Search...", 1).result_label.as_deref(),
            Some("Found 1 result")
        );
        assert_eq!(
            SearchBox::new("a", "Search...", 0).result_label.as_deref(),
            Some("Found 0 results")
        );
        assert!(!SearchBox::new("a", "Search...", 0).keep_page().resets_page);
    }

    #[test]
    fn test_user_filter_options() {
        let users: Vec<User> = serde_json::from_value(serde_json::json!([
            {"id": "u1", "name": "Alice Johnson", "email": "alice@example.com"},
            {"id": "u2", "name": "Bob Smith", "email": "bob@example.com"}
        ]))
        .unwrap();

        let filter = UserFilter::new(&users, Some("u2"));
        let labels: Vec<&str> = filter.options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["All Users", "Alice Johnson (u1)", "Bob Smith (u2)"]);
        assert!(!filter.options[0].selected);
        assert!(filter.options[2].selected);
    }
}
