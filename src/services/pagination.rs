use std::num::NonZeroUsize;

use serde::Serialize;

/// Page sizes offered by the page-size selector
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];

/// Page-number buttons rendered around the current page
pub const DEFAULT_MAX_VISIBLE: usize = 7;

/// Window of one page over `total_items` records
///
/// `start_index` / `end_index` are 1-based inclusive display bounds. An empty
/// window has `end_index < start_index`. A `current_page` past the last page
/// is kept as given and yields an empty window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub items_per_page: usize,
    pub total_items: usize,
    pub start_index: usize,
    pub end_index: usize,
}

impl PaginationInfo {
    pub fn new(current_page: usize, items_per_page: NonZeroUsize, total_items: usize) -> Self {
        let per_page = items_per_page.get();
        let total_pages = total_items.div_ceil(per_page);
        let offset = current_page.saturating_sub(1).saturating_mul(per_page);
        let end_index = offset.saturating_add(per_page).min(total_items);

        Self {
            current_page,
            total_pages,
            items_per_page: per_page,
            total_items,
            start_index: offset.saturating_add(1),
            end_index,
        }
    }

    /// True when the window holds no records
    pub fn is_empty(&self) -> bool {
        self.end_index < self.start_index
    }

    /// Number of records in the window
    pub fn len(&self) -> usize {
        (self.end_index + 1).saturating_sub(self.start_index)
    }

    /// Slice of `records` covered by this window
    pub fn window<'a, T>(&self, records: &'a [T]) -> &'a [T] {
        if self.is_empty() {
            return &[];
        }
        records.get(self.start_index - 1..self.end_index).unwrap_or(&[])
    }

    /// Page numbers to render as controls
    pub fn page_numbers(&self, max_visible: usize) -> Vec<usize> {
        page_numbers(self.current_page, self.total_pages, max_visible)
    }
}

/// Up to `max_visible` consecutive page numbers centered on `current_page`,
/// shifted to stay within `1..=total_pages`
pub fn page_numbers(current_page: usize, total_pages: usize, max_visible: usize) -> Vec<usize> {
    if total_pages == 0 || max_visible == 0 {
        return Vec::new();
    }

    let half = max_visible / 2;
    let start = current_page.saturating_sub(half).max(1);
    let end = start.saturating_add(max_visible - 1).min(total_pages);
    let start = (end + 1).saturating_sub(max_visible).max(1);

    (start..=end).collect()
}

/// Search and paging state of one table view
///
/// The page is reset to 1 only when a new non-empty query is entered; changing
/// the page size or the underlying data leaves it as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableState {
    #[serde(rename = "q", skip_serializing_if = "String::is_empty")]
    pub query: String,
    pub page: usize,
    #[serde(rename = "perPage")]
    pub per_page: NonZeroUsize,
}

impl TableState {
    pub fn new(per_page: NonZeroUsize) -> Self {
        Self {
            query: String::new(),
            page: 1,
            per_page,
        }
    }

    pub fn with_query(&self, query: impl Into<String>) -> Self {
        let query = query.into();
        let page = if !query.is_empty() && query != self.query {
            1
        } else {
            self.page
        };

        Self {
            query,
            page,
            per_page: self.per_page,
        }
    }

    pub fn with_page_size(&self, per_page: NonZeroUsize) -> Self {
        Self {
            per_page,
            ..self.clone()
        }
    }

    pub fn go_to(&self, page: usize) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Window of this state over `total_items` records
    pub fn pagination(&self, total_items: usize) -> PaginationInfo {
        PaginationInfo::new(self.page, self.per_page, total_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn per_page(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_second_page_of_twenty_five() {
        let info = PaginationInfo::new(2, per_page(10), 25);
        assert_eq!(info.total_pages, 3);
        assert_eq!(info.start_index, 11);
        assert_eq!(info.end_index, 20);
    }

    #[test]
    fn test_last_page_is_clamped() {
        let info = PaginationInfo::new(3, per_page(10), 25);
        assert_eq!(info.start_index, 21);
        assert_eq!(info.end_index, 25);
        assert_eq!(info.len(), 5);
    }

    #[test]
    fn test_no_items() {
        let info = PaginationInfo::new(1, per_page(20), 0);
        assert_eq!(info.total_pages, 0);
        assert!(info.is_empty());
        assert_eq!(info.len(), 0);
        assert!(info.page_numbers(DEFAULT_MAX_VISIBLE).is_empty());
        assert!(info.window::<u8>(&[]).is_empty());
    }

    #[test]
    fn test_page_past_end_is_not_corrected() {
        let info = PaginationInfo::new(5, per_page(10), 25);
        assert_eq!(info.current_page, 5);
        assert!(info.is_empty());
        let records: Vec<usize> = (0..25).collect();
        assert!(info.window(&records).is_empty());
    }

    #[test]
    fn test_window_slices_records() {
        let records: Vec<usize> = (1..=25).collect();
        let info = PaginationInfo::new(2, per_page(10), records.len());
        assert_eq!(info.window(&records), &records[10..20]);
    }

    #[test]
    fn test_window_bounds_hold_for_all_pages() {
        for total in 0..60 {
            for size in 1..12 {
                let info = PaginationInfo::new(1, per_page(size), total);
                assert_eq!(info.total_pages, total.div_ceil(size));
                for page in 1..=info.total_pages {
                    let info = PaginationInfo::new(page, per_page(size), total);
                    assert!(info.end_index <= total);
                    assert!(info.end_index + 1 - info.start_index <= size);
                    assert!(!info.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_page_numbers_centered() {
        assert_eq!(page_numbers(10, 20, 7), vec![7, 8, 9, 10, 11, 12, 13]);
    }

    #[test]
    fn test_page_numbers_near_edges() {
        assert_eq!(page_numbers(1, 20, 7), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(page_numbers(2, 20, 7), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(page_numbers(20, 20, 7), vec![14, 15, 16, 17, 18, 19, 20]);
        assert_eq!(page_numbers(19, 20, 7), vec![14, 15, 16, 17, 18, 19, 20]);
    }

    #[test]
    fn test_page_numbers_fewer_pages_than_visible() {
        assert_eq!(page_numbers(2, 3, 7), vec![1, 2, 3]);
    }

    #[test]
    fn test_page_numbers_current_past_end() {
        assert_eq!(page_numbers(15, 10, 7), vec![4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_page_numbers_bounded() {
        for total in 0..30 {
            for current in 0..35 {
                for max_visible in 0..10 {
                    let pages = page_numbers(current, total, max_visible);
                    assert!(pages.len() <= max_visible);
                    assert!(pages.iter().all(|p| *p >= 1 && *p <= total));
                    assert!(pages.windows(2).all(|w| w[1] == w[0] + 1));
                }
            }
        }
    }

    #[test]
    fn test_new_query_resets_page() {
        let state = TableState::new(per_page(20)).go_to(4);
        let searched = state.with_query("shoe");
        assert_eq!(searched.page, 1);
        assert_eq!(searched.query, "shoe");
    }

    #[test]
    fn test_clearing_or_repeating_query_keeps_page() {
        let state = TableState::new(per_page(20)).with_query("shoe").go_to(3);
        assert_eq!(state.with_query("shoe").page, 3);
        assert_eq!(state.with_query("").page, 3);
    }

    #[test]
    fn test_page_size_change_keeps_page() {
        let state = TableState::new(per_page(10)).go_to(3);
        let resized = state.with_page_size(per_page(100));
        assert_eq!(resized.page, 3);
        assert!(resized.pagination(25).is_empty());
    }

    #[test]
    fn test_table_state_wire_format() {
        let state = TableState::new(per_page(20)).with_query("lamp").go_to(2);
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            serde_json::json!({"q": "lamp", "page": 2, "perPage": 20})
        );

        let blank = TableState::new(per_page(20));
        assert_eq!(
            serde_json::to_value(&blank).unwrap(),
            serde_json::json!({"page": 1, "perPage": 20})
        );
    }
}
