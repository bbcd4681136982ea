use std::cmp::Reverse;

use chrono::{DateTime, Utc};

pub mod fetch;
pub mod interactions;
pub mod items;
pub mod join;
pub mod metrics;
pub mod pagination;
pub mod pipeline;
pub mod recommendations;
pub mod search;
pub mod users;

pub use fetch::{Fetch, LoadState};
pub use join::ItemIndex;
pub use pagination::{PaginationInfo, TableState};
pub use search::{search, SearchOptions};

/// Default limit of the per-user, per-item and per-type interaction reads
pub const DEFAULT_INTERACTION_LIMIT: usize = 50;

/// Sorts newest first by `key`; records without a timestamp go last
///
/// Stable, so records with equal keys keep their store order.
pub(crate) fn sort_newest_first<T, F>(records: &mut [T], key: F)
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    records.sort_by_key(|record| Reverse(key(record)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sort_newest_first_puts_missing_last() {
        let day = |d| Some(Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap());
        let mut records = vec![("a", day(1)), ("b", None), ("c", day(9)), ("d", day(1))];

        sort_newest_first(&mut records, |r| r.1);

        let ids: Vec<&str> = records.iter().map(|r| r.0).collect();
        assert_eq!(ids, vec!["c", "a", "d", "b"]);
    }
}
