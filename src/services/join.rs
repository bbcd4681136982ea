use std::collections::HashMap;

use crate::models::{Item, Recommendation};

/// Lookup from item id to item, built once per page activation
///
/// When ids repeat the first item wins.
#[derive(Debug, Default)]
pub struct ItemIndex<'a> {
    by_id: HashMap<&'a str, &'a Item>,
}

impl<'a> ItemIndex<'a> {
    pub fn new(items: &'a [Item]) -> Self {
        let mut by_id = HashMap::with_capacity(items.len());
        for item in items {
            by_id.entry(item.id.as_str()).or_insert(item);
        }
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a Item> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Pairs each recommendation with its item, in order
    ///
    /// Recommendations whose item is unknown are dropped.
    pub fn join<'r, I>(&self, recommendations: I) -> Vec<(&'r Recommendation, &'a Item)>
    where
        I: IntoIterator<Item = &'r Recommendation>,
    {
        recommendations
            .into_iter()
            .filter_map(|rec| self.get(&rec.item_id).map(|item| (rec, item)))
            .collect()
    }
}
