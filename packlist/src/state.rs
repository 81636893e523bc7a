//! Application state - single source of truth
//!
//! Collaborators only ever see `&PackingState` (or an `Arc` snapshot of it).
//! New values are produced by the reducer and swapped in by the store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::activity::Activity;
use crate::model::{Category, Item, ItemId};

/// Category filter selected in the sidebar
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn parse(key: &str) -> Self {
        if key.trim().eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(Category::from_key(key))
        }
    }

    pub fn key(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.key(),
        }
    }

    pub fn category(&self) -> Option<&Category> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(category) => Some(category),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for CategoryFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(CategoryFilter::parse(&key))
    }
}

/// Everything the presentation layer needs to render
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingState {
    pub items: Vec<Item>,
    pub selected_category: CategoryFilter,
    pub unpacked_search_query: String,
    pub packed_search_query: String,
    /// Newest first
    pub activity_log: Vec<Activity>,
}

impl PackingState {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Look up an item by id
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub(crate) fn item_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    pub fn contains_item(&self, id: &ItemId) -> bool {
        self.item(id).is_some()
    }

    pub fn has_packed_items(&self) -> bool {
        self.items.iter().any(|item| item.is_packed)
    }

    pub(crate) fn record(&mut self, activity: Activity) {
        self.activity_log.insert(0, activity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_filter_parse() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(" ALL "), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse("Food"),
            CategoryFilter::Only(Category::Food)
        );
        assert_eq!(CategoryFilter::Only(Category::Books).key(), "books");
    }

    #[test]
    fn test_item_lookup() {
        let state = PackingState::new(vec![
            Item::with_id("a", "Socks", Category::Clothing),
            Item::with_id("b", "Charger", Category::Electronics).packed(),
        ]);

        assert_eq!(state.item(&"b".into()).map(|i| i.name.as_str()), Some("Charger"));
        assert!(state.item(&"missing".into()).is_none());
        assert!(state.has_packed_items());
    }

    #[test]
    fn test_default_state() {
        let state = PackingState::default();
        assert!(state.items.is_empty());
        assert_eq!(state.selected_category, CategoryFilter::All);
        assert!(state.unpacked_search_query.is_empty());
        assert!(state.activity_log.is_empty());
    }
}
