//! Derived views: read-only projections of [`PackingState`] for display
//!
//! Everything here is a pure function of borrowed state and is recomputed on
//! every call. Results borrow items from the state instead of cloning them.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::activity::{Activity, ActivityDetails, ActivityKind};
use crate::category::CategoryRegistry;
use crate::model::{Category, Item};
use crate::state::PackingState;

/// How far back "recently added" looks
pub const RECENT_WINDOW_HOURS: i64 = 24;

// ============================================================================
// Panes
// ============================================================================

pub fn unpacked_items(state: &PackingState) -> Vec<&Item> {
    state.items.iter().filter(|item| !item.is_packed).collect()
}

pub fn packed_items(state: &PackingState) -> Vec<&Item> {
    state.items.iter().filter(|item| item.is_packed).collect()
}

/// Case-insensitive substring match against item name or category key.
///
/// An empty query returns every item unchanged.
pub fn filter_by_search<'a, I>(items: I, query: &str) -> Vec<&'a Item>
where
    I: IntoIterator<Item = &'a Item>,
{
    if query.is_empty() {
        return items.into_iter().collect();
    }
    let needle = query.to_lowercase();
    items
        .into_iter()
        .filter(|item| {
            item.name.to_lowercase().contains(&needle)
                || item.category.key().to_lowercase().contains(&needle)
        })
        .collect()
}

/// Unpacked items matching the unpacked pane's query
pub fn unpacked_search_results(state: &PackingState) -> Vec<&Item> {
    filter_by_search(unpacked_items(state), &state.unpacked_search_query)
}

/// Packed items matching the packed pane's query
pub fn packed_search_results(state: &PackingState) -> Vec<&Item> {
    filter_by_search(packed_items(state), &state.packed_search_query)
}

/// Unpacked items in the selected category; empty when the filter is "all"
pub fn top_suggestions(state: &PackingState) -> Vec<&Item> {
    let Some(category) = state.selected_category.category() else {
        return Vec::new();
    };
    state
        .items
        .iter()
        .filter(|item| !item.is_packed && &item.category == category)
        .collect()
}

/// Item counts shown in pane headers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PackingSummary {
    pub total: usize,
    pub packed: usize,
    pub unpacked: usize,
}

pub fn summary(state: &PackingState) -> PackingSummary {
    let packed = state.items.iter().filter(|item| item.is_packed).count();
    PackingSummary {
        total: state.items.len(),
        packed,
        unpacked: state.items.len() - packed,
    }
}

// ============================================================================
// Category grouping
// ============================================================================

/// Items partitioned by category, one entry per known category
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryGroups<'a> {
    groups: Vec<(Category, Vec<&'a Item>)>,
}

impl<'a> CategoryGroups<'a> {
    /// Items of `category`, or `None` if the category is unknown
    pub fn get(&self, category: &Category) -> Option<&[&'a Item]> {
        self.groups
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, items)| items.as_slice())
    }

    /// Every group, empty ones included, in registry order
    pub fn iter(&self) -> impl Iterator<Item = (&Category, &[&'a Item])> {
        self.groups.iter().map(|(c, items)| (c, items.as_slice()))
    }

    /// Only the groups that contain items
    pub fn non_empty(&self) -> impl Iterator<Item = (&Category, &[&'a Item])> {
        self.iter().filter(|(_, items)| !items.is_empty())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Partition `items` by category.
///
/// The result holds every registered category, in registry order, even when
/// its group is empty. Items whose category isn't registered get a trailing
/// group of their own.
pub fn group_by_category<'a, I>(items: I, registry: &CategoryRegistry) -> CategoryGroups<'a>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut groups: Vec<(Category, Vec<&'a Item>)> = registry
        .categories()
        .map(|c| (c.clone(), Vec::new()))
        .collect();

    for item in items {
        match groups.iter_mut().find(|(c, _)| c == &item.category) {
            Some((_, group)) => group.push(item),
            None => groups.push((item.category.clone(), vec![item])),
        }
    }

    CategoryGroups { groups }
}

// ============================================================================
// Sorting
// ============================================================================

/// Sort orders offered by the list panes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Keep state order
    #[default]
    Unsorted,
    /// By name, compared by Unicode lowercase form
    Alphabetical,
    /// By category key
    Category,
    /// By number of tags, fewest first
    Tags,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::Unsorted,
        SortOrder::Alphabetical,
        SortOrder::Category,
        SortOrder::Tags,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            SortOrder::Unsorted => "unsorted",
            SortOrder::Alphabetical => "alphabetical",
            SortOrder::Category => "category",
            SortOrder::Tags => "tags",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Unsorted => "Default",
            SortOrder::Alphabetical => "Alphabetical (A-Z)",
            SortOrder::Category => "By Category",
            SortOrder::Tags => "By Tags",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|order| order.id() == id)
    }

    /// Sorted copy of `items`. Stable: equal keys keep their input order.
    pub fn apply<'a>(&self, items: &[&'a Item]) -> Vec<&'a Item> {
        let mut sorted = items.to_vec();
        match self {
            SortOrder::Unsorted => {}
            SortOrder::Alphabetical => sorted.sort_by_cached_key(|item| item.name.to_lowercase()),
            SortOrder::Category => sorted.sort_by(|a, b| a.category.cmp(&b.category)),
            SortOrder::Tags => sorted.sort_by_key(|item| item.tags.len()),
        }
        sorted
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ============================================================================
// Activity
// ============================================================================

/// Items added within the last [`RECENT_WINDOW_HOURS`] before `now`, newest first
pub fn recently_added(state: &PackingState, now: DateTime<Utc>) -> Vec<&Item> {
    recently_added_within(state, now, Duration::hours(RECENT_WINDOW_HOURS))
}

/// Items whose ADD_ITEM activity is less than `window` before `now`.
///
/// Activities whose item no longer resolves are skipped.
pub fn recently_added_within(
    state: &PackingState,
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<&Item> {
    state
        .activity_log
        .iter()
        .filter(|activity| activity.kind == ActivityKind::AddItem)
        .filter(|activity| now.signed_duration_since(activity.timestamp) < window)
        .filter_map(|activity| activity.item_id.as_ref())
        .filter_map(|id| state.item(id))
        .collect()
}

/// Activities grouped by calendar day in `tz`, preserving log order
pub fn group_activity_by_day<'a, Tz: TimeZone>(
    log: &'a [Activity],
    tz: &Tz,
) -> Vec<(NaiveDate, Vec<&'a Activity>)> {
    let mut days: Vec<(NaiveDate, Vec<&'a Activity>)> = Vec::new();
    for activity in log {
        let date = activity.timestamp.with_timezone(tz).date_naive();
        match days.iter_mut().find(|(day, _)| *day == date) {
            Some((_, entries)) => entries.push(activity),
            None => days.push((date, vec![activity])),
        }
    }
    days
}

/// One-line description of an activity for the history view
pub fn describe_activity(activity: &Activity, state: &PackingState) -> String {
    let item_name = activity
        .item_id
        .as_ref()
        .and_then(|id| state.item(id))
        .map_or("Unknown item", |item| item.name.as_str());

    match (&activity.kind, &activity.details) {
        (ActivityKind::AddItem, _) => format!("Added \"{}\" to the list", item_name),
        (ActivityKind::Pack, _) => format!("Packed \"{}\"", item_name),
        (ActivityKind::Unpack, _) => format!("Unpacked \"{}\"", item_name),
        (ActivityKind::UnpackAll, _) => "Unpacked all items".to_string(),
        (ActivityKind::EditItem, Some(ActivityDetails::Renamed { old_name, new_name })) => {
            format!("Renamed \"{}\" to \"{}\"", old_name, new_name)
        }
        (ActivityKind::EditItem, _) => format!("Edited \"{}\"", item_name),
        (ActivityKind::AddTag, Some(ActivityDetails::Tagged { tag })) => {
            format!("Tagged \"{}\" with \"{}\"", item_name, tag)
        }
        (ActivityKind::AddTag, _) => format!("Tagged \"{}\"", item_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityId, Stamp};
    use crate::category::CategoryStyle;
    use crate::state::CategoryFilter;
    use chrono::FixedOffset;
    use pretty_assertions::assert_eq;

    fn names(items: &[&Item]) -> Vec<String> {
        items.iter().map(|item| item.name.clone()).collect()
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    fn added(id: &str, item: &str, when: DateTime<Utc>) -> Activity {
        Activity::new(
            &Stamp::new(ActivityId::new(id), when),
            ActivityKind::AddItem,
            Some(item.into()),
        )
    }

    fn state() -> PackingState {
        PackingState::new(vec![
            Item::with_id("a", "Boots", Category::Clothing),
            Item::with_id("b", "apple", Category::Food).packed(),
            Item::with_id("c", "Zed", Category::Books).tagged("x").tagged("y"),
            Item::with_id("d", "Laptop", Category::Electronics).packed().tagged("work"),
        ])
    }

    #[test]
    fn test_panes() {
        let state = state();
        assert_eq!(names(&unpacked_items(&state)), vec!["Boots", "Zed"]);
        assert_eq!(names(&packed_items(&state)), vec!["apple", "Laptop"]);
        assert_eq!(
            summary(&state),
            PackingSummary {
                total: 4,
                packed: 2,
                unpacked: 2
            }
        );
    }

    #[test]
    fn test_empty_search_is_identity() {
        let state = state();
        let all: Vec<&Item> = state.items.iter().collect();
        assert_eq!(filter_by_search(all.clone(), ""), all);
    }

    #[test]
    fn test_search_matches_name_or_category() {
        let state = state();
        assert_eq!(names(&filter_by_search(&state.items, "BOO")), vec!["Boots", "Zed"]);
        assert_eq!(names(&filter_by_search(&state.items, "tron")), vec!["Laptop"]);
        assert!(filter_by_search(&state.items, "xyz").is_empty());
    }

    #[test]
    fn test_pane_queries_are_independent() {
        let mut state = state();
        state.unpacked_search_query = "zed".into();
        state.packed_search_query = "APP".into();

        assert_eq!(names(&unpacked_search_results(&state)), vec!["Zed"]);
        assert_eq!(names(&packed_search_results(&state)), vec!["apple"]);
    }

    #[test]
    fn test_group_by_category() {
        let items = [
            Item::with_id("a", "A", Category::Clothing),
            Item::with_id("b", "B", Category::Clothing),
            Item::with_id("c", "C", Category::Food),
        ];
        let registry = CategoryRegistry::default();
        let groups = group_by_category(&items, &registry);

        assert_eq!(groups.len(), 9);
        assert_eq!(names(groups.get(&Category::Clothing).unwrap()), vec!["A", "B"]);
        assert_eq!(names(groups.get(&Category::Food).unwrap()), vec!["C"]);
        assert_eq!(groups.get(&Category::Books).unwrap().len(), 0);

        let non_empty: Vec<_> = groups.non_empty().map(|(c, _)| c.clone()).collect();
        assert_eq!(non_empty, vec![Category::Clothing, Category::Food]);
    }

    #[test]
    fn test_group_includes_custom_categories() {
        let mut registry = CategoryRegistry::default();
        let camping = registry
            .add_category("camping", CategoryStyle::from_color("bg-green-500"))
            .unwrap();
        let items = [Item::with_id("t", "Tent", camping.clone())];

        let groups = group_by_category(&items, &registry);
        assert_eq!(groups.len(), 10);
        assert_eq!(names(groups.get(&camping).unwrap()), vec!["Tent"]);
    }

    #[test]
    fn test_top_suggestions() {
        let mut state = state();
        assert!(top_suggestions(&state).is_empty());

        state.selected_category = CategoryFilter::Only(Category::Clothing);
        assert_eq!(names(&top_suggestions(&state)), vec!["Boots"]);

        // packed items are not suggested
        state.selected_category = CategoryFilter::Only(Category::Food);
        assert!(top_suggestions(&state).is_empty());
    }

    #[test]
    fn test_sort_alphabetical_ignores_case() {
        let state = state();
        let items: Vec<&Item> = state.items.iter().take(3).collect();

        let sorted = SortOrder::Alphabetical.apply(&items);
        assert_eq!(names(&sorted), vec!["apple", "Boots", "Zed"]);
        assert_eq!(SortOrder::Alphabetical.apply(&sorted), sorted);
        // input untouched
        assert_eq!(names(&items), vec!["Boots", "apple", "Zed"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let items = [
            Item::with_id("1", "sock", Category::Clothing),
            Item::with_id("2", "Sock", Category::Clothing),
            Item::with_id("3", "SOCK", Category::Clothing),
        ];
        let refs: Vec<&Item> = items.iter().collect();
        let ids: Vec<_> = SortOrder::Alphabetical
            .apply(&refs)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_sort_by_category_and_tags() {
        let state = state();
        let items: Vec<&Item> = state.items.iter().collect();

        assert_eq!(
            names(&SortOrder::Category.apply(&items)),
            vec!["Zed", "Boots", "Laptop", "apple"]
        );
        assert_eq!(
            names(&SortOrder::Tags.apply(&items)),
            vec!["Boots", "apple", "Laptop", "Zed"]
        );
        assert_eq!(SortOrder::Unsorted.apply(&items), items);
    }

    #[test]
    fn test_sort_registry() {
        assert_eq!(SortOrder::from_id("tags"), Some(SortOrder::Tags));
        assert_eq!(SortOrder::from_id("random"), None);
        assert_eq!(SortOrder::Alphabetical.label(), "Alphabetical (A-Z)");
        assert_eq!(SortOrder::default(), SortOrder::Unsorted);
    }

    #[test]
    fn test_recently_added_window() {
        let mut state = state();
        let now = at(12);
        state.activity_log = vec![
            added("3", "c", at(11)),
            added("2", "missing", at(10)),
            added("1", "a", now - Duration::hours(25)),
        ];

        assert_eq!(names(&recently_added(&state, now)), vec!["Zed"]);
        assert_eq!(
            names(&recently_added_within(&state, now, Duration::hours(48))),
            vec!["Zed", "Boots"]
        );
    }

    #[test]
    fn test_recently_added_window_is_exclusive() {
        let mut state = state();
        let now = at(12);
        state.activity_log = vec![
            added("3", "c", now - Duration::hours(24) + Duration::seconds(1)),
            added("1", "a", now - Duration::hours(24)),
        ];

        assert_eq!(names(&recently_added(&state, now)), vec!["Zed"]);
    }

    #[test]
    fn test_recently_added_ignores_other_kinds() {
        let mut state = state();
        let stamp = Stamp::new(ActivityId::new("p"), at(11));
        state.activity_log = vec![Activity::new(&stamp, ActivityKind::Pack, Some("b".into()))];
        assert!(recently_added(&state, at(12)).is_empty());
    }

    #[test]
    fn test_group_activity_by_day() {
        let day_two = Utc.with_ymd_and_hms(2024, 6, 2, 1, 0, 0).unwrap();
        let log = vec![
            added("3", "c", day_two),
            added("2", "b", at(20)),
            added("1", "a", at(9)),
        ];

        let utc_days = group_activity_by_day(&log, &Utc);
        assert_eq!(utc_days.len(), 2);
        assert_eq!(utc_days[0].0, NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
        assert_eq!(utc_days[1].1.len(), 2);

        // UTC-5: the 01:00 entry falls on the previous day
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let local_days = group_activity_by_day(&log, &offset);
        assert_eq!(local_days.len(), 1);
        assert_eq!(local_days[0].1.len(), 3);
    }

    #[test]
    fn test_describe_activity() {
        let state = state();
        let stamp = Stamp::new(ActivityId::new("x"), at(9));

        let added = Activity::new(&stamp, ActivityKind::AddItem, Some("a".into()));
        assert_eq!(describe_activity(&added, &state), "Added \"Boots\" to the list");

        let dangling = Activity::new(&stamp, ActivityKind::Pack, Some("gone".into()));
        assert_eq!(describe_activity(&dangling, &state), "Packed \"Unknown item\"");

        let renamed = Activity::new(&stamp, ActivityKind::EditItem, Some("a".into()))
            .with_details(ActivityDetails::Renamed {
                old_name: "Boot".into(),
                new_name: "Boots".into(),
            });
        assert_eq!(describe_activity(&renamed, &state), "Renamed \"Boot\" to \"Boots\"");

        let all = Activity::new(&stamp, ActivityKind::UnpackAll, None);
        assert_eq!(describe_activity(&all, &state), "Unpacked all items");

        let tagged = Activity::new(&stamp, ActivityKind::AddTag, Some("c".into()))
            .with_details(ActivityDetails::Tagged { tag: "y".into() });
        assert_eq!(describe_activity(&tagged, &state), "Tagged \"Zed\" with \"y\"");
    }
}
