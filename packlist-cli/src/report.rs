//! Text and JSON rendering of the final state

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use packlist::logger::ActionLogEntry;
use packlist::view::{self, PackingSummary, SortOrder};
use packlist::{
    Category, CategoryRegistry, Item, Notification, PackingActionCategory, PackingState,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group<'a> {
    pub category: Category,
    pub style: Option<&'a str>,
    pub items: Vec<&'a Item>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub date: NaiveDate,
    pub entries: Vec<String>,
}

/// Dispatch counts for one action category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub category: &'static str,
    pub dispatched: usize,
    pub changed: usize,
}

/// Per-category dispatch counts, kept in category order
#[derive(Debug)]
pub struct ActionTally(Vec<(PackingActionCategory, Tally)>);

impl Default for ActionTally {
    fn default() -> Self {
        let counts = PackingActionCategory::all()
            .iter()
            .map(|&category| {
                let tally = Tally {
                    category: category.name(),
                    dispatched: 0,
                    changed: 0,
                };
                (category, tally)
            })
            .collect();
        Self(counts)
    }
}

impl ActionTally {
    pub fn record(&mut self, category: PackingActionCategory, changed: bool) {
        if let Some((_, tally)) = self.0.iter_mut().find(|(c, _)| *c == category) {
            tally.dispatched += 1;
            if changed {
                tally.changed += 1;
            }
        }
    }

    /// Categories that saw at least one dispatch
    pub fn finish(self) -> Vec<Tally> {
        self.0
            .into_iter()
            .map(|(_, tally)| tally)
            .filter(|tally| tally.dispatched > 0)
            .collect()
    }
}

/// Everything the CLI shows after a script has run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report<'a> {
    pub sort: &'static str,
    pub summary: PackingSummary,
    pub notifications: Vec<Notification>,
    pub unpacked: Vec<Group<'a>>,
    pub packed: Vec<Group<'a>>,
    pub suggestions: Vec<&'a Item>,
    pub recently_added: Vec<&'a Item>,
    pub history: Vec<Day>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Tally>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dispatch_log: Vec<&'a ActionLogEntry>,
}

fn groups<'a>(
    items: Vec<&'a Item>,
    sort: SortOrder,
    registry: &'a CategoryRegistry,
) -> Vec<Group<'a>> {
    let sorted = sort.apply(&items);
    view::group_by_category(sorted, registry)
        .non_empty()
        .map(|(category, items)| Group {
            category: category.clone(),
            style: registry.style(category).map(|s| s.as_str()),
            items: items.to_vec(),
        })
        .collect()
}

impl<'a> Report<'a> {
    pub fn build<Tz: TimeZone>(
        state: &'a PackingState,
        registry: &'a CategoryRegistry,
        sort: SortOrder,
        now: DateTime<Utc>,
        tz: &Tz,
        notifications: Vec<Notification>,
        dispatch_log: Vec<&'a ActionLogEntry>,
    ) -> Self {
        let history = view::group_activity_by_day(&state.activity_log, tz)
            .into_iter()
            .map(|(date, activities)| Day {
                date,
                entries: activities
                    .into_iter()
                    .map(|a| view::describe_activity(a, state))
                    .collect(),
            })
            .collect();

        Self {
            sort: sort.id(),
            summary: view::summary(state),
            notifications,
            unpacked: groups(view::unpacked_search_results(state), sort, registry),
            packed: groups(view::packed_search_results(state), sort, registry),
            suggestions: view::top_suggestions(state),
            recently_added: view::recently_added(state, now),
            history,
            actions: Vec::new(),
            dispatch_log,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        writeln!(
            out,
            "Unpacked ({})  sorted: {}",
            self.summary.unpacked, self.sort
        )?;
        write_groups(out, &self.unpacked)?;
        writeln!(out, "Packed ({})", self.summary.packed)?;
        write_groups(out, &self.packed)?;

        if !self.suggestions.is_empty() {
            writeln!(out, "Suggestions")?;
            for item in &self.suggestions {
                writeln!(out, "  - {}", item.name)?;
            }
        }

        if !self.recently_added.is_empty() {
            writeln!(out, "Recently added")?;
            for item in &self.recently_added {
                writeln!(out, "  - {} ({})", item.name, item.category)?;
            }
        }

        if !self.history.is_empty() {
            writeln!(out, "History")?;
            for day in &self.history {
                writeln!(out, "  {}", day.date.format("%A, %B %-d, %Y"))?;
                for entry in &day.entries {
                    writeln!(out, "    {}", entry)?;
                }
            }
        }

        if !self.actions.is_empty() {
            writeln!(out, "Actions")?;
            for tally in &self.actions {
                writeln!(
                    out,
                    "  {}: {} dispatched, {} changed",
                    tally.category, tally.dispatched, tally.changed
                )?;
            }
        }

        if !self.dispatch_log.is_empty() {
            writeln!(out, "Dispatched")?;
            for entry in &self.dispatch_log {
                let changed = match entry.state_changed {
                    Some(true) => "changed",
                    Some(false) => "no-op",
                    None => "?",
                };
                writeln!(out, "  #{} {} [{}]", entry.sequence, entry.summary, changed)?;
            }
        }
        Ok(())
    }
}

fn write_groups(out: &mut String, groups: &[Group<'_>]) -> std::fmt::Result {
    if groups.is_empty() {
        writeln!(out, "  (empty)")?;
    }
    for group in groups {
        writeln!(out, "  {}", group.category)?;
        for item in &group.items {
            if item.tags.is_empty() {
                writeln!(out, "    - {}", item.name)?;
            } else {
                writeln!(out, "    - {} [{}]", item.name, item.tags.join(", "))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use packlist::testing::{fixtures, test_store};
    use packlist::{CategoryFilter, PackingAction};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_text_report() {
        let mut store = test_store(fixtures::all());
        store.dispatch(PackingAction::ItemTogglePack("passport".into()));
        store.dispatch(PackingAction::FilterSelectCategory(CategoryFilter::Only(
            Category::Clothing,
        )));

        let report = Report::build(
            store.state(),
            store.registry(),
            SortOrder::Alphabetical,
            now(),
            &Utc,
            Vec::new(),
            Vec::new(),
        );
        let text = report.to_text();

        assert!(text.starts_with("Unpacked (2)  sorted: alphabetical\n  clothing\n    - Socks\n"));
        assert!(text.contains("Packed (2)\n  electronics\n    - Charger\n  documents\n    - Passport [essentials]\n"));
        assert!(text.contains("Suggestions\n  - Socks\n"));
        assert!(text.contains("History\n  Monday, January 1, 2024\n    Packed \"Passport\"\n"));
    }

    #[test]
    fn test_json_report() {
        let mut store = test_store(fixtures::all());
        store.dispatch(PackingAction::ListUnpackAll);
        let notifications = store.drain_notifications();

        let report = Report::build(
            store.state(),
            store.registry(),
            SortOrder::Unsorted,
            now(),
            &Utc,
            notifications,
            Vec::new(),
        );
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["summary"]["packed"], 0);
        assert_eq!(json["notifications"][0]["message"], "All items unpacked!");
        assert_eq!(json["unpacked"][0]["category"], "clothing");
        assert_eq!(json["unpacked"][0]["style"], "bg-blue-100 text-blue-900");
        assert_eq!(json["history"][0]["date"], "2024-01-01");
        assert_eq!(json["history"][0]["entries"][0], "Unpacked all items");
        assert!(json.get("dispatchLog").is_none());
        assert!(json.get("actions").is_none());
    }

    #[test]
    fn test_action_tally_by_category() {
        let mut store = test_store(fixtures::all());
        let mut tally = ActionTally::default();
        for action in [
            PackingAction::ItemTogglePack("socks".into()),
            PackingAction::ItemTogglePack("missing".into()),
            PackingAction::SearchSetPacked("so".into()),
            PackingAction::Unknown,
        ] {
            let category = action.category_enum();
            let changed = store.dispatch(action);
            tally.record(category, changed);
        }

        let mut report = Report::build(
            store.state(),
            store.registry(),
            SortOrder::Unsorted,
            now(),
            &Utc,
            Vec::new(),
            Vec::new(),
        );
        report.actions = tally.finish();

        assert_eq!(
            report.actions,
            vec![
                Tally {
                    category: "item",
                    dispatched: 2,
                    changed: 1,
                },
                Tally {
                    category: "search",
                    dispatched: 1,
                    changed: 1,
                },
                Tally {
                    category: "uncategorized",
                    dispatched: 1,
                    changed: 0,
                },
            ]
        );
        let text = report.to_text();
        assert!(text.contains("Actions\n  item: 2 dispatched, 1 changed\n"));
    }
}
