//! Test utilities for code built on packlist
//!
//! - [`SequentialStamps`]: deterministic activity ids and timestamps
//! - [`fixtures`]: a handful of ready-made items
//! - [`test_store`]: a store wired with both
//! - [`ActivityAssertions`]: assertions over activity-kind sequences
//!
//! # Example
//!
//! ```
//! use packlist::testing::{fixtures, test_store, ActivityAssertions};
//! use packlist::{ActivityKind, PackingAction};
//!
//! let mut store = test_store(vec![fixtures::socks()]);
//! store.dispatch(PackingAction::ItemTogglePack("socks".into()));
//! store.dispatch(PackingAction::ItemTogglePack("socks".into()));
//!
//! store
//!     .state()
//!     .assert_activity_kinds(&[ActivityKind::Unpack, ActivityKind::Pack]);
//! ```

use chrono::{DateTime, Duration, Utc};

use crate::activity::{Activity, ActivityId, ActivityKind, Stamp, StampSource};
use crate::model::Item;
use crate::state::PackingState;
use crate::store::Store;

/// 2024-01-01T00:00:00Z
const DEFAULT_START: i64 = 1_704_067_200;

/// Stamp source yielding `activity-1`, `activity-2`, ... one second apart
#[derive(Debug, Clone)]
pub struct SequentialStamps {
    issued: u64,
    start: DateTime<Utc>,
    step: Duration,
}

impl Default for SequentialStamps {
    fn default() -> Self {
        Self::starting_at(DateTime::from_timestamp(DEFAULT_START, 0).unwrap_or_default())
    }
}

impl SequentialStamps {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            issued: 0,
            start,
            step: Duration::seconds(1),
        }
    }

    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    /// Number of stamps handed out so far
    pub fn issued(&self) -> u64 {
        self.issued
    }
}

impl StampSource for SequentialStamps {
    fn next_stamp(&mut self) -> Stamp {
        let offset = i32::try_from(self.issued).unwrap_or(i32::MAX);
        let at = self.start + self.step * offset;
        self.issued += 1;
        Stamp::new(ActivityId::new(format!("activity-{}", self.issued)), at)
    }
}

/// Ready-made items with stable ids
pub mod fixtures {
    use crate::model::{Category, Item};

    /// Unpacked, id `socks`
    pub fn socks() -> Item {
        Item::with_id("socks", "Socks", Category::Clothing)
    }

    /// Packed, id `charger`
    pub fn charger() -> Item {
        Item::with_id("charger", "Charger", Category::Electronics).packed()
    }

    /// Unpacked, id `passport`, tagged `essentials`
    pub fn passport() -> Item {
        Item::with_id("passport", "Passport", Category::Documents).tagged("essentials")
    }

    /// Unpacked, id `toothbrush`
    pub fn toothbrush() -> Item {
        Item::with_id("toothbrush", "Toothbrush", Category::Toiletries)
    }

    pub fn all() -> Vec<Item> {
        vec![socks(), charger(), passport(), toothbrush()]
    }
}

/// Store over `items` with the built-in categories and [`SequentialStamps`]
pub fn test_store(items: Vec<Item>) -> Store {
    Store::builder()
        .items(items)
        .stamps(SequentialStamps::default())
        .build()
}

/// Assertions over an activity log (newest first)
pub trait ActivityAssertions {
    fn activities(&self) -> &[Activity];

    fn activity_kinds(&self) -> Vec<ActivityKind> {
        self.activities().iter().map(|a| a.kind).collect()
    }

    /// Panics unless the log holds exactly `expected`, newest first
    #[track_caller]
    fn assert_activity_kinds(&self, expected: &[ActivityKind]) {
        let actual = self.activity_kinds();
        assert_eq!(
            actual, expected,
            "activity log mismatch (newest first)\n  actual:   {:?}\n  expected: {:?}",
            actual, expected
        );
    }

    /// Panics unless the newest activity has `kind` and targets `item_id`
    #[track_caller]
    fn assert_latest_activity(&self, kind: ActivityKind, item_id: Option<&str>) {
        let Some(latest) = self.activities().first() else {
            panic!("expected a {} activity, but the log is empty", kind);
        };
        assert_eq!(latest.kind, kind, "latest activity kind");
        assert_eq!(
            latest.item_id.as_ref().map(|id| id.as_str()),
            item_id,
            "latest activity item"
        );
    }
}

impl ActivityAssertions for PackingState {
    fn activities(&self) -> &[Activity] {
        &self.activity_log
    }
}

impl ActivityAssertions for [Activity] {
    fn activities(&self) -> &[Activity] {
        self
    }
}

impl ActivityAssertions for Vec<Activity> {
    fn activities(&self) -> &[Activity] {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::PackingAction;

    #[test]
    fn test_sequential_stamps() {
        let mut stamps = SequentialStamps::default();
        let first = stamps.next_stamp();
        let second = stamps.next_stamp();

        assert_eq!(first.activity_id.as_str(), "activity-1");
        assert_eq!(second.activity_id.as_str(), "activity-2");
        assert_eq!(second.at - first.at, Duration::seconds(1));
        assert_eq!(first.at.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(stamps.issued(), 2);
    }

    #[test]
    fn test_custom_step() {
        let mut stamps = SequentialStamps::default().with_step(Duration::hours(1));
        let first = stamps.next_stamp();
        let second = stamps.next_stamp();
        assert_eq!(second.at - first.at, Duration::hours(1));
    }

    #[test]
    fn test_activity_assertions() {
        let mut store = test_store(fixtures::all());
        store.dispatch(PackingAction::ItemTogglePack("socks".into()));
        store.dispatch(PackingAction::ItemAddTag {
            id: "passport".into(),
            tag: "travel".into(),
        });

        let state = store.state();
        state.assert_activity_kinds(&[ActivityKind::AddTag, ActivityKind::Pack]);
        state.assert_latest_activity(ActivityKind::AddTag, Some("passport"));
        state.activity_log[1..].assert_activity_kinds(&[ActivityKind::Pack]);
    }

    #[test]
    #[should_panic(expected = "activity log mismatch")]
    fn test_activity_assertions_fail_loudly() {
        let state = PackingState::new(fixtures::all());
        state.assert_activity_kinds(&[ActivityKind::Pack]);
    }
}
