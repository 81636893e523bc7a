//! Activity log records and the stamps that identify them

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::ItemId;

/// Opaque unique identifier of an [`Activity`]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(String);

impl ActivityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What kind of change an activity records
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    AddItem,
    Pack,
    Unpack,
    UnpackAll,
    EditItem,
    AddTag,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::AddItem => "ADD_ITEM",
            ActivityKind::Pack => "PACK",
            ActivityKind::Unpack => "UNPACK",
            ActivityKind::UnpackAll => "UNPACK_ALL",
            ActivityKind::EditItem => "EDIT_ITEM",
            ActivityKind::AddTag => "ADD_TAG",
        }
    }

    /// PACK when the item ends up packed, UNPACK otherwise
    pub fn for_packed(is_packed: bool) -> Self {
        if is_packed {
            ActivityKind::Pack
        } else {
            ActivityKind::Unpack
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific data attached to an activity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ActivityDetails {
    #[serde(rename_all = "camelCase")]
    Renamed { old_name: String, new_name: String },
    Tagged { tag: String },
    UnpackedAll { count: usize },
}

/// Immutable record of one state-changing action
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    /// Weak reference: the item may not resolve. `None` for list-wide activities.
    pub item_id: Option<ItemId>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ActivityDetails>,
}

impl Activity {
    pub fn new(stamp: &Stamp, kind: ActivityKind, item_id: Option<ItemId>) -> Self {
        Self {
            id: stamp.activity_id.clone(),
            kind,
            item_id,
            timestamp: stamp.at,
            details: None,
        }
    }

    pub fn with_details(mut self, details: ActivityDetails) -> Self {
        self.details = Some(details);
        self
    }
}

/// Identity and time handed to the reducer for any activity it records.
///
/// Supplying these from outside keeps the transition a pure function of its
/// inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stamp {
    pub activity_id: ActivityId,
    pub at: DateTime<Utc>,
}

impl Stamp {
    pub fn new(activity_id: ActivityId, at: DateTime<Utc>) -> Self {
        Self { activity_id, at }
    }
}

/// Source of [`Stamp`]s, one per dispatch
pub trait StampSource {
    fn next_stamp(&mut self) -> Stamp;
}

/// Random UUIDs and the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemStamps;

impl StampSource for SystemStamps {
    fn next_stamp(&mut self) -> Stamp {
        Stamp::new(ActivityId::new(Uuid::new_v4().to_string()), Utc::now())
    }
}

impl<F> StampSource for F
where
    F: FnMut() -> Stamp,
{
    fn next_stamp(&mut self) -> Stamp {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_kind_for_packed() {
        assert_eq!(ActivityKind::for_packed(true), ActivityKind::Pack);
        assert_eq!(ActivityKind::for_packed(false), ActivityKind::Unpack);
    }

    #[test]
    fn test_system_stamps_are_unique() {
        let mut stamps = SystemStamps;
        let a = stamps.next_stamp();
        let b = stamps.next_stamp();
        assert_ne!(a.activity_id, b.activity_id);
        assert!(b.at >= a.at);
    }

    #[test]
    fn test_closure_stamp_source() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let mut n = 0;
        let mut source = move || {
            n += 1;
            Stamp::new(ActivityId::new(format!("a{n}")), at)
        };
        assert_eq!(source.next_stamp().activity_id.as_str(), "a1");
        assert_eq!(source.next_stamp().activity_id.as_str(), "a2");
    }

    #[test]
    fn test_activity_json_shape() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let stamp = Stamp::new(ActivityId::new("a1"), at);
        let activity = Activity::new(&stamp, ActivityKind::EditItem, Some(ItemId::new("i1")))
            .with_details(ActivityDetails::Renamed {
                old_name: "Sock".into(),
                new_name: "Socks".into(),
            });

        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["type"], "EDIT_ITEM");
        assert_eq!(json["itemId"], "i1");
        assert_eq!(json["details"]["newName"], "Socks");
    }
}
