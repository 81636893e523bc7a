//! Notification hook: user-facing feedback for dispatched actions
//!
//! Runs against the state *before* the transition, so it can report old
//! values (the previous name of a renamed item, whether anything was packed).
//! Notifications never gate or alter the transition itself.

use std::collections::VecDeque;

use serde::Serialize;

use crate::action::PackingAction;
use crate::state::PackingState;

/// Notification severity. Only successes are reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
}

/// A transient message for the user
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }
}

/// Notifications for `action` given the pre-transition `state`.
///
/// Lookups that fail (unknown item id) yield nothing; so do actions that
/// would not change the item (redundant move, same name, duplicate tag).
pub fn notifications_for(state: &PackingState, action: &PackingAction) -> Vec<Notification> {
    let message = match action {
        PackingAction::ItemTogglePack(id) => state.item(id).map(|item| {
            let verb = if item.is_packed { "unpacked" } else { "packed" };
            format!("{} {} successfully!", item.name, verb)
        }),

        PackingAction::ItemAdd(item) => {
            let name = item.name.trim();
            (!name.is_empty() && !state.contains_item(&item.id))
                .then(|| format!("{} added to your packing list!", name))
        }

        PackingAction::ItemRename { id, name } => {
            let name = name.trim();
            state
                .item(id)
                .filter(|item| !name.is_empty() && item.name != name)
                .map(|item| format!("Item renamed from \"{}\" to \"{}\"", item.name, name))
        }

        PackingAction::ListUnpackAll => state
            .has_packed_items()
            .then(|| "All items unpacked!".to_string()),

        PackingAction::ItemMove { id, is_packed } => state
            .item(id)
            .filter(|item| item.is_packed != *is_packed)
            .map(|item| {
                let verb = if *is_packed { "packed" } else { "unpacked" };
                format!("{} {}!", item.name, verb)
            }),

        PackingAction::ItemAddTag { id, tag } => {
            let tag = tag.trim();
            state
                .item(id)
                .filter(|item| !tag.is_empty() && !item.has_tag(tag))
                .map(|item| format!("Tagged \"{}\" with \"{}\"", item.name, tag))
        }

        PackingAction::FilterSelectCategory(_)
        | PackingAction::SearchSetUnpacked(_)
        | PackingAction::SearchSetPacked(_)
        | PackingAction::Unknown => None,
    };

    message.map(Notification::success).into_iter().collect()
}

/// Bounded queue of pending notifications; the oldest is dropped when full
#[derive(Clone, Debug)]
pub struct ToastQueue {
    pending: VecDeque<Notification>,
    capacity: usize,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl ToastQueue {
    pub const DEFAULT_CAPACITY: usize = 32;

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            pending: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, notification: Notification) {
        if self.pending.len() >= self.capacity {
            self.pending.pop_front();
        }
        self.pending.push_back(notification);
    }

    /// Take all pending notifications, oldest first
    pub fn drain(&mut self) -> Vec<Notification> {
        self.pending.drain(..).collect()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Notification> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
