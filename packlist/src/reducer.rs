//! Reducer - the packing list's state transitions
//!
//! `reduce` mutates a working copy and returns `true` if anything changed.
//! `transition` is the pure form used by the store: it never touches its
//! input and returns the next state.
//!
//! Every rule lives here. Missing items, duplicate ids, unregistered
//! categories and redundant moves are no-ops, never errors.

use crate::action::PackingAction;
use crate::activity::{Activity, ActivityDetails, ActivityKind, Stamp};
use crate::category::CategoryRegistry;
use crate::model::{Item, ItemId};
use crate::state::{CategoryFilter, PackingState};

/// Inputs a transition needs besides the state and the action
#[derive(Clone, Copy, Debug)]
pub struct ReduceContext<'a> {
    /// Identity and time for any activity recorded by this transition
    pub stamp: &'a Stamp,
    /// Categories items may be created in
    pub registry: &'a CategoryRegistry,
}

impl<'a> ReduceContext<'a> {
    pub fn new(stamp: &'a Stamp, registry: &'a CategoryRegistry) -> Self {
        Self { stamp, registry }
    }

    fn activity(&self, kind: ActivityKind, item_id: Option<ItemId>) -> Activity {
        Activity::new(self.stamp, kind, item_id)
    }
}

/// Pure transition: `(state, action) -> next state`.
///
/// Returns a clone of `state` when the action is a no-op.
pub fn transition(
    state: &PackingState,
    action: PackingAction,
    ctx: &ReduceContext<'_>,
) -> PackingState {
    let mut next = state.clone();
    reduce(&mut next, action, ctx);
    next
}

/// Apply `action` to `state` in place.
///
/// # Returns
/// `true` if state changed
pub fn reduce(state: &mut PackingState, action: PackingAction, ctx: &ReduceContext<'_>) -> bool {
    match action {
        // ===== Filter / search =====
        PackingAction::FilterSelectCategory(filter) => {
            if let CategoryFilter::Only(category) = &filter {
                if !ctx.registry.contains(category) {
                    return false;
                }
            }
            set_if_changed(&mut state.selected_category, filter)
        }

        PackingAction::SearchSetUnpacked(query) => {
            set_if_changed(&mut state.unpacked_search_query, query)
        }

        PackingAction::SearchSetPacked(query) => {
            set_if_changed(&mut state.packed_search_query, query)
        }

        // ===== Items =====
        PackingAction::ItemAdd(item) => add_item(state, item, ctx),

        PackingAction::ItemTogglePack(id) => {
            let Some(item) = state.item_mut(&id) else {
                return false;
            };
            item.is_packed = !item.is_packed;
            let kind = ActivityKind::for_packed(item.is_packed);
            state.record(ctx.activity(kind, Some(id)));
            true
        }

        PackingAction::ItemRename { id, name } => {
            let name = name.trim();
            if name.is_empty() {
                return false;
            }
            let Some(item) = state.item_mut(&id) else {
                return false;
            };
            let old_name = std::mem::replace(&mut item.name, name.to_string());
            let details = ActivityDetails::Renamed {
                old_name,
                new_name: name.to_string(),
            };
            state.record(ctx.activity(ActivityKind::EditItem, Some(id)).with_details(details));
            true
        }

        PackingAction::ItemMove { id, is_packed } => {
            let Some(item) = state.item_mut(&id) else {
                return false;
            };
            if item.is_packed == is_packed {
                return false;
            }
            item.is_packed = is_packed;
            state.record(ctx.activity(ActivityKind::for_packed(is_packed), Some(id)));
            true
        }

        PackingAction::ItemAddTag { id, tag } => {
            let Some(item) = state.item_mut(&id) else {
                return false;
            };
            if !item.insert_tag(&tag) {
                return false;
            }
            let details = ActivityDetails::Tagged {
                tag: tag.trim().to_string(),
            };
            state.record(ctx.activity(ActivityKind::AddTag, Some(id)).with_details(details));
            true
        }

        // ===== List =====
        PackingAction::ListUnpackAll => {
            let mut count = 0;
            for item in state.items.iter_mut().filter(|item| item.is_packed) {
                item.is_packed = false;
                count += 1;
            }
            if count == 0 {
                return false;
            }
            let details = ActivityDetails::UnpackedAll { count };
            state.record(ctx.activity(ActivityKind::UnpackAll, None).with_details(details));
            true
        }

        PackingAction::Unknown => false,
    }
}

fn add_item(state: &mut PackingState, item: Item, ctx: &ReduceContext<'_>) -> bool {
    let name = item.name.trim();
    if name.is_empty() || !ctx.registry.contains(&item.category) {
        return false;
    }
    if state.contains_item(&item.id) {
        return false;
    }

    // Normalize: trimmed name, tags with set semantics
    let mut new_item = Item {
        name: name.to_string(),
        tags: Vec::with_capacity(item.tags.len()),
        ..item
    };
    for tag in &item.tags {
        new_item.insert_tag(tag);
    }

    let id = new_item.id.clone();
    state.items.push(new_item);
    state.record(ctx.activity(ActivityKind::AddItem, Some(id)));
    true
}

fn set_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
