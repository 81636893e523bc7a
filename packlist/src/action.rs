//! Actions: typed requests to change the packing state
//!
//! Variant names follow a `Subject` + `Verb` convention so that
//! `#[action(infer_categories)]` groups them (`ItemAdd`, `ItemMove` -> `item`).
//! The wire form keeps the upper-case action names used by UI collaborators:
//!
//! ```text
//! {"type": "ADD_ITEM", "payload": {"name": "Socks", "category": "clothing"}}
//! {"type": "TOGGLE_PACK", "payload": "item-id"}
//! {"type": "MOVE_ITEM", "payload": {"id": "item-id", "isPacked": true}}
//! {"type": "UNPACK_ALL"}
//! ```
//!
//! Object payloads may also be written flat, next to `type`:
//! `{"type": "MOVE_ITEM", "id": "item-id", "isPacked": true}`.
//!
//! Any other `type` decodes to [`PackingAction::Unknown`], which the reducer
//! ignores.

use std::fmt::Debug;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::model::{Item, ItemId};
use crate::state::CategoryFilter;

/// Marker trait for actions that can be dispatched to the store
///
/// Use `#[derive(Action)]` from `packlist-macros` to auto-implement this trait.
pub trait Action: Clone + Debug + 'static {
    /// Get the action name for logging and filtering
    fn name(&self) -> &'static str;
}

/// Actions with a derive-generated category
pub trait ActionCategory: Action {
    type Category: Copy + Eq + Debug;

    fn category(&self) -> Option<&'static str>;

    fn category_enum(&self) -> Self::Category;
}

/// Short human-readable form of an action for dispatch logs
pub trait ActionSummary: Action {
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}

/// Every state change a collaborator can request
#[derive(crate::Action, Clone, Debug, PartialEq, Eq, Serialize)]
#[action(infer_categories)]
#[serde(tag = "type", content = "payload")]
pub enum PackingAction {
    /// Select the category filter ("all" or a registered category)
    #[serde(rename = "SET_CATEGORY")]
    FilterSelectCategory(CategoryFilter),

    #[serde(rename = "SET_UNPACKED_SEARCH_QUERY")]
    SearchSetUnpacked(String),

    #[serde(rename = "SET_PACKED_SEARCH_QUERY")]
    SearchSetPacked(String),

    /// Append a new item
    #[serde(rename = "ADD_ITEM")]
    ItemAdd(Item),

    /// Flip the packed flag of an item
    #[serde(rename = "TOGGLE_PACK")]
    ItemTogglePack(ItemId),

    /// Rename an item; the name is trimmed
    #[serde(rename = "EDIT_ITEM_NAME")]
    ItemRename { id: ItemId, name: String },

    /// Unpack every item
    #[serde(rename = "UNPACK_ALL")]
    ListUnpackAll,

    /// Put an item into the packed or unpacked list (drag and drop)
    #[serde(rename = "MOVE_ITEM", rename_all = "camelCase")]
    ItemMove { id: ItemId, is_packed: bool },

    #[serde(rename = "ADD_ITEM_TAG")]
    ItemAddTag { id: ItemId, tag: String },

    /// Unrecognized action type; always a no-op
    #[serde(rename = "UNKNOWN")]
    #[action(skip_category)]
    Unknown,
}

#[derive(Deserialize)]
struct WireAction {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
    /// Top-level fields besides `type` and `payload`
    #[serde(flatten)]
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct RenamePayload {
    id: ItemId,
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovePayload {
    id: ItemId,
    is_packed: bool,
}

#[derive(Deserialize)]
struct TagPayload {
    id: ItemId,
    tag: String,
}

fn payload<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value)
}

/// Object payload, taken from the flat top-level fields when `payload` is absent
fn object_payload<T: DeserializeOwned>(
    value: Value,
    fields: Map<String, Value>,
) -> Result<T, serde_json::Error> {
    match value {
        Value::Null => serde_json::from_value(Value::Object(fields)),
        value => serde_json::from_value(value),
    }
}

impl TryFrom<WireAction> for PackingAction {
    type Error = serde_json::Error;

    fn try_from(wire: WireAction) -> Result<Self, Self::Error> {
        let WireAction {
            kind,
            payload: value,
            fields,
        } = wire;
        let action = match kind.as_str() {
            "SET_CATEGORY" => PackingAction::FilterSelectCategory(payload(value)?),
            "SET_UNPACKED_SEARCH_QUERY" => PackingAction::SearchSetUnpacked(payload(value)?),
            "SET_PACKED_SEARCH_QUERY" => PackingAction::SearchSetPacked(payload(value)?),
            "ADD_ITEM" => PackingAction::ItemAdd(payload(value)?),
            "TOGGLE_PACK" => PackingAction::ItemTogglePack(payload(value)?),
            "EDIT_ITEM_NAME" => {
                let RenamePayload { id, name } = object_payload(value, fields)?;
                PackingAction::ItemRename { id, name }
            }
            "UNPACK_ALL" => PackingAction::ListUnpackAll,
            "MOVE_ITEM" => {
                let MovePayload { id, is_packed } = object_payload(value, fields)?;
                PackingAction::ItemMove { id, is_packed }
            }
            "ADD_ITEM_TAG" => {
                let TagPayload { id, tag } = object_payload(value, fields)?;
                PackingAction::ItemAddTag { id, tag }
            }
            _ => PackingAction::Unknown,
        };
        Ok(action)
    }
}

impl<'de> Deserialize<'de> for PackingAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireAction::deserialize(deserializer)?;
        PackingAction::try_from(wire).map_err(D::Error::custom)
    }
}

impl PackingAction {
    /// Decode one action from its JSON wire form
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Name of the action on the wire
    pub fn wire_name(&self) -> &'static str {
        match self {
            PackingAction::FilterSelectCategory(_) => "SET_CATEGORY",
            PackingAction::SearchSetUnpacked(_) => "SET_UNPACKED_SEARCH_QUERY",
            PackingAction::SearchSetPacked(_) => "SET_PACKED_SEARCH_QUERY",
            PackingAction::ItemAdd(_) => "ADD_ITEM",
            PackingAction::ItemTogglePack(_) => "TOGGLE_PACK",
            PackingAction::ItemRename { .. } => "EDIT_ITEM_NAME",
            PackingAction::ListUnpackAll => "UNPACK_ALL",
            PackingAction::ItemMove { .. } => "MOVE_ITEM",
            PackingAction::ItemAddTag { .. } => "ADD_ITEM_TAG",
            PackingAction::Unknown => "UNKNOWN",
        }
    }

    /// Id of the item the action targets, if any
    pub fn item_id(&self) -> Option<&ItemId> {
        match self {
            PackingAction::ItemAdd(item) => Some(&item.id),
            PackingAction::ItemTogglePack(id)
            | PackingAction::ItemRename { id, .. }
            | PackingAction::ItemMove { id, .. }
            | PackingAction::ItemAddTag { id, .. } => Some(id),
            PackingAction::FilterSelectCategory(_)
            | PackingAction::SearchSetUnpacked(_)
            | PackingAction::SearchSetPacked(_)
            | PackingAction::ListUnpackAll
            | PackingAction::Unknown => None,
        }
    }
}

impl ActionSummary for PackingAction {
    fn summary(&self) -> String {
        match self {
            PackingAction::ItemAdd(item) => {
                format!("ItemAdd {{ name: {:?}, category: {} }}", item.name, item.category)
            }
            PackingAction::FilterSelectCategory(filter) => {
                format!("FilterSelectCategory({})", filter)
            }
            _ => format!("{:?}", self),
        }
    }
}
