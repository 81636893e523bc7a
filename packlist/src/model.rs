//! Item catalog model: items, ids, categories

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Opaque unique identifier of an [`Item`]
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id for a newly created item
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Item classification.
///
/// Nine categories are built in; further keys are registered at runtime
/// through [`CategoryRegistry`](crate::CategoryRegistry) and carried as
/// [`Category::Custom`]. Keys are always lowercase.
///
/// Equality, hashing and ordering all go by [`key`](Category::key), so
/// `Category::Custom("food".into())` is the same category as
/// [`Category::Food`].
#[derive(Clone, Debug)]
pub enum Category {
    Clothing,
    Electronics,
    Toiletries,
    Documents,
    Accessories,
    Stationary,
    Health,
    Food,
    Books,
    Custom(String),
}

impl Category {
    /// Built-in categories in their canonical display order
    pub const BUILTIN: [Category; 9] = [
        Category::Clothing,
        Category::Electronics,
        Category::Toiletries,
        Category::Documents,
        Category::Accessories,
        Category::Stationary,
        Category::Health,
        Category::Food,
        Category::Books,
    ];

    /// Parse a category key. Unknown keys become [`Category::Custom`].
    ///
    /// The key is trimmed and lowercased first.
    pub fn from_key(key: &str) -> Self {
        let key = key.trim().to_lowercase();
        match key.as_str() {
            "clothing" => Category::Clothing,
            "electronics" => Category::Electronics,
            "toiletries" => Category::Toiletries,
            "documents" => Category::Documents,
            "accessories" => Category::Accessories,
            "stationary" => Category::Stationary,
            "health" => Category::Health,
            "food" => Category::Food,
            "books" => Category::Books,
            _ => Category::Custom(key),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Category::Clothing => "clothing",
            Category::Electronics => "electronics",
            Category::Toiletries => "toiletries",
            Category::Documents => "documents",
            Category::Accessories => "accessories",
            Category::Stationary => "stationary",
            Category::Health => "health",
            Category::Food => "food",
            Category::Books => "books",
            Category::Custom(key) => key,
        }
    }

    pub fn is_builtin(&self) -> bool {
        Category::BUILTIN.contains(self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Category::from_key(s))
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

// Categories order by key, not by declaration order.
impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(other.key())
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(Category::from_key(&key))
    }
}

/// A single packing-list entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default = "ItemId::generate")]
    pub id: ItemId,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub is_packed: bool,
    /// Tag set, kept in insertion order
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Item {
    /// New unpacked, untagged item with a freshly generated id
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self::with_id(ItemId::generate(), name, category)
    }

    pub fn with_id(id: impl Into<ItemId>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            is_packed: false,
            tags: Vec::new(),
        }
    }

    pub fn packed(mut self) -> Self {
        self.is_packed = true;
        self
    }

    pub fn tagged(mut self, tag: &str) -> Self {
        self.insert_tag(tag);
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Insert a tag with set semantics.
    ///
    /// The tag is trimmed; empty tags and tags already present are ignored.
    /// Returns `true` if the tag set changed.
    pub fn insert_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }
}

/// Starter list used by demos
pub fn sample_items() -> Vec<Item> {
    vec![
        Item::with_id("sample-passport", "Passport", Category::Documents),
        Item::with_id("sample-tickets", "Tickets", Category::Documents),
        Item::with_id("sample-tshirts", "T-Shirts", Category::Clothing),
        Item::with_id("sample-socks", "Socks", Category::Clothing).tagged("essentials"),
        Item::with_id("sample-charger", "Phone Charger", Category::Electronics)
            .tagged("essentials"),
        Item::with_id("sample-headphones", "Headphones", Category::Electronics),
        Item::with_id("sample-toothbrush", "Toothbrush", Category::Toiletries),
        Item::with_id("sample-sunglasses", "Sunglasses", Category::Accessories),
        Item::with_id("sample-notebook", "Notebook", Category::Stationary),
        Item::with_id("sample-firstaid", "First Aid Kit", Category::Health),
        Item::with_id("sample-snacks", "Snacks", Category::Food),
        Item::with_id("sample-novel", "Novel", Category::Books),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_key() {
        assert_eq!(Category::from_key("clothing"), Category::Clothing);
        assert_eq!(Category::from_key("  Books "), Category::Books);
        assert_eq!(
            Category::from_key("Camping"),
            Category::Custom("camping".into())
        );
    }

    #[test]
    fn test_category_orders_by_key() {
        let mut cats = vec![
            Category::Food,
            Category::Custom("camping".into()),
            Category::Books,
            Category::Clothing,
        ];
        cats.sort();
        let keys: Vec<_> = cats.iter().map(Category::key).collect();
        assert_eq!(keys, vec!["books", "camping", "clothing", "food"]);
    }

    #[test]
    fn test_category_identity_follows_key() {
        use std::collections::HashSet;

        let spelled_out = Category::Custom("food".into());
        assert_eq!(spelled_out, Category::Food);
        assert_eq!(spelled_out.cmp(&Category::Food), Ordering::Equal);
        assert!(spelled_out.is_builtin());

        let set: HashSet<_> = [Category::Food, spelled_out].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert_ne!(Category::Custom("camping".into()), Category::Food);
    }

    #[test]
    fn test_insert_tag_is_set_like() {
        let mut item = Item::with_id("a", "Socks", Category::Clothing);
        assert!(item.insert_tag("wool"));
        assert!(!item.insert_tag("wool"));
        assert!(!item.insert_tag("  wool "));
        assert!(!item.insert_tag("   "));
        assert!(item.insert_tag("Wool"));
        assert_eq!(item.tags, vec!["wool", "Wool"]);
    }

    #[test]
    fn test_item_json_shape() {
        let item = Item::with_id("a", "Socks", Category::Clothing).packed();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "a");
        assert_eq!(json["category"], "clothing");
        assert_eq!(json["isPacked"], true);

        let parsed: Item =
            serde_json::from_str(r#"{"name":"Tent","category":"Camping"}"#).unwrap();
        assert_eq!(parsed.category, Category::Custom("camping".into()));
        assert!(!parsed.is_packed);
        assert!(!parsed.id.as_str().is_empty());
    }

    #[test]
    fn test_sample_items_have_unique_ids() {
        let items = sample_items();
        let mut ids: Vec<_> = items.iter().map(|i| i.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), items.len());
    }
}
