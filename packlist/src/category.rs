//! Category-style registry
//!
//! Maps every known [`Category`] to a display style token. The nine built-in
//! categories are always present; collaborators register new keys through
//! [`CategoryRegistry::add_category`]. The registry is a plain value owned by
//! the [`Store`](crate::Store) and lent to the reducer and the view builders.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Category;

/// Display style token for a category (e.g. `"bg-blue-100 text-blue-900"`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryStyle(String);

impl CategoryStyle {
    /// Colors offered when creating a new category
    pub const PALETTE: [&'static str; 9] = [
        "bg-red-500",
        "bg-orange-500",
        "bg-yellow-500",
        "bg-green-500",
        "bg-blue-500",
        "bg-indigo-500",
        "bg-purple-500",
        "bg-pink-500",
        "bg-gray-500",
    ];

    /// Color used when the caller doesn't pick one
    pub const DEFAULT_COLOR: &'static str = "bg-gray-300";

    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Style for a user-created category: the chosen background with white text
    pub fn from_color(color: &str) -> Self {
        Self(format!("{} text-white", color.trim()))
    }

    /// Default style of a built-in category, `None` for custom ones
    pub fn builtin(category: &Category) -> Option<Self> {
        let token = match Category::from_key(category.key()) {
            Category::Clothing => "bg-blue-100 text-blue-900",
            Category::Electronics => "bg-zinc-300",
            Category::Toiletries => "bg-yellow-100 text-yellow-900",
            Category::Documents => "bg-red-100 text-red-900",
            Category::Accessories => "bg-purple-100 text-purple-900",
            Category::Stationary => "bg-orange-100 text-orange-900",
            Category::Health => "bg-green-100 text-green-900",
            Category::Food => "bg-cyan-100 text-cyan-900",
            Category::Books => "bg-fuchsia-100 text-fuchsia-950",
            Category::Custom(_) => return None,
        };
        Some(Self::new(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rejected category registration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    #[error("category name is required")]
    Empty,
    #[error("category already exists: {0}")]
    Duplicate(String),
}

/// Ordered registry of known categories and their styles
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryRegistry {
    entries: Vec<(Category, CategoryStyle)>,
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl CategoryRegistry {
    /// Registry seeded with the nine built-in categories
    pub fn with_builtins() -> Self {
        let entries = Category::BUILTIN
            .iter()
            .filter_map(|c| CategoryStyle::builtin(c).map(|style| (c.clone(), style)))
            .collect();
        Self { entries }
    }

    /// Register a new category key.
    ///
    /// The key is trimmed and lowercased. Empty keys and keys already present
    /// (built-in or custom) are rejected and leave the registry untouched.
    pub fn add_category(
        &mut self,
        key: &str,
        style: CategoryStyle,
    ) -> Result<Category, CategoryError> {
        if key.trim().is_empty() {
            return Err(CategoryError::Empty);
        }
        let category = Category::from_key(key);
        if self.contains(&category) {
            return Err(CategoryError::Duplicate(category.key().to_string()));
        }

        tracing::debug!(category = %category, style = %style, "Category registered");
        self.entries.push((category.clone(), style));
        Ok(category)
    }

    pub fn contains(&self, category: &Category) -> bool {
        self.entries.iter().any(|(c, _)| c == category)
    }

    pub fn style(&self, category: &Category) -> Option<&CategoryStyle> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, style)| style)
    }

    /// Categories in registration order (built-ins first)
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter().map(|(c, _)| c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, &CategoryStyle)> {
        self.entries.iter().map(|(c, s)| (c, s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_registered_in_order() {
        let registry = CategoryRegistry::with_builtins();
        assert_eq!(registry.len(), 9);
        let keys: Vec<_> = registry.categories().map(Category::key).collect();
        assert_eq!(keys[0], "clothing");
        assert_eq!(keys[8], "books");
        assert_eq!(
            registry.style(&Category::Food).map(CategoryStyle::as_str),
            Some("bg-cyan-100 text-cyan-900")
        );

        let spelled_out = Category::Custom("food".into());
        assert!(registry.contains(&spelled_out));
        assert_eq!(
            CategoryStyle::builtin(&spelled_out).map(|s| s.as_str().to_string()),
            Some("bg-cyan-100 text-cyan-900".to_string())
        );
    }

    #[test]
    fn test_add_category() {
        let mut registry = CategoryRegistry::default();
        let camping = registry
            .add_category("Camping", CategoryStyle::from_color("bg-green-500"))
            .unwrap();

        assert_eq!(camping, Category::Custom("camping".into()));
        assert!(registry.contains(&camping));
        assert_eq!(
            registry.style(&camping).map(CategoryStyle::as_str),
            Some("bg-green-500 text-white")
        );
        assert_eq!(registry.categories().last(), Some(&camping));
    }

    #[test]
    fn test_add_category_rejects_duplicates() {
        let mut registry = CategoryRegistry::default();
        registry
            .add_category("camping", CategoryStyle::from_color("bg-red-500"))
            .unwrap();

        assert_eq!(
            registry.add_category(" CAMPING ", CategoryStyle::from_color("bg-blue-500")),
            Err(CategoryError::Duplicate("camping".into()))
        );
        assert_eq!(
            registry.add_category("Food", CategoryStyle::from_color("bg-blue-500")),
            Err(CategoryError::Duplicate("food".into()))
        );
        assert_eq!(registry.len(), 10);
    }

    #[test]
    fn test_add_category_rejects_empty() {
        let mut registry = CategoryRegistry::default();
        assert_eq!(
            registry.add_category("   ", CategoryStyle::from_color("bg-red-500")),
            Err(CategoryError::Empty)
        );
        assert_eq!(registry.len(), 9);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(CategoryError::Empty.to_string(), "category name is required");
        assert_eq!(
            CategoryError::Duplicate("food".into()).to_string(),
            "category already exists: food"
        );
    }
}
