//! The registry of categories that transactions may be filed under.
//!
//! The registry lives in memory only. It is seeded with [DEFAULT_CATEGORIES]
//! when created, grows through [CategoryRegistry::add], and never shrinks.
//! Categories are not persisted, so a new registry does not know about
//! categories that were added in a previous process, even if stored
//! transactions still refer to them.

use crate::ValidationError;

/// The categories every new registry starts with, in display order.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Food",
    "Travel",
    "Utilities",
    "Entertainment",
    "Salary",
    "Other",
];

/// An ordered set of valid category names.
///
/// Each registry is an independent value. Whoever owns it decides its
/// lifetime, e.g. [Ledger](crate::Ledger) keeps one for as long as the
/// ledger is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    categories: Vec<String>,
}

impl CategoryRegistry {
    /// Create a registry holding the [DEFAULT_CATEGORIES].
    pub fn new() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|&name| name.to_owned()).collect(),
        }
    }

    /// The current categories in insertion order, defaults first.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Whether `category` is in the registry.
    pub fn contains(&self, category: &str) -> bool {
        self.categories.iter().any(|existing| existing == category)
    }

    /// Append `category` to the registry.
    ///
    /// Surrounding whitespace is trimmed. Empty names and names that are
    /// already registered are ignored.
    pub fn add(&mut self, category: &str) {
        let category = category.trim();

        if category.is_empty() || self.contains(category) {
            return;
        }

        tracing::debug!("Registered category \"{category}\"");
        self.categories.push(category.to_owned());
    }

    /// Check that `category` is in the registry.
    ///
    /// # Errors
    ///
    /// Returns [ValidationError::UnknownCategory] if it is not.
    pub fn validate<'a>(&self, category: &'a str) -> Result<&'a str, ValidationError> {
        if self.contains(category) {
            Ok(category)
        } else {
            Err(ValidationError::UnknownCategory(category.to_owned()))
        }
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
