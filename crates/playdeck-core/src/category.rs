//! Per-category enable/expand state.
//!
//! Persisted under the `categoryStates` key as a JSON map of category name
//! to `{ enabled, open }`. A category with no entry counts as enabled; the
//! entry is lazily created the first time the queue builder encounters it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Categories seeded on first run.
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "Word-Game",
    "Geo-Game",
    "Music-Game",
    "Puzzle-Game",
    "Movie-Game",
    "Undefined",
    "Uncategorized",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryState {
    pub enabled: bool,
    /// Expanded in the category listing. Not consulted by queue logic.
    pub open: bool,
}

impl Default for CategoryState {
    fn default() -> Self {
        Self {
            enabled: true,
            open: true,
        }
    }
}

/// Mapping of category name to state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryRegistry {
    states: BTreeMap<String, CategoryState>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: &str) -> Option<&CategoryState> {
        self.states.get(category)
    }

    /// Total function: unknown categories are implicitly enabled.
    pub fn is_enabled(&self, category: &str) -> bool {
        self.states.get(category).map(|s| s.enabled).unwrap_or(true)
    }

    /// Lazily create the default state for a category. Returns true if the
    /// entry was created by this call.
    pub fn ensure(&mut self, category: &str) -> bool {
        if self.states.contains_key(category) {
            return false;
        }
        self.states
            .insert(category.to_string(), CategoryState::default());
        true
    }

    pub fn set_enabled(&mut self, category: &str, enabled: bool) {
        self.states.entry(category.to_string()).or_default().enabled = enabled;
    }

    /// Flip the expanded bit, returning the new value.
    pub fn toggle_open(&mut self, category: &str) -> bool {
        let state = self.states.entry(category.to_string()).or_default();
        state.open = !state.open;
        state.open
    }

    /// Seed [`DEFAULT_CATEGORIES`], touching only missing entries.
    /// Returns true if anything was added and a save is needed.
    pub fn seed_defaults(&mut self) -> bool {
        let mut added = false;
        for category in DEFAULT_CATEGORIES {
            added |= self.ensure(category);
        }
        added
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CategoryState)> {
        self.states.iter()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
