//! Per-item completion and category state.
//!
//! The catalog is the authoritative record of what was played today. It is
//! persisted under the `bookmarkData` key as a JSON map of item id to entry,
//! with the wire field names `category` / `doneToday` / `lastChecked`.
//!
//! Invariant: `done_today == true` implies `last_checked` is set.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bookmarks::ItemId;

/// Category assigned to items that have none.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Per-item state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, rename = "doneToday")]
    pub done_today: bool,
    /// When the item was last marked done. Survives the daily reset as
    /// evidence of the last completion.
    #[serde(default, rename = "lastChecked", skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<DateTime<Utc>>,
}

impl CatalogEntry {
    /// The entry's category, defaulting to [`UNCATEGORIZED`].
    pub fn resolved_category(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }
}

/// The item catalog, keyed by item id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: BTreeMap<ItemId, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ItemId) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    /// Total function: the resolved category of an item, present or not.
    pub fn category_of(&self, id: &ItemId) -> &str {
        self.entries
            .get(id)
            .map(CatalogEntry::resolved_category)
            .unwrap_or(UNCATEGORIZED)
    }

    /// Total function: whether an item was completed today.
    pub fn is_done_today(&self, id: &ItemId) -> bool {
        self.entries.get(id).map(|e| e.done_today).unwrap_or(false)
    }

    /// Mark an item completed now. The category is preserved.
    pub fn mark_done(&mut self, id: &ItemId, now: DateTime<Utc>) {
        let entry = self.entries.entry(id.clone()).or_default();
        entry.done_today = true;
        entry.last_checked = Some(now);
    }

    /// Manual checkbox edit: set the flag either way and stamp the time.
    pub fn set_done(&mut self, id: &ItemId, done: bool, now: DateTime<Utc>) {
        let entry = self.entries.entry(id.clone()).or_default();
        entry.done_today = done;
        entry.last_checked = Some(now);
    }

    /// Assign or clear an item's category.
    pub fn set_category(&mut self, id: &ItemId, category: Option<String>) {
        let entry = self.entries.entry(id.clone()).or_default();
        entry.category = category;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &CatalogEntry)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ItemId, &mut CatalogEntry)> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
