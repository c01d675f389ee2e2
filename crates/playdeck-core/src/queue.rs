//! Queue construction.
//!
//! Derives the ordered, filtered play queue from the folder's items, the
//! catalog, and the category registry. The input order is the bookmark
//! tree's document order and is never re-sorted.

use crate::bookmarks::{Item, ItemId};
use crate::catalog::Catalog;
use crate::category::CategoryRegistry;

/// Build a play queue.
///
/// An item is included iff its resolved category is enabled and it is not
/// already completed today. Categories seen for the first time are lazily
/// registered as enabled. An empty result is valid: nothing to play.
pub fn build_queue(
    items: &[Item],
    catalog: &Catalog,
    registry: &mut CategoryRegistry,
) -> Vec<ItemId> {
    let mut queue = Vec::new();
    for item in items {
        let category = catalog.category_of(&item.id);
        registry.ensure(category);
        if registry.is_enabled(category) && !catalog.is_done_today(&item.id) {
            queue.push(item.id.clone());
        }
    }
    queue
}
