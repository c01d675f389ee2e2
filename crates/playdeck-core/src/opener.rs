//! The open-item side effect.
//!
//! Opening is fire-and-forget: the core requests it and never verifies the
//! result. A failed open is logged and the advance still commits.

use tracing::{debug, warn};

use crate::bookmarks::Item;

pub trait ItemOpener {
    fn open(&self, item: &Item);
}

/// Opens items in the OS default browser.
pub struct SystemOpener;

impl ItemOpener for SystemOpener {
    fn open(&self, item: &Item) {
        debug!("opening '{}' ({})", item.title, item.url);
        if let Err(e) = open::that_detached(&item.url) {
            warn!("failed to open '{}': {e}", item.title);
        }
    }
}

/// Discards open requests. Used when `playback.auto_open` is off.
pub struct NullOpener;

impl ItemOpener for NullOpener {
    fn open(&self, _item: &Item) {}
}
