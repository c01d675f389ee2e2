use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bookmarks::{Item, ItemId};
use crate::play::SessionState;

/// Every state change in the system produces an Event.
/// The CLI prints them; callers embedding the core can subscribe to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        folder_id: String,
        queue_len: usize,
        /// First item of the queue, requested to be opened.
        opened: Option<Item>,
        at: DateTime<Utc>,
    },
    ItemCompleted {
        id: ItemId,
        title: String,
        /// Next item of the queue, requested to be opened. `None` means the
        /// session is now exhausted.
        opened: Option<Item>,
        remaining: usize,
        at: DateTime<Utc>,
    },
    ItemSkipped {
        id: ItemId,
        title: String,
        opened: Option<Item>,
        remaining: usize,
        at: DateTime<Utc>,
    },
    /// An advance arrived after the queue ran out. Nothing was mutated.
    QueueExhausted {
        at: DateTime<Utc>,
    },
    /// The daily reset job cleared `doneToday` on `cleared` entries.
    DailyReset {
        cleared: usize,
        at: DateTime<Utc>,
    },
    SessionSnapshot {
        state: SessionState,
        index: usize,
        queue_len: usize,
        current: Option<Item>,
        at: DateTime<Utc>,
    },
}
