//! Play session state machine.
//!
//! A session is a pointer over an immutable queue of item ids. It has two
//! states:
//!
//! ```text
//! Active(index < queue.len()) -> Exhausted(index == queue.len())
//! ```
//!
//! The queue is built once at session start and never reordered; `advance`
//! is the only mutation. A new session replaces the old one wholesale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bookmarks::ItemId;
use crate::catalog::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Active,
    Exhausted,
}

/// Persisted session: the `playState` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayState {
    pub index: usize,
    #[serde(rename = "folderId")]
    pub folder_id: String,
    #[serde(rename = "bookmarkIds")]
    pub bookmark_ids: Vec<ItemId>,
}

/// What one `advance` did.
#[derive(Debug, Clone, PartialEq)]
pub struct Advance {
    /// The item stepped past, if the session was active.
    pub passed: Option<ItemId>,
    /// Whether the passed item was marked completed.
    pub marked_done: bool,
    /// The new current item, to be opened by the caller. `None` means the
    /// session is now (or already was) exhausted.
    pub opened: Option<ItemId>,
}

impl PlayState {
    pub fn new(folder_id: impl Into<String>, bookmark_ids: Vec<ItemId>) -> Self {
        Self {
            index: 0,
            folder_id: folder_id.into(),
            bookmark_ids,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        if self.index < self.bookmark_ids.len() {
            SessionState::Active
        } else {
            SessionState::Exhausted
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.state() == SessionState::Exhausted
    }

    /// The current item id, or `None` when exhausted. No side effect.
    pub fn current(&self) -> Option<&ItemId> {
        self.bookmark_ids.get(self.index)
    }

    /// Items left to step past, current one included.
    pub fn remaining(&self) -> usize {
        self.bookmark_ids.len().saturating_sub(self.index)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Step the pointer forward, optionally marking the current item done.
    ///
    /// At exhaustion this is a no-op: nothing is mutated and
    /// `opened` is `None`. A skip (`mark_done == false`) never touches the
    /// catalog, so a skipped item can be replayed by any later queue build.
    pub fn advance(&mut self, catalog: &mut Catalog, mark_done: bool, now: DateTime<Utc>) -> Advance {
        let Some(id) = self.current().cloned() else {
            return Advance {
                passed: None,
                marked_done: false,
                opened: None,
            };
        };
        if mark_done {
            catalog.mark_done(&id, now);
        }
        self.index += 1;
        Advance {
            passed: Some(id),
            marked_done: mark_done,
            opened: self.current().cloned(),
        }
    }
}
