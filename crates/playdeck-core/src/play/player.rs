//! Command orchestration over the persisted state.
//!
//! The player owns one logical operation at a time: load state, mutate,
//! persist, then request side effects. Everything a command changes lands
//! in a single `kv_set_many` transaction, so a crash between the catalog
//! mutation and the session pointer update cannot be observed. Operations
//! run to completion; callers serialize access (one process per CLI
//! invocation, an async mutex in the watch daemon).

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::bookmarks::{BookmarkSource, Item, ItemId};
use crate::catalog::Catalog;
use crate::category::CategoryRegistry;
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::opener::ItemOpener;
use crate::queue::build_queue;
use crate::reset;
use crate::storage::database::{
    KEY_BOOKMARK_DATA, KEY_CATEGORY_STATES, KEY_LAST_FOLDER, KEY_PLAY_STATE,
};
use crate::storage::Database;

use super::command::Command;
use super::session::PlayState;

/// One item of a folder listing.
#[derive(Debug, Clone)]
pub struct ListedItem {
    pub item: Item,
    pub done_today: bool,
}

/// A folder's items grouped under one category.
#[derive(Debug, Clone)]
pub struct CategoryGroup {
    pub category: String,
    pub enabled: bool,
    pub open: bool,
    pub items: Vec<ListedItem>,
}

/// A folder's items grouped by category, in first-encounter order.
#[derive(Debug, Clone)]
pub struct FolderListing {
    pub folder_id: String,
    pub total: usize,
    pub groups: Vec<CategoryGroup>,
}

/// Orchestrates play commands against the store, the bookmark source and
/// the opener.
pub struct Player<'a, S: BookmarkSource, O: ItemOpener> {
    db: &'a Database,
    source: &'a S,
    opener: &'a O,
}

impl<'a, S: BookmarkSource, O: ItemOpener> Player<'a, S, O> {
    pub fn new(db: &'a Database, source: &'a S, opener: &'a O) -> Self {
        Self { db, source, opener }
    }

    /// Start a new session over a folder, replacing any previous session.
    ///
    /// Builds the queue (category-enabled, not done today), persists it
    /// with index 0, records the folder as the last one used, and requests
    /// the first item be opened. An empty queue is a valid session.
    pub fn start(&self, folder: Option<&str>) -> Result<Event> {
        let folder_id = self.resolve_folder(folder)?;
        let now = Utc::now();

        let (catalog, catalog_changed) = self.load_catalog_with_catchup(now)?;
        let mut registry = self.db.load_registry()?;
        let mut registry_changed = registry.seed_defaults();

        let items = self.source.collect_items(&folder_id)?;
        let before_build = registry.clone();
        let queue = build_queue(&items, &catalog, &mut registry);
        registry_changed |= registry != before_build;

        let state = PlayState::new(folder_id.clone(), queue);
        let mut writes = vec![
            (KEY_PLAY_STATE, serde_json::to_string(&state)?),
            (KEY_LAST_FOLDER, folder_id.clone()),
        ];
        if catalog_changed {
            writes.push((KEY_BOOKMARK_DATA, serde_json::to_string(&catalog)?));
        }
        if registry_changed {
            writes.push((KEY_CATEGORY_STATES, serde_json::to_string(&registry)?));
        }
        self.db.kv_set_many(&writes)?;

        let opened = match state.current() {
            Some(id) => Some(self.lookup(id)?),
            None => None,
        };
        if let Some(item) = &opened {
            self.opener.open(item);
        }
        info!(
            "session started over folder '{folder_id}': {} of {} items queued",
            state.bookmark_ids.len(),
            items.len()
        );
        Ok(Event::SessionStarted {
            folder_id,
            queue_len: state.bookmark_ids.len(),
            opened,
            at: now,
        })
    }

    /// Dispatch a wire command (`mark_done` / `skip_game`).
    pub fn handle_command(&self, raw: &str) -> Result<Event> {
        let command: Command = raw.parse()?;
        debug!("command received: {}", command.wire_name());
        self.advance(command.marks_done())
    }

    /// Step the session forward, optionally marking the current item done.
    ///
    /// The mutated catalog and the new session pointer are persisted in one
    /// transaction before this returns. A lookup failure of the current
    /// item aborts with nothing written; a lookup failure of the *next*
    /// item only suppresses the open request.
    pub fn advance(&self, mark_done: bool) -> Result<Event> {
        let mut state = self
            .db
            .load_play_state()?
            .ok_or(CoreError::NoActiveSession)?;
        if state.folder_id.is_empty() {
            return Err(CoreError::NoActiveSession);
        }
        let now = Utc::now();
        let Some(current_id) = state.current().cloned() else {
            debug!("advance ignored: queue exhausted");
            return Ok(Event::QueueExhausted { at: now });
        };
        let current = self.lookup(&current_id)?;

        let mut catalog = self.db.load_catalog()?;
        let outcome = state.advance(&mut catalog, mark_done, now);

        let opened = outcome.opened.as_ref().and_then(|id| {
            match self.source.get(id) {
                Ok(item) => Some(item),
                Err(e) => {
                    // Matches the open semantics: a broken next item does
                    // not undo the advance.
                    warn!("failed to resolve next bookmark '{id}': {e}");
                    None
                }
            }
        });

        let mut writes = vec![(KEY_PLAY_STATE, serde_json::to_string(&state)?)];
        if mark_done {
            writes.push((KEY_BOOKMARK_DATA, serde_json::to_string(&catalog)?));
        }
        self.db.kv_set_many(&writes)?;

        if let Some(item) = &opened {
            self.opener.open(item);
        }

        let remaining = state.remaining();
        if outcome.marked_done {
            info!("completed '{}', {remaining} to go", current.title);
            Ok(Event::ItemCompleted {
                id: current_id,
                title: current.title,
                opened,
                remaining,
                at: now,
            })
        } else {
            info!("skipped '{}', {remaining} to go", current.title);
            Ok(Event::ItemSkipped {
                id: current_id,
                title: current.title,
                opened,
                remaining,
                at: now,
            })
        }
    }

    /// Read-only snapshot of the active session.
    pub fn status(&self) -> Result<Event> {
        let state = self
            .db
            .load_play_state()?
            .ok_or(CoreError::NoActiveSession)?;
        let current = match state.current() {
            Some(id) => Some(self.lookup(id)?),
            None => None,
        };
        Ok(Event::SessionSnapshot {
            state: state.state(),
            index: state.index,
            queue_len: state.bookmark_ids.len(),
            current,
            at: Utc::now(),
        })
    }

    /// Run the daily reset immediately (idempotent).
    pub fn reset_now(&self) -> Result<Event> {
        let now = Utc::now();
        let cleared = reset::run_reset_job(self.db, now)?;
        Ok(Event::DailyReset { cleared, at: now })
    }

    /// A folder's items grouped by resolved category, with completion and
    /// category state attached. Categories encountered for the first time
    /// are registered; expired completion flags are cleared on the way.
    pub fn list_folder(&self, folder: Option<&str>) -> Result<FolderListing> {
        let folder_id = self.resolve_folder(folder)?;
        let now = Utc::now();
        let (catalog, catalog_changed) = self.load_catalog_with_catchup(now)?;
        let mut registry = self.db.load_registry()?;
        let mut registry_changed = registry.seed_defaults();

        let items = self.source.collect_items(&folder_id)?;
        let mut groups: Vec<CategoryGroup> = Vec::new();
        for item in &items {
            let category = catalog.category_of(&item.id).to_string();
            registry_changed |= registry.ensure(&category);
            let index = match groups.iter().position(|g| g.category == category) {
                Some(i) => i,
                None => {
                    let state = registry.get(&category).cloned().unwrap_or_default();
                    groups.push(CategoryGroup {
                        category: category.clone(),
                        enabled: state.enabled,
                        open: state.open,
                        items: Vec::new(),
                    });
                    groups.len() - 1
                }
            };
            groups[index].items.push(ListedItem {
                item: item.clone(),
                done_today: catalog.is_done_today(&item.id),
            });
        }

        if catalog_changed {
            self.db.save_catalog(&catalog)?;
        }
        if registry_changed {
            self.db.save_registry(&registry)?;
        }
        Ok(FolderListing {
            folder_id,
            total: items.len(),
            groups,
        })
    }

    /// The registry with defaults seeded, persisted if that added anything.
    pub fn categories(&self) -> Result<CategoryRegistry> {
        let mut registry = self.db.load_registry()?;
        if registry.seed_defaults() {
            self.db.save_registry(&registry)?;
        }
        Ok(registry)
    }

    pub fn set_category_enabled(&self, category: &str, enabled: bool) -> Result<()> {
        let mut registry = self.db.load_registry()?;
        registry.set_enabled(category, enabled);
        self.db.save_registry(&registry)
    }

    /// Flip a category's expanded bit, returning the new value.
    pub fn toggle_category_open(&self, category: &str) -> Result<bool> {
        let mut registry = self.db.load_registry()?;
        let open = registry.toggle_open(category);
        self.db.save_registry(&registry)?;
        Ok(open)
    }

    pub fn set_item_category(&self, id: &ItemId, category: Option<String>) -> Result<()> {
        let now = Utc::now();
        let (mut catalog, _) = self.load_catalog_with_catchup(now)?;
        catalog.set_category(id, category);
        self.db.save_catalog(&catalog)
    }

    /// Manual checkbox edit, independent of any session.
    pub fn set_item_done(&self, id: &ItemId, done: bool) -> Result<()> {
        let now = Utc::now();
        let (mut catalog, _) = self.load_catalog_with_catchup(now)?;
        catalog.set_done(id, done, now);
        self.db.save_catalog(&catalog)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn resolve_folder(&self, folder: Option<&str>) -> Result<String> {
        if let Some(folder_id) = folder {
            return Ok(folder_id.to_string());
        }
        self.db
            .last_folder_id()?
            .filter(|f| !f.is_empty())
            .ok_or(CoreError::NoActiveSession)
    }

    /// Load the catalog and apply the startup reset catch-up, so a process
    /// that slept across the boundary still sees expired flags cleared.
    /// Returns whether the catalog needs saving.
    fn load_catalog_with_catchup(&self, now: DateTime<Utc>) -> Result<(Catalog, bool)> {
        let mut catalog = self.db.load_catalog()?;
        let cleared = reset::apply_reset_now(&mut catalog, now);
        if cleared > 0 {
            debug!("catch-up reset cleared {cleared} completion flags");
        }
        Ok((catalog, cleared > 0))
    }

    fn lookup(&self, id: &ItemId) -> Result<Item> {
        self.source.get(id).map_err(|e| CoreError::ItemLookup {
            id: id.clone(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmarks::{BookmarkNode, FileTree};
    use crate::play::SessionState;
    use std::cell::RefCell;

    struct RecordingOpener(RefCell<Vec<ItemId>>);

    impl RecordingOpener {
        fn new() -> Self {
            Self(RefCell::new(Vec::new()))
        }

        fn opened(&self) -> Vec<ItemId> {
            self.0.borrow().clone()
        }
    }

    impl ItemOpener for RecordingOpener {
        fn open(&self, item: &Item) {
            self.0.borrow_mut().push(item.id.clone());
        }
    }

    fn leaf(id: &str, title: &str) -> BookmarkNode {
        BookmarkNode {
            id: Some(id.into()),
            title: title.into(),
            url: Some(format!("https://example.com/{id}")),
            children: Vec::new(),
        }
    }

    fn tree() -> FileTree {
        FileTree::from_roots(vec![BookmarkNode {
            id: Some("root".into()),
            title: "Games".into(),
            url: None,
            children: vec![leaf("a", "Wordle"), leaf("b", "Globe"), leaf("c", "Quiz")],
        }])
        .unwrap()
    }

    fn yesterday() -> DateTime<Utc> {
        Utc::now() - chrono::Duration::days(1)
    }

    #[test]
    fn start_builds_filtered_queue_and_opens_first() {
        let db = Database::open_memory().unwrap();
        let mut catalog = Catalog::new();
        catalog.set_category(&"a".into(), Some("Word-Game".into()));
        catalog.set_category(&"b".into(), Some("Word-Game".into()));
        catalog.mark_done(&"b".into(), Utc::now());
        catalog.set_category(&"c".into(), Some("Geo-Game".into()));
        db.save_catalog(&catalog).unwrap();
        let mut registry = CategoryRegistry::new();
        registry.set_enabled("Geo-Game", false);
        db.save_registry(&registry).unwrap();

        let tree = tree();
        let opener = RecordingOpener::new();
        let player = Player::new(&db, &tree, &opener);
        let event = player.start(Some("root")).unwrap();

        let state = db.load_play_state().unwrap().unwrap();
        assert_eq!(state.bookmark_ids, vec![ItemId::from("a")]);
        assert_eq!(state.index, 0);
        assert_eq!(db.last_folder_id().unwrap().unwrap(), "root");
        assert_eq!(opener.opened(), vec![ItemId::from("a")]);
        match event {
            Event::SessionStarted {
                queue_len, opened, ..
            } => {
                assert_eq!(queue_len, 1);
                assert_eq!(opened.unwrap().id, ItemId::from("a"));
            }
            other => panic!("expected SessionStarted, got {other:?}"),
        }
    }

    #[test]
    fn start_applies_reset_catchup() {
        let db = Database::open_memory().unwrap();
        let mut catalog = Catalog::new();
        catalog.set_done(&"a".into(), true, yesterday());
        db.save_catalog(&catalog).unwrap();

        let tree = tree();
        let opener = RecordingOpener::new();
        let player = Player::new(&db, &tree, &opener);
        player.start(Some("root")).unwrap();

        // Yesterday's completion expired, so "a" is back in the queue.
        let state = db.load_play_state().unwrap().unwrap();
        assert!(state.bookmark_ids.contains(&ItemId::from("a")));
        assert!(!db.load_catalog().unwrap().is_done_today(&"a".into()));
    }

    #[test]
    fn start_remembers_and_reuses_last_folder() {
        let db = Database::open_memory().unwrap();
        let tree = tree();
        let opener = RecordingOpener::new();
        let player = Player::new(&db, &tree, &opener);

        player.start(Some("root")).unwrap();
        let event = player.start(None).unwrap();
        assert!(matches!(
            event,
            Event::SessionStarted { ref folder_id, .. } if folder_id == "root"
        ));
    }

    #[test]
    fn start_without_any_folder_is_rejected() {
        let db = Database::open_memory().unwrap();
        let tree = tree();
        let opener = RecordingOpener::new();
        let player = Player::new(&db, &tree, &opener);
        assert!(matches!(
            player.start(None),
            Err(CoreError::NoActiveSession)
        ));
    }

    #[test]
    fn advance_done_marks_current_and_opens_next() {
        let db = Database::open_memory().unwrap();
        let tree = tree();
        let opener = RecordingOpener::new();
        let player = Player::new(&db, &tree, &opener);
        player.start(Some("root")).unwrap();

        let event = player.advance(true).unwrap();

        let state = db.load_play_state().unwrap().unwrap();
        assert_eq!(state.index, 1);
        let catalog = db.load_catalog().unwrap();
        assert!(catalog.is_done_today(&"a".into()));
        assert!(catalog.get(&"a".into()).unwrap().last_checked.is_some());
        assert!(matches!(
            event,
            Event::ItemCompleted { ref opened, .. } if opened.as_ref().unwrap().id == ItemId::from("b")
        ));
        // start opened "a", advance opened "b"
        assert_eq!(opener.opened(), vec![ItemId::from("a"), ItemId::from("b")]);
    }

    #[test]
    fn advance_skip_never_touches_catalog() {
        let db = Database::open_memory().unwrap();
        let tree = tree();
        let opener = RecordingOpener::new();
        let player = Player::new(&db, &tree, &opener);
        player.start(Some("root")).unwrap();
        let catalog_before = db.load_catalog().unwrap();

        let event = player.advance(false).unwrap();

        assert_eq!(db.load_catalog().unwrap(), catalog_before);
        assert_eq!(db.load_play_state().unwrap().unwrap().index, 1);
        assert!(matches!(event, Event::ItemSkipped { .. }));
    }

    #[test]
    fn advancing_past_the_end_is_a_noop() {
        let db = Database::open_memory().unwrap();
        let tree = tree();
        let opener = RecordingOpener::new();
        let player = Player::new(&db, &tree, &opener);
        player.start(Some("root")).unwrap();
        for _ in 0..3 {
            player.advance(false).unwrap();
        }
        let state_before = db.load_play_state().unwrap().unwrap();
        assert!(state_before.is_exhausted());

        let event = player.advance(true).unwrap();
        assert!(matches!(event, Event::QueueExhausted { .. }));
        assert_eq!(db.load_play_state().unwrap().unwrap(), state_before);
    }

    #[test]
    fn command_with_no_session_is_rejected() {
        let db = Database::open_memory().unwrap();
        let tree = tree();
        let opener = RecordingOpener::new();
        let player = Player::new(&db, &tree, &opener);
        assert!(matches!(
            player.handle_command("mark_done"),
            Err(CoreError::NoActiveSession)
        ));
    }

    #[test]
    fn unknown_command_changes_nothing() {
        let db = Database::open_memory().unwrap();
        let tree = tree();
        let opener = RecordingOpener::new();
        let player = Player::new(&db, &tree, &opener);
        player.start(Some("root")).unwrap();
        let state_before = db.load_play_state().unwrap().unwrap();

        let err = player.handle_command("frobnicate").unwrap_err();
        assert!(matches!(err, CoreError::UnknownCommand(ref s) if s == "frobnicate"));
        assert_eq!(db.load_play_state().unwrap().unwrap(), state_before);
        assert!(opener.opened().len() == 1); // only the start open
    }

    #[test]
    fn lookup_failure_aborts_before_any_write() {
        let db = Database::open_memory().unwrap();
        // Session references an id the tree cannot resolve.
        let state = PlayState::new("root", vec![ItemId::from("ghost"), ItemId::from("a")]);
        db.save_play_state(&state).unwrap();

        let tree = tree();
        let opener = RecordingOpener::new();
        let player = Player::new(&db, &tree, &opener);

        let err = player.advance(true).unwrap_err();
        assert!(matches!(err, CoreError::ItemLookup { .. }));
        assert_eq!(db.load_play_state().unwrap().unwrap(), state);
        assert!(db.load_catalog().unwrap().is_empty());
        assert!(opener.opened().is_empty());
    }

    #[test]
    fn broken_next_item_still_commits_the_advance() {
        let db = Database::open_memory().unwrap();
        let state = PlayState::new("root", vec![ItemId::from("a"), ItemId::from("ghost")]);
        db.save_play_state(&state).unwrap();

        let tree = tree();
        let opener = RecordingOpener::new();
        let player = Player::new(&db, &tree, &opener);

        let event = player.advance(true).unwrap();
        assert!(matches!(event, Event::ItemCompleted { opened: None, .. }));
        assert_eq!(db.load_play_state().unwrap().unwrap().index, 1);
        assert!(db.load_catalog().unwrap().is_done_today(&"a".into()));
    }

    #[test]
    fn status_reports_current_item() {
        let db = Database::open_memory().unwrap();
        let tree = tree();
        let opener = RecordingOpener::new();
        let player = Player::new(&db, &tree, &opener);
        player.start(Some("root")).unwrap();

        match player.status().unwrap() {
            Event::SessionSnapshot { state, current, .. } => {
                assert_eq!(state, SessionState::Active);
                assert_eq!(current.unwrap().id, ItemId::from("a"));
            }
            other => panic!("expected SessionSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn reset_now_clears_expired_flags() {
        let db = Database::open_memory().unwrap();
        let mut catalog = Catalog::new();
        catalog.set_done(&"a".into(), true, yesterday());
        catalog.set_done(&"b".into(), true, Utc::now());
        db.save_catalog(&catalog).unwrap();

        let tree = tree();
        let opener = RecordingOpener::new();
        let player = Player::new(&db, &tree, &opener);

        let event = player.reset_now().unwrap();
        assert!(matches!(event, Event::DailyReset { cleared: 1, .. }));
        let catalog = db.load_catalog().unwrap();
        assert!(!catalog.is_done_today(&"a".into()));
        assert!(catalog.is_done_today(&"b".into()));
    }

    #[test]
    fn manual_edits_persist() {
        let db = Database::open_memory().unwrap();
        let tree = tree();
        let opener = RecordingOpener::new();
        let player = Player::new(&db, &tree, &opener);

        player
            .set_item_category(&"a".into(), Some("Word-Game".into()))
            .unwrap();
        player.set_item_done(&"a".into(), true).unwrap();
        let catalog = db.load_catalog().unwrap();
        assert_eq!(catalog.category_of(&"a".into()), "Word-Game");
        assert!(catalog.is_done_today(&"a".into()));

        player.set_item_done(&"a".into(), false).unwrap();
        assert!(!db.load_catalog().unwrap().is_done_today(&"a".into()));
    }

    #[test]
    fn list_folder_groups_by_category() {
        let db = Database::open_memory().unwrap();
        let mut catalog = Catalog::new();
        catalog.set_category(&"a".into(), Some("Word-Game".into()));
        catalog.set_category(&"b".into(), Some("Geo-Game".into()));
        db.save_catalog(&catalog).unwrap();

        let tree = tree();
        let opener = RecordingOpener::new();
        let player = Player::new(&db, &tree, &opener);

        let listing = player.list_folder(Some("root")).unwrap();
        assert_eq!(listing.total, 3);
        let names: Vec<&str> = listing.groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(names, ["Word-Game", "Geo-Game", "Uncategorized"]);
        assert_eq!(listing.groups[2].items[0].item.id, ItemId::from("c"));
    }

    #[test]
    fn category_toggles_persist() {
        let db = Database::open_memory().unwrap();
        let tree = tree();
        let opener = RecordingOpener::new();
        let player = Player::new(&db, &tree, &opener);

        player.set_category_enabled("Geo-Game", false).unwrap();
        assert!(!db.load_registry().unwrap().is_enabled("Geo-Game"));

        let open = player.toggle_category_open("Geo-Game").unwrap();
        assert!(!open);
    }
}
