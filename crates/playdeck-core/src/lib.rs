//! # Playdeck Core Library
//!
//! This library provides the core business logic for Playdeck, a daily
//! play-queue manager over a bookmark tree. It implements a CLI-first
//! philosophy where all operations are available via a standalone CLI
//! binary; any GUI would be a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Play Session**: a pointer over an immutable, filtered queue of
//!   bookmark ids, advanced one item at a time by `mark_done` / `skip_game`
//!   commands
//! - **Catalog & Category Registry**: per-item completion state and
//!   per-category enablement, both persisted as JSON documents in a SQLite
//!   key-value store
//! - **Daily Reset**: an idempotent job that expires completion flags at
//!   00:00 UTC, run both on a recurring timer and as a startup catch-up
//! - **Bookmark Source**: a read-only JSON bookmark tree the core queries
//!   and never mutates
//!
//! ## Key Components
//!
//! - [`Player`]: command orchestration over the persisted state
//! - [`PlayState`]: the session state machine
//! - [`Database`]: key-value persistence
//! - [`Config`]: application configuration management

pub mod bookmarks;
pub mod catalog;
pub mod category;
pub mod error;
pub mod events;
pub mod opener;
pub mod play;
pub mod queue;
pub mod reset;
pub mod storage;

pub use bookmarks::{BookmarkNode, BookmarkSource, FileTree, Folder, Item, ItemId};
pub use catalog::{Catalog, CatalogEntry, UNCATEGORIZED};
pub use category::{CategoryRegistry, CategoryState, DEFAULT_CATEGORIES};
pub use error::{BookmarkError, ConfigError, CoreError, Result, StorageError};
pub use events::Event;
pub use opener::{ItemOpener, NullOpener, SystemOpener};
pub use play::{Command, PlayState, Player, SessionState};
pub use queue::build_queue;
pub use storage::{Config, Database};
