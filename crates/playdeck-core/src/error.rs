//! Core error types for playdeck-core.
//!
//! This module defines the error hierarchy using thiserror. Command-level
//! failures (`NoActiveSession`, `UnknownCommand`, `ItemLookup`) are all
//! locally recoverable: the play session stays in its prior state and the
//! next command proceeds normally.

use std::path::PathBuf;
use thiserror::Error;

use crate::bookmarks::ItemId;

/// Core error type for playdeck-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A play command arrived with no persisted session (or an empty
    /// folder reference). Nothing was changed.
    #[error("no active play session")]
    NoActiveSession,

    /// A command name outside the wire surface (`mark_done`, `skip_game`).
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The bookmark source could not resolve the current item. The advance
    /// is aborted before any persisted state is written.
    #[error("bookmark lookup failed for '{id}': {message}")]
    ItemLookup { id: ItemId, message: String },

    /// Key-value store read/write failures
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Bookmark tree loading/traversal errors
    #[error("bookmark tree error: {0}")]
    Bookmarks(#[from] BookmarkError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the database file
    #[error("failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Database is locked by another writer
    #[error("database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Missing required configuration key
    #[error("missing required configuration key: {0}")]
    MissingKey(String),

    /// Failed to parse configuration
    #[error("failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Bookmark tree errors.
#[derive(Error, Debug)]
pub enum BookmarkError {
    /// The tree file could not be read or parsed
    #[error("failed to load bookmark tree from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// A node carries a URL the `url` crate rejects
    #[error("invalid url '{url}' on bookmark '{title}': {message}")]
    InvalidUrl {
        title: String,
        url: String,
        message: String,
    },

    /// Two nodes share the same id
    #[error("duplicate bookmark id: {0}")]
    DuplicateId(ItemId),

    /// No folder with the given id exists in the tree
    #[error("unknown folder: {0}")]
    UnknownFolder(String),

    /// No bookmark with the given id exists in the tree
    #[error("unknown bookmark: {0}")]
    UnknownItem(ItemId),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
