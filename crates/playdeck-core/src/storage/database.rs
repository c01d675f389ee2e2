//! SQLite-backed key-value store.
//!
//! Every piece of persisted state lives under one of four keys, each a JSON
//! document, each independently readable and writable:
//! - `playState` — the active session; absent means no session
//! - `bookmarkData` — the item catalog
//! - `categoryStates` — the category registry
//! - `lastFolderId` — last folder the user played (plain string)
//!
//! `kv_set_many` writes several keys in one transaction; `advance` relies on
//! it so the catalog and the session pointer commit as a unit.

use rusqlite::{params, Connection};

use crate::catalog::Catalog;
use crate::category::CategoryRegistry;
use crate::error::{CoreError, Result, StorageError};
use crate::play::PlayState;

use super::data_dir;

pub const KEY_PLAY_STATE: &str = "playState";
pub const KEY_BOOKMARK_DATA: &str = "bookmarkData";
pub const KEY_CATEGORY_STATES: &str = "categoryStates";
pub const KEY_LAST_FOLDER: &str = "lastFolderId";

/// SQLite database holding all persisted state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/playdeck/playdeck.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("playdeck.db");
        let conn = Connection::open(&path).map_err(|source| StorageError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate().map_err(StorageError::from)?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        let db = Self { conn };
        db.migrate().map_err(StorageError::from)?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Set several keys in a single transaction. All writes land or none do.
    pub fn kv_set_many(&self, pairs: &[(&str, String)]) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in pairs {
            tx.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    // ── Typed accessors ──────────────────────────────────────────────

    /// Load the persisted session. `None` means no active session.
    pub fn load_play_state(&self) -> Result<Option<PlayState>> {
        self.load_json(KEY_PLAY_STATE)
    }

    pub fn save_play_state(&self, state: &PlayState) -> Result<()> {
        self.kv_set(KEY_PLAY_STATE, &serde_json::to_string(state)?)?;
        Ok(())
    }

    /// Load the catalog, defaulting to empty when absent.
    pub fn load_catalog(&self) -> Result<Catalog> {
        Ok(self.load_json(KEY_BOOKMARK_DATA)?.unwrap_or_default())
    }

    pub fn save_catalog(&self, catalog: &Catalog) -> Result<()> {
        self.kv_set(KEY_BOOKMARK_DATA, &serde_json::to_string(catalog)?)?;
        Ok(())
    }

    /// Load the category registry, defaulting to empty when absent.
    pub fn load_registry(&self) -> Result<CategoryRegistry> {
        Ok(self.load_json(KEY_CATEGORY_STATES)?.unwrap_or_default())
    }

    pub fn save_registry(&self, registry: &CategoryRegistry) -> Result<()> {
        self.kv_set(KEY_CATEGORY_STATES, &serde_json::to_string(registry)?)?;
        Ok(())
    }

    pub fn last_folder_id(&self) -> Result<Option<String>> {
        Ok(self.kv_get(KEY_LAST_FOLDER)?)
    }

    pub fn set_last_folder_id(&self, folder_id: &str) -> Result<()> {
        self.kv_set(KEY_LAST_FOLDER, folder_id)?;
        Ok(())
    }

    fn load_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.kv_get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw).map_err(CoreError::Json)?)),
            None => Ok(None),
        }
    }
}
