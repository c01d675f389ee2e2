//! Shared plumbing for CLI commands.

use playdeck_core::error::Result;
use playdeck_core::storage::Config;
use playdeck_core::{Database, Event, FileTree};

pub fn open_db() -> Result<Database> {
    Database::open()
}

/// Load the bookmark tree named by `bookmarks.file`.
pub fn load_tree(config: &Config) -> Result<FileTree> {
    let path = config.bookmarks_file()?;
    Ok(FileTree::load(&path)?)
}

/// An empty tree, for commands that never touch the bookmark source.
pub fn empty_tree() -> Result<FileTree> {
    Ok(FileTree::from_roots(Vec::new())?)
}

pub fn print_event(event: &Event) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}
