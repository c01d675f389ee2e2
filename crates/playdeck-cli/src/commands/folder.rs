use clap::Subcommand;
use playdeck_core::error::Result;
use playdeck_core::storage::Config;
use playdeck_core::BookmarkSource;

use super::common;

#[derive(Subcommand)]
pub enum FolderAction {
    /// List the bookmark tree's folders
    List,
}

pub fn run(action: FolderAction) -> Result<()> {
    let config = Config::load_or_default();
    let tree = common::load_tree(&config)?;

    match action {
        FolderAction::List => {
            for folder in tree.folders() {
                let title = if folder.title.is_empty() {
                    "(no name)"
                } else {
                    &folder.title
                };
                println!("{}  {title}", folder.id);
            }
            Ok(())
        }
    }
}
