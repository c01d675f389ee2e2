use clap::Subcommand;
use playdeck_core::error::Result;
use playdeck_core::opener::NullOpener;
use playdeck_core::play::Player;
use playdeck_core::storage::Config;
use playdeck_core::ItemId;

use super::common;

#[derive(Subcommand)]
pub enum ItemAction {
    /// List a folder's items grouped by category
    List {
        /// Folder id; defaults to the last one used
        #[arg(long)]
        folder: Option<String>,
    },
    /// Assign an item to a category
    SetCategory { id: String, category: String },
    /// Mark an item done for today
    Done { id: String },
    /// Clear an item's done-today flag
    Undone { id: String },
}

pub fn run(action: ItemAction) -> Result<()> {
    let config = Config::load_or_default();
    let db = common::open_db()?;
    let tree = common::load_tree(&config)?;
    let player = Player::new(&db, &tree, &NullOpener);

    match action {
        ItemAction::List { folder } => {
            let listing = player.list_folder(folder.as_deref())?;
            for group in &listing.groups {
                let flag = if group.enabled { "enabled" } else { "disabled" };
                println!("{} [{flag}] ({})", group.category, group.items.len());
                if group.open {
                    for listed in &group.items {
                        let mark = if listed.done_today { "x" } else { " " };
                        println!("  [{mark}] {}  {}", listed.item.title, listed.item.id);
                    }
                }
            }
            println!("Loaded {} bookmarks.", listing.total);
            Ok(())
        }
        ItemAction::SetCategory { id, category } => {
            let id = ItemId::from(id);
            player.set_item_category(&id, Some(category))
        }
        ItemAction::Done { id } => {
            let id = ItemId::from(id);
            player.set_item_done(&id, true)
        }
        ItemAction::Undone { id } => {
            let id = ItemId::from(id);
            player.set_item_done(&id, false)
        }
    }
}
