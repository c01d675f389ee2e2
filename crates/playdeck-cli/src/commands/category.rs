use clap::Subcommand;
use playdeck_core::error::Result;
use playdeck_core::opener::NullOpener;
use playdeck_core::play::Player;

use super::common;

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List categories and their state
    List,
    /// Include a category in play queues
    Enable { name: String },
    /// Exclude a category from play queues
    Disable { name: String },
    /// Flip a category's expanded bit
    ToggleOpen { name: String },
}

pub fn run(action: CategoryAction) -> Result<()> {
    let db = common::open_db()?;
    let tree = common::empty_tree()?;
    let player = Player::new(&db, &tree, &NullOpener);

    match action {
        CategoryAction::List => {
            for (name, state) in player.categories()?.iter() {
                let flag = if state.enabled { "enabled" } else { "disabled" };
                let fold = if state.open { "open" } else { "collapsed" };
                println!("{name}  [{flag}, {fold}]");
            }
            Ok(())
        }
        CategoryAction::Enable { name } => player.set_category_enabled(&name, true),
        CategoryAction::Disable { name } => player.set_category_enabled(&name, false),
        CategoryAction::ToggleOpen { name } => {
            let open = player.toggle_category_open(&name)?;
            println!("{name} is now {}", if open { "open" } else { "collapsed" });
            Ok(())
        }
    }
}
