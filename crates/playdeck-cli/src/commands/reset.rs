use clap::Subcommand;
use playdeck_core::error::Result;
use playdeck_core::opener::NullOpener;
use playdeck_core::play::Player;

use super::common;

#[derive(Subcommand)]
pub enum ResetAction {
    /// Apply the daily reset immediately (idempotent)
    Run,
}

pub fn run(action: ResetAction) -> Result<()> {
    let db = common::open_db()?;
    let tree = common::empty_tree()?;
    let player = Player::new(&db, &tree, &NullOpener);

    match action {
        ResetAction::Run => {
            let event = player.reset_now()?;
            common::print_event(&event)
        }
    }
}
