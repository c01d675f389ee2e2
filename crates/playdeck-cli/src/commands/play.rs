use clap::Subcommand;
use playdeck_core::error::Result;
use playdeck_core::opener::{ItemOpener, NullOpener, SystemOpener};
use playdeck_core::play::{Command, Player};
use playdeck_core::storage::Config;
use playdeck_core::{BookmarkSource, Event};

use super::common;

#[derive(Subcommand)]
pub enum PlayAction {
    /// Start a play session over a folder
    Start {
        /// Folder id; defaults to the last one used
        #[arg(long)]
        folder: Option<String>,
    },
    /// Mark the current item done and advance
    Done,
    /// Skip the current item and advance
    Skip,
    /// Dispatch a raw wire command (mark_done / skip_game)
    Command { name: String },
    /// Print the current session state as JSON
    Status,
}

pub fn run(action: PlayAction) -> Result<()> {
    // Reject unknown wire commands before touching any state.
    if let PlayAction::Command { name } = &action {
        name.parse::<Command>()?;
    }

    let config = Config::load_or_default();
    let db = common::open_db()?;
    let tree = common::load_tree(&config)?;

    let event = if config.playback.auto_open {
        dispatch(&Player::new(&db, &tree, &SystemOpener), action)?
    } else {
        dispatch(&Player::new(&db, &tree, &NullOpener), action)?
    };

    if config.playback.announce {
        if let Event::SessionStarted {
            opened: Some(item), ..
        }
        | Event::ItemCompleted {
            opened: Some(item), ..
        }
        | Event::ItemSkipped {
            opened: Some(item), ..
        } = &event
        {
            eprintln!("Opened: {}", item.title);
        }
    }
    common::print_event(&event)
}

fn dispatch<S: BookmarkSource, O: ItemOpener>(
    player: &Player<S, O>,
    action: PlayAction,
) -> Result<Event> {
    match action {
        PlayAction::Start { folder } => player.start(folder.as_deref()),
        PlayAction::Done => player.advance(true),
        PlayAction::Skip => player.advance(false),
        PlayAction::Command { name } => player.handle_command(&name),
        PlayAction::Status => player.status(),
    }
}
