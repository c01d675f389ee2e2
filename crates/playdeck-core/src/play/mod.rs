mod command;
mod player;
mod session;

pub use command::Command;
pub use player::{CategoryGroup, FolderListing, ListedItem, Player};
pub use session::{Advance, PlayState, SessionState};
