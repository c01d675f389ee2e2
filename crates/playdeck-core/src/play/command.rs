//! The inbound command surface.

use std::str::FromStr;

use crate::error::CoreError;

/// A named play command as received from the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Advance and mark the current item completed.
    MarkDone,
    /// Advance without touching the catalog.
    SkipGame,
}

impl Command {
    pub const MARK_DONE: &'static str = "mark_done";
    pub const SKIP_GAME: &'static str = "skip_game";

    pub fn wire_name(&self) -> &'static str {
        match self {
            Command::MarkDone => Self::MARK_DONE,
            Command::SkipGame => Self::SKIP_GAME,
        }
    }

    pub fn marks_done(&self) -> bool {
        matches!(self, Command::MarkDone)
    }
}

impl FromStr for Command {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::MARK_DONE => Ok(Command::MarkDone),
            Self::SKIP_GAME => Ok(Command::SkipGame),
            other => Err(CoreError::UnknownCommand(other.to_string())),
        }
    }
}
