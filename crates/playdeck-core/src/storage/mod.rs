mod config;
pub mod database;

pub use config::{BookmarksConfig, Config, PlaybackConfig};
pub use database::Database;

use std::path::PathBuf;

/// Returns `~/.config/playdeck[-dev]/` based on PLAYDECK_ENV.
///
/// Set PLAYDECK_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("PLAYDECK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("playdeck-dev")
    } else {
        base_dir.join("playdeck")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
