use clap::Subcommand;
use playdeck_core::error::{ConfigError, Result};
use playdeck_core::storage::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print a config value by dot-separated key
    Get { key: String },
    /// Set a config value by dot-separated key
    Set { key: String, value: String },
    /// Print the whole configuration as TOML
    Show,
}

pub fn run(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => {
                    println!("{value}");
                    Ok(())
                }
                None => Err(ConfigError::MissingKey(key).into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("{key} = {value}");
            Ok(())
        }
        ConfigAction::Show => {
            let config = Config::load()?;
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
            print!("{rendered}");
            Ok(())
        }
    }
}
