use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "playdeck-cli", version, about = "Playdeck CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play session control
    Play {
        #[command(subcommand)]
        action: commands::play::PlayAction,
    },
    /// Bookmark item management
    Item {
        #[command(subcommand)]
        action: commands::item::ItemAction,
    },
    /// Category management
    Category {
        #[command(subcommand)]
        action: commands::category::CategoryAction,
    },
    /// Bookmark folder listing
    Folder {
        #[command(subcommand)]
        action: commands::folder::FolderAction,
    },
    /// Daily reset control
    Reset {
        #[command(subcommand)]
        action: commands::reset::ResetAction,
    },
    /// Run the daily reset daemon
    Watch,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let filter = std::env::var("PLAYDECK_LOG")
        .unwrap_or_else(|_| "playdeck_core=info,playdeck_cli=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Play { action } => commands::play::run(action),
        Commands::Item { action } => commands::item::run(action),
        Commands::Category { action } => commands::category::run(action),
        Commands::Folder { action } => commands::folder::run(action),
        Commands::Reset { action } => commands::reset::run(action),
        Commands::Watch => commands::watch::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
