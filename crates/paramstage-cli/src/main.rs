//! Paramstage CLI - stage, validate and persist device settings.
//!
//! # Usage
//!
//! ```bash
//! # Show current settings
//! paramstage show
//!
//! # Change settings; nothing is saved unless every value is valid
//! paramstage set display.brightness=7 network.mode=dhcp
//!
//! # Edit settings interactively
//! paramstage edit
//!
//! # Check which categories are stored
//! paramstage status --format json
//!
//! # Forget stored settings
//! paramstage reset --all
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod categories;
mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("paramstage=debug,paramstage_config=debug,paramstage_storage=debug"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("paramstage=info,paramstage_config=info,paramstage_storage=warn"))
    };

    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let format = cli.format;
    let db = cli.db_path()?;

    // Execute command
    match cli.command {
        Commands::Show => commands::show::execute(&db, format)?,
        Commands::Set(args) => commands::set::execute(args, &db, format)?,
        Commands::Edit => commands::edit::execute(&db)?,
        Commands::Status => commands::status::execute(&db, format)?,
        Commands::Reset(args) => commands::reset::execute(args, &db)?,
        Commands::Path => commands::path::execute(&db, format)?,
    }

    Ok(())
}
