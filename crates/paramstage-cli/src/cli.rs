//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{ResetArgs, SetArgs};
use crate::error::{CliError, CliResult};

/// Paramstage - stage, validate and persist device settings
#[derive(Parser, Debug)]
#[command(name = "paramstage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings database
    #[arg(long, env = "PARAMSTAGE_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Returns the settings database location.
    pub fn db_path(&self) -> CliResult<PathBuf> {
        match &self.db {
            Some(path) => Ok(path.clone()),
            None => default_db_path(),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show current settings
    Show,

    /// Set one or more settings (category.name=value)
    Set(SetArgs),

    /// Edit settings interactively
    Edit,

    /// Show which categories are stored and complete
    Status,

    /// Reset settings to defaults
    Reset(ResetArgs),

    /// Show settings database location
    Path,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Minimal output (one line per value)
    Minimal,
}

/// Default database location under the user's config directory.
fn default_db_path() -> CliResult<PathBuf> {
    let base = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or(CliError::NoConfigDir)?;
    Ok(base.join("paramstage").join("settings.redb"))
}
