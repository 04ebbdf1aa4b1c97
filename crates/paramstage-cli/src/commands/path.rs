//! Path command implementation.

use std::path::Path;

use crate::cli::OutputFormat;
use crate::error::CliResult;
use crate::output::{print_info, print_json};

/// Execute the path command.
pub fn execute(db: &Path, format: OutputFormat) -> CliResult<()> {
    let exists = db.exists();
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "path": db.display().to_string(),
            "exists": exists,
        }))?,
        OutputFormat::Minimal => println!("{}", db.display()),
        OutputFormat::Table => {
            print_info(&format!("Settings database: {}", db.display()));
            if exists {
                print_info("Status: exists");
            } else {
                print_info("Status: not created yet (using defaults)");
            }
        }
    }
    Ok(())
}
