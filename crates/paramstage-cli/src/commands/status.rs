//! Status command implementation.

use std::path::Path;

use paramstage_config::{Category, CategoryRef, ConfigurationMediator};
use paramstage_storage::StorageMedium;

use crate::categories;
use crate::cli::OutputFormat;
use crate::commands::open_mediator;
use crate::error::CliResult;
use crate::output::{print_header, print_output, StatusRow};

/// Execute the status command.
pub fn execute(db: &Path, format: OutputFormat) -> CliResult<()> {
    let mediator = open_mediator(db)?;
    let rows = status_rows(&mediator, &categories::all())?;

    if format == OutputFormat::Table {
        print_header("Stored Settings");
    }
    print_output(&rows, format, |row| {
        let state = match (row.exists, row.complete) {
            (_, true) => "complete",
            (true, false) => "incomplete",
            (false, _) => "missing",
        };
        format!("{}={}", row.category, state)
    })
}

/// Existence and completeness of every category's file.
pub fn status_rows<M: StorageMedium>(
    mediator: &ConfigurationMediator<M>,
    categories: &[CategoryRef],
) -> CliResult<Vec<StatusRow>> {
    categories
        .iter()
        .map(|category| {
            Ok(StatusRow {
                category: category.title().to_string(),
                file: category.file_name().to_string(),
                exists: mediator.exists(category.as_ref())?,
                complete: mediator.is_complete(category.as_ref())?,
            })
        })
        .collect()
}
