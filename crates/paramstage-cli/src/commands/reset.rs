//! Reset command implementation.

use std::path::Path;

use clap::Args;
use paramstage_config::{Category, CategoryRef, ConfigurationMediator};
use paramstage_storage::StorageMedium;

use crate::categories;
use crate::commands::open_mediator;
use crate::error::{CliError, CliResult};
use crate::output::{print_error, print_success, print_warning};

/// Arguments for the reset command.
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Reset every category
    #[arg(long, conflicts_with = "category")]
    pub all: bool,

    /// Category to reset
    pub category: Option<String>,
}

/// Execute the reset command.
pub fn execute(args: ResetArgs, db: &Path) -> CliResult<()> {
    let targets = if args.all {
        categories::all()
    } else if let Some(title) = &args.category {
        let category =
            categories::find(title).ok_or_else(|| CliError::UnknownCategory(title.clone()))?;
        vec![category]
    } else {
        print_warning("Use --all to reset every category, or name the category to reset");
        return Ok(());
    };

    let mut mediator = open_mediator(db)?;
    reset(&mut mediator, &targets)
}

/// Deletes the targets' files, failing if any of them was refused.
fn reset<M: StorageMedium>(
    mediator: &mut ConfigurationMediator<M>,
    targets: &[CategoryRef],
) -> CliResult<()> {
    let results = mediator.delete(targets);
    let mut failed = 0;
    for (category, deleted) in targets.iter().zip(results) {
        if deleted {
            print_success(&format!("Reset {} to defaults", category.title()));
        } else {
            print_error(&format!("Could not reset {}", category.title()));
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(CliError::ResetFailed(failed));
    }
    Ok(())
}
