//! Set command implementation.
//!
//! Runs a non-interactive session: every assignment is staged, the input is
//! validated once, and the session is saved or aborted as a whole.

use std::path::Path;

use clap::Args;
use paramstage_config::{
    initialize_and_start, CategoryDescriptor, ConfigError, ConfigResult, FrontEnd,
    ParameterValues, Session, SessionState,
};

use crate::categories;
use crate::cli::OutputFormat;
use crate::commands::{open_mediator, parse_assignment, Assignment};
use crate::error::{CliError, CliResult};
use crate::output::{print_error, print_json, print_success};

/// Arguments for the set command.
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Assignments of the form category.name=value
    #[arg(required = true, value_name = "CATEGORY.NAME=VALUE")]
    pub assignments: Vec<String>,
}

/// Applies a fixed list of assignments in a single round.
#[derive(Debug, Default)]
pub struct ScriptedFrontEnd {
    assignments: Vec<Assignment>,
    errors: Vec<String>,
}

impl ScriptedFrontEnd {
    /// Creates a front-end for the given assignments.
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self {
            assignments,
            errors: Vec::new(),
        }
    }

    /// Validation failures of the last round.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl FrontEnd for ScriptedFrontEnd {
    fn init(&mut self, _descriptor: &CategoryDescriptor, _values: &ParameterValues) {}

    fn start(&mut self, session: &mut Session) -> ConfigResult<()> {
        for a in &self.assignments {
            if !session.store().contains(&a.category, &a.name) {
                return Err(ConfigError::FrontEnd(format!(
                    "unknown setting '{}.{}'",
                    a.category, a.name
                )));
            }
        }
        Ok(())
    }

    fn update(&mut self, session: &mut Session) -> ConfigResult<()> {
        for a in &self.assignments {
            session.set_value(&a.category, &a.name, a.value.clone());
        }

        let results = session.validate_input();
        if results.is_failure() {
            self.errors = results.into_errors();
            session.cancel();
        }
        Ok(())
    }
}

/// Execute the set command.
pub fn execute(args: SetArgs, db: &Path, format: OutputFormat) -> CliResult<()> {
    let assignments = args
        .assignments
        .iter()
        .map(|s| parse_assignment(s))
        .collect::<CliResult<Vec<_>>>()?;

    let mut mediator = open_mediator(db)?;
    let mut front_end = ScriptedFrontEnd::new(assignments);
    let state = initialize_and_start(&mut mediator, categories::all(), &mut front_end)?;

    match state {
        SessionState::InputValidated => {
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "saved": true,
                    "errors": [],
                }))?,
                OutputFormat::Minimal => println!("saved"),
                OutputFormat::Table => print_success(&format!(
                    "Saved {} setting(s)",
                    front_end.assignments.len()
                )),
            }
            Ok(())
        }
        _ => {
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "saved": false,
                    "errors": front_end.errors(),
                }))?,
                _ => {
                    for error in front_end.errors() {
                        print_error(error);
                    }
                }
            }
            Err(CliError::Rejected(front_end.errors().len()))
        }
    }
}
