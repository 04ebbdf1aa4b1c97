//! Edit command implementation.
//!
//! Prompts for every setting on the console. An empty answer keeps the
//! current value and `:q` cancels the session without saving.

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;
use paramstage_config::{
    initialize_and_start, CategoryDescriptor, ConfigResult, FrontEnd, ParameterValues, Session,
    SessionState,
};

use crate::categories;
use crate::commands::open_mediator;
use crate::error::CliResult;
use crate::output::{display_value, print_info, print_success};

/// Typed at any prompt to cancel the session.
pub const CANCEL: &str = ":q";

enum Answer {
    Value(String),
    Keep,
    Cancel,
}

/// Interactive front-end over a line-based reader and a writer.
pub struct ConsoleFrontEnd<R, W> {
    input: R,
    output: W,
    categories: Vec<CategoryDescriptor>,
}

impl<R: BufRead, W: Write> ConsoleFrontEnd<R, W> {
    /// Creates a console front-end.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            categories: Vec::new(),
        }
    }

    /// Consumes the front-end, returning the writer.
    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_answer(&mut self) -> ConfigResult<Answer> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(Answer::Cancel);
        }
        let line = line.trim_end_matches(['\r', '\n']);
        Ok(match line {
            CANCEL => Answer::Cancel,
            "" => Answer::Keep,
            value => Answer::Value(value.to_string()),
        })
    }

    /// Prompts for one parameter until the answer is valid. Returns false
    /// if the user cancelled.
    fn prompt(&mut self, session: &mut Session, category: &str, name: &str) -> ConfigResult<bool> {
        loop {
            let definition = session.store().definition(category, name).clone();
            let current = display_value(&definition, session.store().effective_value(category, name));
            let options = session.options_for(category, name, false).join(", ");

            write!(self.output, "  {} ({})", name.bold(), definition.param_type)?;
            if !options.is_empty() {
                write!(self.output, " [{}]", options)?;
            }
            write!(self.output, " <{}>: ", current)?;
            self.output.flush()?;

            match self.read_answer()? {
                Answer::Cancel => return Ok(false),
                Answer::Keep => return Ok(true),
                Answer::Value(value) => {
                    let result = session.validate_value(category, name, &value);
                    match result.error() {
                        None => {
                            session.set_value(category, name, value);
                            return Ok(true);
                        }
                        Some(error) => writeln!(self.output, "  {} {}", "✗".red(), error)?,
                    }
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> FrontEnd for ConsoleFrontEnd<R, W> {
    fn init(&mut self, descriptor: &CategoryDescriptor, _values: &ParameterValues) {
        self.categories.push(descriptor.clone());
    }

    fn start(&mut self, _session: &mut Session) -> ConfigResult<()> {
        writeln!(
            self.output,
            "Press enter to keep a value, type {} to cancel.",
            CANCEL
        )?;
        Ok(())
    }

    fn update(&mut self, session: &mut Session) -> ConfigResult<()> {
        let categories = self.categories.clone();
        for descriptor in &categories {
            writeln!(self.output, "\n[{}]", descriptor.title)?;
            for definition in &descriptor.parameters {
                if !self.prompt(session, &descriptor.title, &definition.name)? {
                    session.cancel();
                    return Ok(());
                }
            }
        }

        let results = session.validate_input();
        for error in results.errors() {
            writeln!(self.output, "{} {}", "✗".red(), error)?;
        }
        Ok(())
    }

    fn cleanup(&mut self) {
        let _ = self.output.flush();
    }
}

/// Execute the edit command.
pub fn execute(db: &Path) -> CliResult<()> {
    let mut mediator = open_mediator(db)?;
    let stdin = io::stdin();
    let mut front_end = ConsoleFrontEnd::new(stdin.lock(), io::stdout());

    match initialize_and_start(&mut mediator, categories::all(), &mut front_end)? {
        SessionState::InputValidated => print_success("Settings saved"),
        _ => print_info("Edit cancelled, nothing was saved"),
    }
    Ok(())
}
