//! Output formatting utilities.

use colored::Colorize;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use paramstage_config::ParameterDefinition;

use crate::cli::OutputFormat;
use crate::error::CliResult;

/// Shown instead of a password value.
pub const MASK: &str = "********";

/// Formats and prints rows based on the specified format.
///
/// `minimal` renders each row to a single line.
pub fn print_output<T, F>(data: &[T], format: OutputFormat, minimal: F) -> CliResult<()>
where
    T: Serialize + Tabled,
    F: Fn(&T) -> String,
{
    match format {
        OutputFormat::Table => print_table(data),
        OutputFormat::Json => print_json(data)?,
        OutputFormat::Minimal => {
            for item in data {
                println!("{}", minimal(item));
            }
        }
    }
    Ok(())
}

/// Prints data as a formatted table.
fn print_table<T: Tabled>(data: &[T]) {
    if data.is_empty() {
        println!("No results.");
        return;
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{}", table);
}

/// Prints data as JSON.
pub fn print_json<T: Serialize + ?Sized>(data: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Masks a value if its parameter is a password.
pub fn display_value(definition: &ParameterDefinition, value: &str) -> String {
    if definition.is_password() && !value.is_empty() {
        MASK.to_string()
    } else {
        value.to_string()
    }
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Prints an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// One setting for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct SettingRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Parameter")]
    pub name: String,
    #[tabled(rename = "Type")]
    #[serde(rename = "type")]
    pub param_type: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// Storage state of one category.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct StatusRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "File")]
    pub file: String,
    #[tabled(rename = "Exists")]
    pub exists: bool,
    #[tabled(rename = "Complete")]
    pub complete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_values_are_masked() {
        let secret = ParameterDefinition::string("api_key", 64).password();
        assert_eq!(display_value(&secret, "hunter2"), MASK);
        assert_eq!(display_value(&secret, ""), "");

        let plain = ParameterDefinition::string("hostname", 64);
        assert_eq!(display_value(&plain, "router"), "router");
    }
}
