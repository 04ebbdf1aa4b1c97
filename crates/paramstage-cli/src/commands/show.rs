//! Show command implementation.

use std::path::Path;

use paramstage_config::ParameterStore;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::categories;
use crate::cli::OutputFormat;
use crate::commands::open_mediator;
use crate::error::CliResult;
use crate::output::{display_value, print_header, print_json, print_output, SettingRow};

/// Execute the show command.
pub fn execute(db: &Path, format: OutputFormat) -> CliResult<()> {
    let categories = categories::all();
    let mut mediator = open_mediator(db)?;
    let store = mediator.load_parameters(&categories)?;
    let rows = setting_rows(&store);

    match format {
        OutputFormat::Table => {
            print_header("Current Settings");
            print_output(&rows, format, |_| String::new())?;
        }
        OutputFormat::Json => print_json(&GroupedSettings(&rows))?,
        OutputFormat::Minimal => {
            print_output(&rows, format, |row| {
                format!("{}.{}={}", row.category, row.name, row.value)
            })?;
        }
    }
    Ok(())
}

/// Effective values of every parameter, passwords masked.
pub fn setting_rows(store: &ParameterStore) -> Vec<SettingRow> {
    store
        .categories()
        .flat_map(|category| {
            store.parameters(category).iter().map(move |p| SettingRow {
                category: category.to_string(),
                name: p.name().to_string(),
                param_type: p.definition().param_type.to_string(),
                value: display_value(p.definition(), p.effective_value()),
            })
        })
        .collect()
}

/// Rows as a `{category: {name: value}}` object in row order.
struct GroupedSettings<'a>(&'a [SettingRow]);

impl Serialize for GroupedSettings<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        let mut start = 0;
        while start < self.0.len() {
            let category = &self.0[start].category;
            let len = self.0[start..]
                .iter()
                .take_while(|row| &row.category == category)
                .count();
            map.serialize_entry(category, &CategorySettings(&self.0[start..start + len]))?;
            start += len;
        }
        map.end()
    }
}

struct CategorySettings<'a>(&'a [SettingRow]);

impl Serialize for CategorySettings<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|row| (&row.name, &row.value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MASK;
    use paramstage_config::ConfigurationMediator;
    use paramstage_storage::InMemoryMedium;

    #[test]
    fn test_rows_follow_declaration_order() {
        let mut mediator = ConfigurationMediator::new(InMemoryMedium::new());
        let mut store = mediator.load_parameters(&categories::all()).unwrap();
        store.set_parameter_value("network", "api_key", "secret");
        store.set_parameter_value("display", "brightness", "4");

        let rows = setting_rows(&store);
        assert_eq!(rows[0].category, "network");
        assert_eq!(rows[0].name, "hostname");

        let key = rows.iter().find(|r| r.name == "api_key").unwrap();
        assert_eq!(key.value, MASK);
        let brightness = rows.iter().find(|r| r.name == "brightness").unwrap();
        assert_eq!(brightness.value, "4");
        assert_eq!(brightness.param_type, "int");
    }

    #[test]
    fn test_json_keeps_registration_order() {
        let mut mediator = ConfigurationMediator::new(InMemoryMedium::new());
        let mut store = mediator.load_parameters(&categories::all()).unwrap();
        store.set_parameter_value("display", "brightness", "4");

        let rows = setting_rows(&store);
        let json = serde_json::to_string(&GroupedSettings(&rows)).unwrap();
        let network = json.find("\"network\"").unwrap();
        let display = json.find("\"display\"").unwrap();
        let schedule = json.find("\"schedule\"").unwrap();
        assert!(network < display && display < schedule);
        assert!(json.find("\"hostname\"").unwrap() < json.find("\"mode\"").unwrap());

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["display"]["brightness"], "4");
    }
}
