//! Built-in setting categories.

use chrono::NaiveDate;
use paramstage_config::{
    Category, CategoryDescriptor, CategoryRef, DeclaredCategory, ParameterDefinition, ValidationResult,
    DATE_FORMAT,
};

const NETWORK_MODES: &[&str] = &["dhcp", "static"];
const THEMES: &[&str] = &["light", "dark", "system"];

/// All categories managed by the CLI, in display order.
pub fn all() -> Vec<CategoryRef> {
    vec![network(), display(), schedule()]
}

/// Finds a category by title.
pub fn find(title: &str) -> Option<CategoryRef> {
    all().into_iter().find(|c| c.title() == title)
}

/// Network settings. A static address is required in static mode.
pub fn network() -> CategoryRef {
    DeclaredCategory::new(
        "network",
        CategoryDescriptor::new("network")
            .with_parameter(ParameterDefinition::string("hostname", 63))
            .with_parameter(ParameterDefinition::option_set_of("mode", NETWORK_MODES))
            .with_parameter(ParameterDefinition::string("address", 45))
            .with_parameter(ParameterDefinition::numeric("port", 1, 65535))
            .with_parameter(ParameterDefinition::string("api_key", 64).password()),
    )
    .with_options("mode", NETWORK_MODES)
    .with_validator(|values| {
        let is_static = values.get("mode").is_some_and(|m| m == "static");
        let has_address = values.get("address").is_some_and(|a| !a.is_empty());
        if is_static && !has_address {
            ValidationResult::failure("network: static mode requires an address")
        } else {
            ValidationResult::Success
        }
    })
    .into_ref()
}

/// Display settings.
pub fn display() -> CategoryRef {
    DeclaredCategory::new(
        "display",
        CategoryDescriptor::new("display")
            .with_parameter(ParameterDefinition::numeric("brightness", 0, 10))
            .with_parameter(ParameterDefinition::float("contrast", 0.0, 2.0))
            .with_parameter(ParameterDefinition::boolean("night_mode"))
            .with_parameter(ParameterDefinition::option_set_of("theme", THEMES)),
    )
    .with_options("theme", THEMES)
    .into_ref()
}

/// Schedule settings. The end date may not precede the start date.
pub fn schedule() -> CategoryRef {
    DeclaredCategory::new(
        "schedule",
        CategoryDescriptor::new("schedule")
            .with_parameter(ParameterDefinition::date("start_date"))
            .with_parameter(ParameterDefinition::date("end_date"))
            .with_parameter(ParameterDefinition::numeric("interval_minutes", 1, 1440)),
    )
    .with_validator(|values| {
        let start = values.get("start_date").and_then(|v| parse_date(v));
        let end = values.get("end_date").and_then(|v| parse_date(v));
        match (start, end) {
            (Some(start), Some(end)) if end < start => ValidationResult::failure(format!(
                "schedule: end_date ({}) is before start_date ({})",
                end, start
            )),
            _ => ValidationResult::Success,
        }
    })
    .into_ref()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use paramstage_config::ParameterValues;

    fn values(pairs: &[(&str, &str)]) -> ParameterValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_titles_are_unique() {
        let titles: Vec<String> = all().iter().map(|c| c.title().to_string()).collect();
        assert_eq!(titles, ["network", "display", "schedule"]);
        assert!(find("display").is_some());
        assert!(find("audio").is_none());
    }

    #[test]
    fn test_network_static_needs_address() {
        let network = network();
        assert!(network
            .validate(&values(&[("mode", "static"), ("address", "")]))
            .is_failure());
        assert!(network
            .validate(&values(&[("mode", "static"), ("address", "10.0.0.2")]))
            .is_success());
        assert!(network.validate(&values(&[("mode", "dhcp")])).is_success());
        assert_eq!(network.options_for("mode"), ["dhcp", "static"]);
    }

    #[test]
    fn test_schedule_order() {
        let schedule = schedule();
        assert!(schedule
            .validate(&values(&[("start_date", "2024-03-01"), ("end_date", "2024-02-01")]))
            .is_failure());
        assert!(schedule
            .validate(&values(&[("start_date", "2024-03-01"), ("end_date", "")]))
            .is_success());
    }
}
