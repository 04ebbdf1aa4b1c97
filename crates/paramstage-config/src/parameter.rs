//! Parameter definitions.
//!
//! A [`ParameterDefinition`] is the static description of one setting: its
//! name, its type, a special attribute and the validator that decides which
//! strings are acceptable values. Values are always handled as strings; the
//! type only matters to validators and front-ends.

use std::fmt;
use std::rc::Rc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationResult;

/// Date format accepted by date parameters.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// TYPE AND ATTRIBUTE
// =============================================================================

/// Declared type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    /// Integer number.
    Int,
    /// Decimal number.
    Float,
    /// `true` or `false`.
    Bool,
    /// Free text.
    String,
    /// Calendar date.
    Date,
    /// One value out of a list of options.
    OptionSet,
}

impl ParameterType {
    /// Returns the string identifier for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Date => "date",
            Self::OptionSet => "option_set",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Special handling a front-end should apply to a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterAttribute {
    /// No special handling.
    #[default]
    None,
    /// The value is secret and should be masked.
    Password,
}

// =============================================================================
// DEFINITION
// =============================================================================

/// Validator function for a parameter.
pub type Validator = Rc<dyn Fn(&str) -> ValidationResult>;

/// Source of the valid options of an option-set parameter.
pub type OptionsSource = Rc<dyn Fn() -> Vec<String>>;

/// Static metadata for one parameter.
///
/// # Example
///
/// ```rust
/// use paramstage_config::ParameterDefinition;
///
/// let brightness = ParameterDefinition::numeric("brightness", 0, 10);
/// assert!(brightness.validate("5").is_success());
/// assert!(brightness.validate("11").is_failure());
/// ```
#[derive(Clone)]
pub struct ParameterDefinition {
    /// Parameter name, unique within its category.
    pub name: String,
    /// Declared type.
    pub param_type: ParameterType,
    /// Special attribute.
    pub attribute: ParameterAttribute,
    validator: Validator,
}

impl ParameterDefinition {
    /// Creates a parameter with a custom validation function.
    pub fn custom<F>(name: impl Into<String>, param_type: ParameterType, validator: F) -> Self
    where
        F: Fn(&str) -> ValidationResult + 'static,
    {
        Self {
            name: name.into(),
            param_type,
            attribute: ParameterAttribute::None,
            validator: Rc::new(validator),
        }
    }

    /// Creates an integer parameter valid within `[min, max]` (inclusive).
    ///
    /// Accepted syntax is an optional leading `-` followed by digits.
    pub fn numeric(name: impl Into<String>, min: i64, max: i64) -> Self {
        let name = name.into();
        let label = name.clone();
        Self::custom(name, ParameterType::Int, move |value| match parse_int(value) {
            Some(v) if v >= min && v <= max => ValidationResult::Success,
            _ => out_of_range(&label, value, min, max),
        })
    }

    /// Creates a decimal parameter valid within `[min, max]` (inclusive).
    ///
    /// Accepted syntax is an optional leading `-`, digits, and an optional
    /// `.` followed by at least one digit.
    pub fn float(name: impl Into<String>, min: f64, max: f64) -> Self {
        let name = name.into();
        let label = name.clone();
        Self::custom(name, ParameterType::Float, move |value| match parse_float(value) {
            Some(v) if v >= min && v <= max => ValidationResult::Success,
            _ => out_of_range(&label, value, min, max),
        })
    }

    /// Creates a boolean parameter; `true` and `false` in any case are valid.
    pub fn boolean(name: impl Into<String>) -> Self {
        let name = name.into();
        let label = name.clone();
        Self::custom(name, ParameterType::Bool, move |value| {
            if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
                ValidationResult::Success
            } else {
                ValidationResult::failure(format!("{}: value must be true/false", label))
            }
        })
    }

    /// Creates a text parameter of at most `max_length` characters.
    pub fn string(name: impl Into<String>, max_length: usize) -> Self {
        let name = name.into();
        let label = name.clone();
        Self::custom(name, ParameterType::String, move |value| {
            if value.chars().count() <= max_length {
                ValidationResult::Success
            } else {
                ValidationResult::failure(format!(
                    "{}: value must be at most {} characters long",
                    label, max_length
                ))
            }
        })
    }

    /// Creates a date parameter in `YYYY-MM-DD` form.
    pub fn date(name: impl Into<String>) -> Self {
        let name = name.into();
        let label = name.clone();
        Self::custom(name, ParameterType::Date, move |value| {
            match NaiveDate::parse_from_str(value, DATE_FORMAT) {
                Ok(_) => ValidationResult::Success,
                Err(_) => ValidationResult::failure(format!(
                    "{}: value ({}) is not a valid date (YYYY-MM-DD)",
                    label, value
                )),
            }
        })
    }

    /// Creates an option-set parameter whose value must be one of the
    /// options returned by `options`. An empty option list accepts anything.
    pub fn option_set<F>(name: impl Into<String>, options: F) -> Self
    where
        F: Fn() -> Vec<String> + 'static,
    {
        Self::option_set_from(name, Some(Rc::new(options)))
    }

    /// Creates an option-set parameter over a fixed list of options.
    pub fn option_set_of(name: impl Into<String>, options: &[&str]) -> Self {
        let options: Vec<String> = options.iter().map(|o| o.to_string()).collect();
        Self::option_set(name, move || options.clone())
    }

    /// Creates an option-set parameter, optionally without any options
    /// source (in which case every value is accepted).
    pub fn option_set_from(name: impl Into<String>, options: Option<OptionsSource>) -> Self {
        let name = name.into();
        let label = name.clone();
        Self::custom(name, ParameterType::OptionSet, move |value| {
            let Some(source) = &options else {
                return ValidationResult::Success;
            };
            let options = source();
            if options.is_empty() || options.iter().any(|o| o == value) {
                ValidationResult::Success
            } else {
                ValidationResult::failure(format!(
                    "{}: {} is invalid, options are: [{}]",
                    label,
                    value,
                    options.join(", ")
                ))
            }
        })
    }

    /// Sets the special attribute.
    pub fn with_attribute(mut self, attribute: ParameterAttribute) -> Self {
        self.attribute = attribute;
        self
    }

    /// Marks the parameter as a password.
    pub fn password(self) -> Self {
        self.with_attribute(ParameterAttribute::Password)
    }

    /// Returns true if the value should be masked.
    pub fn is_password(&self) -> bool {
        self.attribute == ParameterAttribute::Password
    }

    /// Runs the validator against a candidate value.
    pub fn validate(&self, value: &str) -> ValidationResult {
        (self.validator)(value)
    }
}

impl fmt::Debug for ParameterDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterDefinition")
            .field("name", &self.name)
            .field("param_type", &self.param_type)
            .field("attribute", &self.attribute)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// PARSING HELPERS
// =============================================================================

fn out_of_range<T: fmt::Display>(name: &str, value: &str, min: T, max: T) -> ValidationResult {
    ValidationResult::failure(format!(
        "{}: value ({}) is out of range [{}, {}]",
        name, value, min, max
    ))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parses an integer written as an optional `-` followed by digits.
pub fn parse_int(value: &str) -> Option<i64> {
    let digits = value.strip_prefix('-').unwrap_or(value);
    if !is_digits(digits) {
        return None;
    }
    value.parse().ok()
}

/// Parses a decimal written as an optional `-`, digits, and an optional
/// fraction (`.` followed by digits). Exponents, signs other than a leading
/// `-`, and special values like `inf` are rejected.
pub fn parse_float(value: &str) -> Option<f64> {
    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };
    if !is_digits(integer) || fraction.is_some_and(|f| !is_digits(f)) {
        return None;
    }
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_numeric_bounds() {
        let param = ParameterDefinition::numeric("level", 0, 10);
        assert_eq!(param.param_type, ParameterType::Int);
        assert!(param.validate("5").is_success());
        assert!(param.validate("0").is_success());
        assert!(param.validate("10").is_success());

        let result = param.validate("11");
        assert!(result.is_failure());
        assert!(result.error().unwrap().contains("[0, 10]"));
        assert_eq!(
            result.error().unwrap(),
            "level: value (11) is out of range [0, 10]"
        );

        assert!(param.validate("-1").is_failure());
        assert!(param.validate("abc").is_failure());
        assert!(param.validate("").is_failure());
        assert!(param.validate("+5").is_failure());
        assert!(param.validate(" 5").is_failure());
    }

    #[test]
    fn test_numeric_negative_range() {
        let param = ParameterDefinition::numeric("offset", -50, -10);
        assert!(param.validate("-20").is_success());
        assert!(param.validate("-").is_failure());
        assert!(param.validate("20").is_failure());
    }

    #[test]
    fn test_float_bounds() {
        let param = ParameterDefinition::float("ratio", 0.0, 1.5);
        assert!(param.validate("0.5").is_success());
        assert!(param.validate("1").is_success());
        assert!(param.validate("1.5").is_success());
        assert!(param.validate("1.51").is_failure());
        assert!(param.validate("-0.5").is_failure());
        assert!(param.validate("1.").is_failure());
        assert!(param.validate(".5").is_failure());
        assert!(param.validate("1.2.3").is_failure());
        assert!(param.validate("1e0").is_failure());
        assert!(param.validate("inf").is_failure());
        assert_eq!(
            param.validate("2").error(),
            Some("ratio: value (2) is out of range [0, 1.5]")
        );
    }

    #[test]
    fn test_boolean_case_insensitive() {
        let param = ParameterDefinition::boolean("enabled");
        assert!(param.validate("true").is_success());
        assert!(param.validate("FALSE").is_success());
        assert!(param.validate("True").is_success());
        assert_eq!(
            param.validate("yes").error(),
            Some("enabled: value must be true/false")
        );
        assert!(param.validate("1").is_failure());
    }

    #[test]
    fn test_string_length() {
        let param = ParameterDefinition::string("host", 4);
        assert!(param.validate("").is_success());
        assert!(param.validate("abcd").is_success());
        assert!(param.validate("ääää").is_success());
        assert!(param.validate("abcde").is_failure());
    }

    #[test]
    fn test_date() {
        let param = ParameterDefinition::date("start");
        assert!(param.validate("2024-02-29").is_success());
        assert!(param.validate("2023-02-29").is_failure());
        assert!(param.validate("29/02/2024").is_failure());
        assert!(param.validate("").is_failure());
    }

    #[test]
    fn test_option_set_membership() {
        let param = ParameterDefinition::option_set_of("mode", &["station", "access-point"]);
        assert!(param.validate("station").is_success());
        assert_eq!(
            param.validate("mesh").error(),
            Some("mode: mesh is invalid, options are: [station, access-point]")
        );
    }

    #[test]
    fn test_option_set_without_options_accepts_anything() {
        let free = ParameterDefinition::option_set_from("free", None);
        assert!(free.validate("anything").is_success());

        let empty = ParameterDefinition::option_set("empty", Vec::new);
        assert!(empty.validate("anything").is_success());
    }

    #[test]
    fn test_option_set_source_called_per_validation() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let param = ParameterDefinition::option_set("mode", move || {
            counter.set(counter.get() + 1);
            vec!["a".to_string()]
        });
        param.validate("a");
        param.validate("b");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_password_attribute() {
        let param = ParameterDefinition::string("secret", 64).password();
        assert!(param.is_password());
        assert!(!ParameterDefinition::boolean("flag").is_password());
    }

    #[test]
    fn test_custom_validator() {
        let param = ParameterDefinition::custom("even", ParameterType::Int, |value| {
            match parse_int(value) {
                Some(v) if v % 2 == 0 => ValidationResult::Success,
                _ => ValidationResult::failure("even: must be an even number"),
            }
        });
        assert!(param.validate("4").is_success());
        assert!(param.validate("3").is_failure());
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_int("-42"), Some(-42));
        assert_eq!(parse_int("99999999999999999999"), None);
        assert_eq!(parse_float("-0.25"), Some(-0.25));
        assert_eq!(parse_float("NaN"), None);
    }
}
