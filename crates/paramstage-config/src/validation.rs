//! Validation outcomes.
//!
//! [`ValidationResult`] is the verdict for one value. [`ChainedValidationResults`]
//! collects the failures of many values so a caller can show every invalid
//! field at once instead of stopping at the first.

use std::fmt;

use crate::error::{ConfigError, ConfigResult};

/// Outcome of validating a single value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationResult {
    /// The value is valid.
    #[default]
    Success,
    /// The value is invalid, with a message describing why.
    Failure(String),
}

impl ValidationResult {
    /// Creates a failure with the given message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    /// Returns true if the value is valid.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns true if the value is invalid.
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Returns the failure message, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failure(message) => Some(message),
        }
    }

    /// Converts into a `Result`, with the failure message as the error.
    pub fn into_result(self) -> Result<(), String> {
        match self {
            Self::Success => Ok(()),
            Self::Failure(message) => Err(message),
        }
    }
}

impl From<Result<(), String>> for ValidationResult {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(message) => Self::Failure(message),
        }
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("ok"),
            Self::Failure(message) => f.write_str(message),
        }
    }
}

/// Accumulated failures of several validations, in the order they were chained.
///
/// An empty chain is a success.
///
/// # Example
///
/// ```rust
/// use paramstage_config::{ChainedValidationResults, ValidationResult};
///
/// let results = ChainedValidationResults::new()
///     .chain(ValidationResult::Success)
///     .chain(ValidationResult::failure("port: value (0) is out of range [1, 65535]"))
///     .chain(ValidationResult::failure("mode: value must be true/false"));
///
/// assert!(results.is_failure());
/// assert_eq!(results.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChainedValidationResults {
    errors: Vec<String>,
}

impl ChainedValidationResults {
    /// Creates an empty (successful) chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty chain with room for `max_errors` failures.
    pub fn with_capacity(max_errors: usize) -> Self {
        Self {
            errors: Vec::with_capacity(max_errors),
        }
    }

    /// Creates a chain holding the given failure messages.
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self { errors }
    }

    /// Appends a result; only failures are recorded.
    pub fn push(&mut self, result: ValidationResult) -> &mut Self {
        if let ValidationResult::Failure(message) = result {
            self.errors.push(message);
        }
        self
    }

    /// Appends a result and returns the chain.
    pub fn chain(mut self, result: ValidationResult) -> Self {
        self.push(result);
        self
    }

    /// Appends every failure of another chain.
    pub fn merge(&mut self, other: ChainedValidationResults) {
        self.errors.extend(other.errors);
    }

    /// Returns true if no failure was recorded.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if at least one failure was recorded.
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The recorded failure messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if no failure was recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consumes the chain, returning its failure messages.
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// Converts into a `ConfigResult`, failing with [`ConfigError::Validation`].
    pub fn into_result(self) -> ConfigResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(ConfigError::Validation(self))
        }
    }
}

impl Extend<ValidationResult> for ChainedValidationResults {
    fn extend<I: IntoIterator<Item = ValidationResult>>(&mut self, iter: I) {
        for result in iter {
            self.push(result);
        }
    }
}

impl FromIterator<ValidationResult> for ChainedValidationResults {
    fn from_iter<I: IntoIterator<Item = ValidationResult>>(iter: I) -> Self {
        let mut results = Self::new();
        results.extend(iter);
        results
    }
}

impl fmt::Display for ChainedValidationResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "- {}", error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_default() {
        assert_eq!(ValidationResult::default(), ValidationResult::Success);
        assert!(ValidationResult::Success.is_success());
        assert_eq!(ValidationResult::Success.error(), None);
    }

    #[test]
    fn test_failure_carries_message() {
        let result = ValidationResult::failure("bad");
        assert!(result.is_failure());
        assert_eq!(result.error(), Some("bad"));
        assert_eq!(result.into_result(), Err("bad".to_string()));
    }

    #[test]
    fn test_chain_records_only_failures() {
        let mut chain = ChainedValidationResults::new();
        assert!(chain.is_success());

        chain
            .push(ValidationResult::Success)
            .push(ValidationResult::failure("a"))
            .push(ValidationResult::Success)
            .push(ValidationResult::failure("b"));

        assert_eq!(chain.errors(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_chain_keeps_every_failure() {
        let chain: ChainedValidationResults = (0..5)
            .map(|i| ValidationResult::failure(format!("field{}", i)))
            .collect();
        assert_eq!(chain.len(), 5);
        assert_eq!(chain.errors()[4], "field4");
    }

    #[test]
    fn test_merge_and_into_result() {
        let mut first = ChainedValidationResults::from_errors(vec!["x".into()]);
        first.merge(ChainedValidationResults::from_errors(vec!["y".into()]));
        assert_eq!(first.to_string(), "- x\n- y");

        let err = first.into_result().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref c) if c.len() == 2));
        assert!(ChainedValidationResults::new().into_result().is_ok());
    }
}
