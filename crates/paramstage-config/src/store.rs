//! Runtime parameters and the parameter store.
//!
//! The store owns every [`Parameter`] of an edit session, grouped by
//! category title. Edits are staged as pending values next to the original
//! (persisted) value, so nothing changes on the medium until the session
//! saves.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::parameter::ParameterDefinition;
use crate::validation::{ChainedValidationResults, ValidationResult};

/// Name to value map of one category.
pub type ParameterValues = BTreeMap<String, String>;

/// Supplies the dynamic options of an option-set parameter.
pub type OptionsProvider = Rc<dyn Fn() -> Vec<String>>;

// =============================================================================
// PARAMETER
// =============================================================================

/// One parameter definition bound to its values for the current session.
#[derive(Clone)]
pub struct Parameter {
    definition: ParameterDefinition,
    original_value: String,
    pending_value: Option<String>,
    cached_options: Vec<String>,
    options_loaded: bool,
    options_provider: Option<OptionsProvider>,
}

impl Parameter {
    /// Creates an unmodified parameter.
    pub fn new(
        definition: ParameterDefinition,
        original_value: impl Into<String>,
        options_provider: Option<OptionsProvider>,
    ) -> Self {
        Self {
            definition,
            original_value: original_value.into(),
            pending_value: None,
            cached_options: Vec::new(),
            options_loaded: false,
            options_provider,
        }
    }

    /// The static definition.
    pub fn definition(&self) -> &ParameterDefinition {
        &self.definition
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// The persisted (or default) value.
    pub fn original_value(&self) -> &str {
        &self.original_value
    }

    /// The staged value, if the parameter was modified.
    pub fn pending_value(&self) -> Option<&str> {
        self.pending_value.as_deref()
    }

    /// The pending value if present, otherwise the original value.
    pub fn effective_value(&self) -> &str {
        self.pending_value.as_deref().unwrap_or(&self.original_value)
    }

    /// Returns true if a pending value is staged.
    pub fn is_modified(&self) -> bool {
        self.pending_value.is_some()
    }

    /// Stages a new value. Setting the original value back clears the edit.
    pub fn set_value(&mut self, value: impl Into<String>) {
        let value = value.into();
        if value == self.original_value {
            self.pending_value = None;
        } else {
            self.pending_value = Some(value);
        }
    }

    /// Returns the options of this parameter, calling the provider on the
    /// first request or when `refresh` is set.
    pub fn options(&mut self, refresh: bool) -> &[String] {
        let Some(provider) = &self.options_provider else {
            return &[];
        };
        if refresh || !self.options_loaded {
            self.cached_options = provider();
            self.options_loaded = true;
        }
        &self.cached_options
    }

    /// Validates an arbitrary candidate value.
    pub fn validate(&self, value: &str) -> ValidationResult {
        self.definition.validate(value)
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.definition.name)
            .field("original_value", &self.original_value)
            .field("pending_value", &self.pending_value)
            .field("options_loaded", &self.options_loaded)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// STORE
// =============================================================================

#[derive(Debug, Clone)]
struct CategoryEntry {
    title: String,
    parameters: Vec<Parameter>,
}

impl CategoryEntry {
    fn position(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name() == name)
    }
}

/// All parameters of an edit session, grouped by category.
///
/// Categories and parameters keep their registration order, which is also
/// the order of aggregated validation failures.
///
/// Looking up a category or parameter that was never added is a programming
/// error and panics.
///
/// # Example
///
/// ```rust
/// use paramstage_config::{ParameterDefinition, ParameterStore};
///
/// let mut store = ParameterStore::new();
/// store.add_parameter("display", ParameterDefinition::numeric("brightness", 0, 10), "5", None);
///
/// store.set_parameter_value("display", "brightness", "11");
/// assert!(store.validate_all_values().is_failure());
///
/// store.set_parameter_value("display", "brightness", "5");
/// assert!(!store.is_modified("display", "brightness"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    categories: Vec<CategoryEntry>,
}

impl ParameterStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a category with no parameters. Registering twice is a no-op.
    pub fn register_category(&mut self, title: impl Into<String>) {
        let title = title.into();
        if !self.categories.iter().any(|c| c.title == title) {
            self.categories.push(CategoryEntry {
                title,
                parameters: Vec::new(),
            });
        }
    }

    /// Adds a parameter to a category, registering the category if needed.
    ///
    /// Re-adding a name already present replaces that parameter in place.
    pub fn add_parameter(
        &mut self,
        category: &str,
        definition: ParameterDefinition,
        current_value: impl Into<String>,
        options_provider: Option<OptionsProvider>,
    ) {
        self.register_category(category);
        let parameter = Parameter::new(definition, current_value, options_provider);
        let entry = self.entry_mut(category);
        match entry.position(parameter.name()) {
            Some(index) => entry.parameters[index] = parameter,
            None => entry.parameters.push(parameter),
        }
    }

    /// Stages a value for a parameter.
    pub fn set_parameter_value(&mut self, category: &str, name: &str, value: impl Into<String>) {
        self.parameter_mut(category, name).set_value(value);
    }

    /// Returns the options of a parameter, cached unless `refresh` is set.
    pub fn get_parameter_options(&mut self, category: &str, name: &str, refresh: bool) -> &[String] {
        self.parameter_mut(category, name).options(refresh)
    }

    /// Validates a candidate value against one parameter's validator.
    pub fn validate_value(&self, category: &str, name: &str, value: &str) -> ValidationResult {
        self.parameter(category, name).validate(value)
    }

    /// Validates the pending value of every modified parameter.
    ///
    /// Unmodified parameters are skipped. Every failure is collected.
    pub fn validate_all_values(&self) -> ChainedValidationResults {
        self.categories
            .iter()
            .flat_map(|entry| entry.parameters.iter())
            .filter_map(|p| p.pending_value().map(|value| p.validate(value)))
            .collect()
    }

    /// Returns the effective values of a category.
    pub fn get_parameters_values(&self, category: &str) -> ParameterValues {
        self.entry(category)
            .parameters
            .iter()
            .map(|p| (p.name().to_string(), p.effective_value().to_string()))
            .collect()
    }

    /// Returns the original value of a parameter, ignoring pending edits.
    pub fn get_original_value(&self, category: &str, name: &str) -> &str {
        self.parameter(category, name).original_value()
    }

    /// Returns the pending value of a parameter.
    pub fn pending_value(&self, category: &str, name: &str) -> Option<&str> {
        self.parameter(category, name).pending_value()
    }

    /// Returns the effective value of a parameter.
    pub fn effective_value(&self, category: &str, name: &str) -> &str {
        self.parameter(category, name).effective_value()
    }

    /// Returns true if the parameter has a pending edit.
    pub fn is_modified(&self, category: &str, name: &str) -> bool {
        self.parameter(category, name).is_modified()
    }

    /// Returns the definition of a parameter.
    pub fn definition(&self, category: &str, name: &str) -> &ParameterDefinition {
        self.parameter(category, name).definition()
    }

    /// Returns true if the parameter is registered.
    pub fn contains(&self, category: &str, name: &str) -> bool {
        self.categories
            .iter()
            .find(|c| c.title == category)
            .is_some_and(|c| c.position(name).is_some())
    }

    /// Returns true if the category is registered.
    pub fn contains_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c.title == category)
    }

    /// Registered category titles, in registration order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.title.as_str())
    }

    /// Parameters of a category, in declaration order.
    pub fn parameters(&self, category: &str) -> &[Parameter] {
        &self.entry(category).parameters
    }

    /// Number of parameters with a pending edit.
    pub fn modified_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| c.parameters.iter())
            .filter(|p| p.is_modified())
            .count()
    }

    // ===== lookups =====

    fn entry(&self, category: &str) -> &CategoryEntry {
        match self.categories.iter().find(|c| c.title == category) {
            Some(entry) => entry,
            None => panic!("category '{}' is not registered", category),
        }
    }

    fn entry_mut(&mut self, category: &str) -> &mut CategoryEntry {
        match self.categories.iter_mut().find(|c| c.title == category) {
            Some(entry) => entry,
            None => panic!("category '{}' is not registered", category),
        }
    }

    fn parameter(&self, category: &str, name: &str) -> &Parameter {
        let entry = self.entry(category);
        match entry.position(name) {
            Some(index) => &entry.parameters[index],
            None => panic!("parameter '{}' is not registered in '{}'", name, category),
        }
    }

    fn parameter_mut(&mut self, category: &str, name: &str) -> &mut Parameter {
        let entry = self.entry_mut(category);
        match entry.position(name) {
            Some(index) => &mut entry.parameters[index],
            None => panic!("parameter '{}' is not registered in '{}'", name, category),
        }
    }
}
