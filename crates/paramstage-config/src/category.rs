//! Category descriptors and the category capability traits.
//!
//! A category is one configuration object: a titled list of parameter
//! definitions persisted to one file. The [`Category`] trait is what the
//! mediator and session need from it; [`DeclaredCategory`] is a ready-made
//! implementation that stores every value as a string.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use paramstage_storage::{FileHandle, StorageResult, StoredValue};

use crate::parameter::ParameterDefinition;
use crate::store::ParameterValues;
use crate::validation::ValidationResult;

/// Shared handle to a category, as held by the mediator and the session.
pub type CategoryRef = Rc<dyn Category>;

// =============================================================================
// DESCRIPTOR
// =============================================================================

/// Title and ordered parameter definitions of a category.
#[derive(Debug, Clone)]
pub struct CategoryDescriptor {
    /// Category title, unique across the system.
    pub title: String,
    /// Parameter definitions, in declaration order.
    pub parameters: Vec<ParameterDefinition>,
}

impl CategoryDescriptor {
    /// Creates a descriptor with no parameters.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            parameters: Vec::new(),
        }
    }

    /// Appends a parameter definition.
    pub fn with_parameter(mut self, parameter: ParameterDefinition) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Parameter names, in declaration order.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    /// Finds a parameter definition by name.
    pub fn parameter(&self, name: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

// =============================================================================
// CAPABILITY TRAITS
// =============================================================================

/// Capabilities a configuration category provides.
pub trait Category {
    /// Title and parameter definitions.
    fn metadata(&self) -> &CategoryDescriptor;

    /// Name of the file the category is persisted to.
    fn file_name(&self) -> &str;

    /// Options of an option-set parameter.
    fn options_for(&self, _name: &str) -> Vec<String> {
        Vec::new()
    }

    /// Writes the given values to an open file.
    fn save(&self, values: &ParameterValues, file: &mut FileHandle<'_>) -> StorageResult<()>;

    /// Reads the persisted values of an open file. Keys missing from the
    /// file are left out of the map.
    fn load_as_map(&self, file: &FileHandle<'_>) -> StorageResult<ParameterValues>;

    /// Validates the category as a whole, after every field passed.
    fn validate(&self, _values: &ParameterValues) -> ValidationResult {
        ValidationResult::Success
    }

    /// Category title.
    fn title(&self) -> &str {
        &self.metadata().title
    }
}

/// A category that can load itself as a typed object.
pub trait TypedCategory: Category {
    /// The typed configuration object.
    type Object;

    /// Reads the object from an open file.
    fn load_as_object(&self, file: &FileHandle<'_>) -> StorageResult<Self::Object>;
}

// =============================================================================
// DECLARED CATEGORY
// =============================================================================

/// Whole-object validator of a [`DeclaredCategory`].
pub type CategoryValidator = Rc<dyn Fn(&ParameterValues) -> ValidationResult>;

/// A category built from a descriptor that persists values as strings.
///
/// # Example
///
/// ```rust
/// use paramstage_config::{CategoryDescriptor, DeclaredCategory, ParameterDefinition};
///
/// let display = DeclaredCategory::new(
///     "display",
///     CategoryDescriptor::new("Display")
///         .with_parameter(ParameterDefinition::numeric("brightness", 0, 10))
///         .with_parameter(ParameterDefinition::option_set_of("theme", &["light", "dark"])),
/// )
/// .with_options("theme", &["light", "dark"]);
/// ```
#[derive(Clone)]
pub struct DeclaredCategory {
    file_name: String,
    descriptor: CategoryDescriptor,
    options: BTreeMap<String, Vec<String>>,
    validator: Option<CategoryValidator>,
}

impl DeclaredCategory {
    /// Creates a category persisted to `file_name`.
    pub fn new(file_name: impl Into<String>, descriptor: CategoryDescriptor) -> Self {
        Self {
            file_name: file_name.into(),
            descriptor,
            options: BTreeMap::new(),
            validator: None,
        }
    }

    /// Sets the options reported for a parameter.
    pub fn with_options(mut self, name: &str, options: &[&str]) -> Self {
        self.options.insert(
            name.to_string(),
            options.iter().map(|o| o.to_string()).collect(),
        );
        self
    }

    /// Sets the whole-object validator.
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&ParameterValues) -> ValidationResult + 'static,
    {
        self.validator = Some(Rc::new(validator));
        self
    }

    /// Wraps the category into a [`CategoryRef`].
    pub fn into_ref(self) -> CategoryRef {
        Rc::new(self)
    }
}

impl Category for DeclaredCategory {
    fn metadata(&self) -> &CategoryDescriptor {
        &self.descriptor
    }

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn options_for(&self, name: &str) -> Vec<String> {
        self.options.get(name).cloned().unwrap_or_default()
    }

    fn save(&self, values: &ParameterValues, file: &mut FileHandle<'_>) -> StorageResult<()> {
        for parameter in &self.descriptor.parameters {
            if let Some(value) = values.get(&parameter.name) {
                file.write(&parameter.name, value.clone())?;
            }
        }
        Ok(())
    }

    fn load_as_map(&self, file: &FileHandle<'_>) -> StorageResult<ParameterValues> {
        let mut values = ParameterValues::new();
        for parameter in &self.descriptor.parameters {
            if let Some(value) = file.read_raw(&parameter.name)? {
                values.insert(parameter.name.clone(), stored_to_string(value));
            }
        }
        Ok(values)
    }

    fn validate(&self, values: &ParameterValues) -> ValidationResult {
        match &self.validator {
            Some(validator) => validator(values),
            None => ValidationResult::Success,
        }
    }
}

impl TypedCategory for DeclaredCategory {
    type Object = ParameterValues;

    fn load_as_object(&self, file: &FileHandle<'_>) -> StorageResult<Self::Object> {
        self.load_as_map(file)
    }
}

impl fmt::Debug for DeclaredCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclaredCategory")
            .field("file_name", &self.file_name)
            .field("descriptor", &self.descriptor)
            .field("options", &self.options)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}

/// Values written by other tools may use any primitive kind.
fn stored_to_string(value: StoredValue) -> String {
    match value {
        StoredValue::String(s) => s,
        other => other.to_string(),
    }
}
