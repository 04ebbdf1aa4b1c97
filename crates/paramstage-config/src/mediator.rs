//! Configuration mediator.
//!
//! Bridges categories and a [`StorageMedium`]: existence and completeness
//! probes, loading into typed objects or a [`ParameterStore`], saving the
//! store's effective values, and deleting category files.

use std::rc::Rc;

use paramstage_storage::{FileHandle, FileMode, StorageMedium};
use tracing::{debug, warn};

use crate::category::{Category, CategoryRef, TypedCategory};
use crate::error::{ConfigError, ConfigResult};
use crate::parameter::ParameterType;
use crate::store::{OptionsProvider, ParameterStore, ParameterValues};

/// Mediates between categories and a storage medium.
///
/// An existing file that cannot be opened or parsed is treated as a
/// corrupted medium and reported as [`ConfigError::StorageInconsistency`].
/// A missing file is never an error.
///
/// # Example
///
/// ```rust
/// use paramstage_config::prelude::*;
/// use paramstage_storage::InMemoryMedium;
///
/// let display = DeclaredCategory::new(
///     "display",
///     CategoryDescriptor::new("Display")
///         .with_parameter(ParameterDefinition::numeric("brightness", 0, 10)),
/// )
/// .into_ref();
///
/// let mut mediator = ConfigurationMediator::new(InMemoryMedium::new());
/// let categories = vec![display];
///
/// let mut store = mediator.load_parameters(&categories).unwrap();
/// store.set_parameter_value("Display", "brightness", "7");
/// mediator.save(&categories, &store).unwrap();
///
/// assert!(mediator.configs_are_complete(&categories).unwrap());
/// ```
#[derive(Debug)]
pub struct ConfigurationMediator<M: StorageMedium> {
    medium: M,
}

impl<M: StorageMedium> ConfigurationMediator<M> {
    /// Creates a mediator over a medium.
    pub fn new(medium: M) -> Self {
        Self { medium }
    }

    /// The underlying medium.
    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// Mutable access to the underlying medium.
    pub fn medium_mut(&mut self) -> &mut M {
        &mut self.medium
    }

    /// Consumes the mediator, returning the medium.
    pub fn into_inner(self) -> M {
        self.medium
    }

    // =========================================================================
    // PROBES
    // =========================================================================

    /// Checks if the category's file exists.
    pub fn exists(&self, category: &dyn Category) -> ConfigResult<bool> {
        Ok(self.medium.exists(category.file_name())?)
    }

    /// Checks if the category's file exists and holds every declared
    /// parameter. Values are not validated.
    pub fn is_complete(&self, category: &dyn Category) -> ConfigResult<bool> {
        let names = category.metadata().parameter_names();
        Ok(self.medium.is_complete(category.file_name(), &names)?)
    }

    /// Checks if every category's file exists.
    pub fn configs_exist(&self, categories: &[CategoryRef]) -> ConfigResult<bool> {
        for category in categories {
            if !self.exists(category.as_ref())? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Checks if every category's file is complete.
    pub fn configs_are_complete(&self, categories: &[CategoryRef]) -> ConfigResult<bool> {
        for category in categories {
            if !self.is_complete(category.as_ref())? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    // =========================================================================
    // FILE ACCESS
    // =========================================================================

    /// Opens the category's file.
    ///
    /// Failing to open a file that exists is a storage inconsistency.
    pub fn open(&mut self, category: &dyn Category, mode: FileMode) -> ConfigResult<FileHandle<'_>> {
        let file_name = category.file_name();
        let existed = self.medium.exists(file_name)?;
        self.medium.open(file_name, mode).map_err(|e| {
            if existed {
                ConfigError::inconsistency(file_name, e)
            } else {
                ConfigError::Storage(e)
            }
        })
    }

    /// Loads a category as its typed object.
    ///
    /// Returns `None` if the file does not exist.
    pub fn load<C>(&mut self, category: &C) -> ConfigResult<Option<C::Object>>
    where
        C: TypedCategory + ?Sized,
    {
        let file_name = category.file_name();
        if !self.medium.exists(file_name)? {
            debug!(file = file_name, "Configuration file not found");
            return Ok(None);
        }

        let file = self
            .medium
            .open(file_name, FileMode::Read)
            .map_err(|e| ConfigError::inconsistency(file_name, e))?;
        let object = category
            .load_as_object(&file)
            .map_err(|e| ConfigError::inconsistency(file_name, e))?;

        debug!(file = file_name, "Loaded configuration");
        Ok(Some(object))
    }

    /// Loads every category as a name to value map, `None` for categories
    /// whose file does not exist.
    pub fn load_all(&mut self, categories: &[CategoryRef]) -> ConfigResult<Vec<Option<ParameterValues>>> {
        categories
            .iter()
            .map(|category| self.load_map(category.as_ref()))
            .collect()
    }

    /// Builds a parameter store from the persisted values of every category.
    ///
    /// Parameters missing from the medium start with an empty value. Only
    /// option-set parameters get an options provider.
    ///
    /// # Panics
    ///
    /// Panics if two categories share a title.
    pub fn load_parameters(&mut self, categories: &[CategoryRef]) -> ConfigResult<ParameterStore> {
        let mut store = ParameterStore::new();

        for category in categories {
            let title = category.title();
            if store.contains_category(title) {
                panic!("category '{}' is registered twice", title);
            }
            let values = self.load_map(category.as_ref())?.unwrap_or_default();
            store.register_category(title);

            for definition in &category.metadata().parameters {
                let value = values.get(&definition.name).cloned().unwrap_or_default();
                let provider = match definition.param_type {
                    ParameterType::OptionSet => Some(options_provider(category, &definition.name)),
                    _ => None,
                };
                store.add_parameter(title, definition.clone(), value, provider);
            }
        }

        debug!(categories = categories.len(), "Loaded parameters");
        Ok(store)
    }

    /// Writes each category's effective values from the store to its file.
    ///
    /// Every file is committed before the next one is written; a failed
    /// open, write or commit stops the save.
    pub fn save(&mut self, categories: &[CategoryRef], store: &ParameterStore) -> ConfigResult<()> {
        for category in categories {
            let file_name = category.file_name();
            let values = store.get_parameters_values(category.title());

            let mut file = self
                .medium
                .open(file_name, FileMode::Write)
                .map_err(|e| ConfigError::inconsistency(file_name, e))?;
            category
                .save(&values, &mut file)
                .map_err(|e| ConfigError::inconsistency(file_name, e))?;
            file.dispose()
                .map_err(|e| ConfigError::inconsistency(file_name, e))?;

            debug!(file = file_name, parameters = values.len(), "Saved configuration");
        }
        Ok(())
    }

    /// Deletes every category's file.
    ///
    /// Each entry is true if the file was deleted or never existed, and
    /// false if deleting it failed.
    pub fn delete(&mut self, categories: &[CategoryRef]) -> Vec<bool> {
        categories
            .iter()
            .map(|category| {
                let file_name = category.file_name();
                match self.medium.delete(file_name) {
                    Ok(true) => {
                        debug!(file = file_name, "Deleted configuration");
                        true
                    }
                    Ok(false) => {
                        warn!(file = file_name, "Medium refused to delete configuration");
                        false
                    }
                    Err(e) => {
                        warn!(file = file_name, error = %e, "Failed to delete configuration");
                        false
                    }
                }
            })
            .collect()
    }

    fn load_map(&mut self, category: &dyn Category) -> ConfigResult<Option<ParameterValues>> {
        let file_name = category.file_name();
        if !self.medium.exists(file_name)? {
            return Ok(None);
        }

        let file = self
            .medium
            .open(file_name, FileMode::Read)
            .map_err(|e| ConfigError::inconsistency(file_name, e))?;
        let values = category
            .load_as_map(&file)
            .map_err(|e| ConfigError::inconsistency(file_name, e))?;
        Ok(Some(values))
    }
}

fn options_provider(category: &CategoryRef, name: &str) -> OptionsProvider {
    let category = Rc::clone(category);
    let name = name.to_string();
    Rc::new(move || category.options_for(&name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{CategoryDescriptor, DeclaredCategory};
    use crate::parameter::ParameterDefinition;
    use paramstage_storage::{InMemoryMedium, StorageError, StoredValue};

    fn display() -> CategoryRef {
        DeclaredCategory::new(
            "display",
            CategoryDescriptor::new("Display")
                .with_parameter(ParameterDefinition::numeric("brightness", 0, 10))
                .with_parameter(ParameterDefinition::option_set_of("theme", &["light", "dark"])),
        )
        .with_options("theme", &["light", "dark"])
        .into_ref()
    }

    fn network() -> CategoryRef {
        DeclaredCategory::new(
            "network",
            CategoryDescriptor::new("Network").with_parameter(ParameterDefinition::string("host", 32)),
        )
        .into_ref()
    }

    fn string_value(s: &str) -> StoredValue {
        StoredValue::String(s.to_string())
    }

    #[test]
    fn test_missing_files() {
        let mut mediator = ConfigurationMediator::new(InMemoryMedium::new());
        let categories = vec![display(), network()];

        assert!(!mediator.configs_exist(&categories).unwrap());
        assert!(!mediator.configs_are_complete(&categories).unwrap());
        assert_eq!(mediator.load_all(&categories).unwrap(), vec![None, None]);
        assert!(mediator.load(&DeclaredCategory::new("x", CategoryDescriptor::new("X"))).unwrap().is_none());
    }

    #[test]
    fn test_load_parameters_defaults_to_empty() {
        let medium = InMemoryMedium::new().with_file("display", [("brightness", string_value("3"))]);
        let mut mediator = ConfigurationMediator::new(medium);

        let store = mediator.load_parameters(&[display(), network()]).unwrap();
        assert_eq!(store.get_original_value("Display", "brightness"), "3");
        assert_eq!(store.get_original_value("Display", "theme"), "");
        assert_eq!(store.get_original_value("Network", "host"), "");
        assert_eq!(store.modified_count(), 0);
    }

    #[test]
    fn test_options_provider_bound_for_option_sets_only() {
        let mut mediator = ConfigurationMediator::new(InMemoryMedium::new());
        let mut store = mediator.load_parameters(&[display()]).unwrap();

        assert_eq!(store.get_parameter_options("Display", "theme", false), ["light", "dark"]);
        assert!(store.get_parameter_options("Display", "brightness", false).is_empty());
    }

    #[test]
    fn test_save_writes_effective_values() {
        let categories = vec![display(), network()];
        let mut mediator = ConfigurationMediator::new(InMemoryMedium::new());

        let mut store = mediator.load_parameters(&categories).unwrap();
        store.set_parameter_value("Display", "brightness", "9");
        store.set_parameter_value("Network", "host", "example.org");
        mediator.save(&categories, &store).unwrap();

        assert!(mediator.configs_are_complete(&categories).unwrap());
        let file = mediator.medium().file("display").unwrap();
        assert_eq!(file["brightness"], string_value("9"));
        assert_eq!(file["theme"], string_value(""));

        let loaded = mediator.load_all(&categories).unwrap();
        assert_eq!(loaded[1].as_ref().unwrap()["host"], "example.org");
    }

    /// Writes its first value, then fails like a device that filled up.
    struct FailingSave(CategoryDescriptor);

    impl Category for FailingSave {
        fn metadata(&self) -> &CategoryDescriptor {
            &self.0
        }
        fn file_name(&self) -> &str {
            "failing"
        }
        fn save(&self, values: &ParameterValues, file: &mut FileHandle<'_>) -> paramstage_storage::StorageResult<()> {
            file.write("a", values["a"].clone())?;
            Err(StorageError::Serialization("device full".to_string()))
        }
        fn load_as_map(&self, file: &FileHandle<'_>) -> paramstage_storage::StorageResult<ParameterValues> {
            let mut values = ParameterValues::new();
            for key in ["a", "b"] {
                if let Some(value) = file.read_optional::<String>(key)? {
                    values.insert(key.to_string(), value);
                }
            }
            Ok(values)
        }
    }

    fn failing() -> CategoryRef {
        Rc::new(FailingSave(
            CategoryDescriptor::new("Failing")
                .with_parameter(ParameterDefinition::string("a", 8))
                .with_parameter(ParameterDefinition::string("b", 8)),
        ))
    }

    #[test]
    fn test_failed_save_keeps_previous_file() {
        let medium = InMemoryMedium::new()
            .with_file("failing", [("a", string_value("1")), ("b", string_value("2"))]);
        let categories = vec![display(), failing()];
        let mut mediator = ConfigurationMediator::new(medium);

        let mut store = mediator.load_parameters(&categories).unwrap();
        store.set_parameter_value("Display", "brightness", "4");
        store.set_parameter_value("Failing", "a", "9");
        let err = mediator.save(&categories, &store).unwrap_err();

        assert!(matches!(err, ConfigError::StorageInconsistency { ref file, .. } if file == "failing"));
        assert!(!mediator.medium().is_open());
        let file = mediator.medium().file("failing").unwrap();
        assert_eq!(file.len(), 2);
        assert_eq!(file["a"], string_value("1"));
        // Files saved before the failure stay committed
        assert_eq!(mediator.medium().file("display").unwrap()["brightness"], string_value("4"));
    }

    #[test]
    fn test_save_refused_by_medium() {
        let mut medium = InMemoryMedium::new().with_file("network", [("host", string_value("a"))]);
        medium.damage("network");
        let categories = vec![network()];
        let mut mediator = ConfigurationMediator::new(medium);

        let mut store = ParameterStore::new();
        store.add_parameter("Network", ParameterDefinition::string("host", 32), "a", None);
        store.set_parameter_value("Network", "host", "b");
        let err = mediator.save(&categories, &store).unwrap_err();

        assert!(err.is_inconsistency());
        assert_eq!(mediator.medium().file("network").unwrap()["host"], string_value("a"));
    }

    #[test]
    #[should_panic(expected = "category 'Display' is registered twice")]
    fn test_duplicate_title_panics() {
        let renamed = DeclaredCategory::new("display2", CategoryDescriptor::new("Display")).into_ref();
        let mut mediator = ConfigurationMediator::new(InMemoryMedium::new());
        let _ = mediator.load_parameters(&[display(), renamed]);
    }

    #[test]
    fn test_incomplete_file() {
        let medium = InMemoryMedium::new().with_file("display", [("brightness", string_value("3"))]);
        let mediator = ConfigurationMediator::new(medium);
        let category = display();

        assert!(mediator.exists(category.as_ref()).unwrap());
        assert!(!mediator.is_complete(category.as_ref()).unwrap());
    }

    #[test]
    fn test_damaged_file_is_inconsistent() {
        let mut medium = InMemoryMedium::new().with_file("display", [("brightness", string_value("3"))]);
        medium.damage("display");
        let mut mediator = ConfigurationMediator::new(medium);

        let err = mediator.load_parameters(&[display()]).unwrap_err();
        assert!(err.is_inconsistency());
        assert!(mediator.load_all(&[display()]).unwrap_err().is_inconsistency());
        assert!(mediator
            .open(display().as_ref(), FileMode::Read)
            .unwrap_err()
            .is_inconsistency());
    }

    #[test]
    fn test_open_missing_for_read_is_storage_error() {
        let mut mediator = ConfigurationMediator::new(InMemoryMedium::new());
        let err = mediator.open(network().as_ref(), FileMode::Read).unwrap_err();
        assert!(matches!(err, ConfigError::Storage(StorageError::FileNotFound(_))));
    }

    #[test]
    fn test_type_mismatch_is_inconsistent() {
        // A typed category reading a string key as a number
        struct Counter(CategoryDescriptor);

        impl Category for Counter {
            fn metadata(&self) -> &CategoryDescriptor {
                &self.0
            }
            fn file_name(&self) -> &str {
                "counter"
            }
            fn save(&self, _: &ParameterValues, _: &mut FileHandle<'_>) -> paramstage_storage::StorageResult<()> {
                Ok(())
            }
            fn load_as_map(&self, _: &FileHandle<'_>) -> paramstage_storage::StorageResult<ParameterValues> {
                Ok(ParameterValues::new())
            }
        }

        impl TypedCategory for Counter {
            type Object = u32;
            fn load_as_object(&self, file: &FileHandle<'_>) -> paramstage_storage::StorageResult<u32> {
                file.read("count", 0u32)
            }
        }

        let medium = InMemoryMedium::new().with_file("counter", [("count", string_value("x"))]);
        let mut mediator = ConfigurationMediator::new(medium);
        let err = mediator.load(&Counter(CategoryDescriptor::new("Counter"))).unwrap_err();
        assert!(err.is_inconsistency());
        assert!(!mediator.medium().is_open());
    }

    #[test]
    fn test_delete() {
        let mut medium = InMemoryMedium::new()
            .with_file("display", [("brightness", string_value("3"))])
            .with_file("network", [("host", string_value("a"))]);
        medium.damage("network");
        let mut mediator = ConfigurationMediator::new(medium);

        let results = mediator.delete(&[display(), network(), display()]);
        assert_eq!(results, vec![true, false, true]);
        assert!(!mediator.exists(display().as_ref()).unwrap());
    }
}
