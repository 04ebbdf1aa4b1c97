//! Paramstage Configuration Core
//!
//! This crate tracks named configuration parameters grouped into categories,
//! stages candidate edits without touching persisted state, validates them
//! one by one and in aggregate, and commits or discards them per session.
//!
//! # Features
//!
//! - **Parameter Definitions**: typed settings with standard validators for
//!   integers, decimals, booleans, strings, dates and option sets
//! - **Parameter Store**: staged edits next to original values, cached dynamic options
//! - **Aggregated Validation**: every invalid field reported in one pass
//! - **Configuration Mediator**: loads and saves categories through any
//!   [`paramstage_storage::StorageMedium`]
//! - **Edit Sessions**: a small state machine that saves validated input
//!   exactly once and never saves cancelled input
//!
//! # Example
//!
//! ```rust
//! use paramstage_config::prelude::*;
//! use paramstage_storage::InMemoryMedium;
//!
//! let display = DeclaredCategory::new(
//!     "display",
//!     CategoryDescriptor::new("Display")
//!         .with_parameter(ParameterDefinition::numeric("brightness", 0, 10))
//!         .with_parameter(ParameterDefinition::boolean("night_mode")),
//! )
//! .into_ref();
//! let categories = vec![display];
//!
//! let mut mediator = ConfigurationMediator::new(InMemoryMedium::new());
//! let mut session = Session::initialize(&mut mediator, categories.clone()).unwrap();
//!
//! session.set_value("Display", "brightness", "11");
//! session.set_value("Display", "night_mode", "maybe");
//! let results = session.validate_input();
//! assert_eq!(results.len(), 2);
//! assert_eq!(session.state(), SessionState::GettingInput);
//!
//! session.set_value("Display", "brightness", "7");
//! session.set_value("Display", "night_mode", "TRUE");
//! assert!(session.validate_input().is_success());
//! assert_eq!(session.state(), SessionState::InputValidated);
//!
//! mediator.save(session.categories(), session.store()).unwrap();
//! assert!(mediator.configs_are_complete(&categories).unwrap());
//! ```
//!
//! # Failure Policy
//!
//! - Invalid input is reported through [`ChainedValidationResults`], never raised.
//! - A missing configuration file is not an error: values default to empty strings.
//! - An existing file that cannot be opened or parsed is a
//!   [`ConfigError::StorageInconsistency`].
//! - Looking up a category or parameter that was never registered panics.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod category;
mod error;
mod mediator;
mod parameter;
mod session;
mod store;
mod validation;

// Re-export core types
pub use category::{
    Category, CategoryDescriptor, CategoryRef, CategoryValidator, DeclaredCategory, TypedCategory,
};
pub use error::{ConfigError, ConfigResult};
pub use mediator::ConfigurationMediator;
pub use parameter::{
    parse_float, parse_int, OptionsSource, ParameterAttribute, ParameterDefinition, ParameterType,
    Validator, DATE_FORMAT,
};
pub use session::{initialize_and_start, FrontEnd, Session, SessionState};
pub use store::{OptionsProvider, Parameter, ParameterStore, ParameterValues};
pub use validation::{ChainedValidationResults, ValidationResult};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::category::{
        Category, CategoryDescriptor, CategoryRef, DeclaredCategory, TypedCategory,
    };
    pub use crate::error::{ConfigError, ConfigResult};
    pub use crate::mediator::ConfigurationMediator;
    pub use crate::parameter::{ParameterAttribute, ParameterDefinition, ParameterType};
    pub use crate::session::{initialize_and_start, FrontEnd, Session, SessionState};
    pub use crate::store::{ParameterStore, ParameterValues};
    pub use crate::validation::{ChainedValidationResults, ValidationResult};
}
