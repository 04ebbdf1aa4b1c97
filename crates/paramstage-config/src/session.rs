//! Edit sessions.
//!
//! A [`Session`] drives one round of editing: a [`FrontEnd`] stages values
//! and asks for validation until the input is accepted or the user cancels.
//! Accepted input is saved exactly once; cancelled input is discarded.

use std::fmt;

use paramstage_storage::StorageMedium;
use tracing::{debug, info};

use crate::category::{CategoryDescriptor, CategoryRef};
use crate::error::{ConfigError, ConfigResult};
use crate::mediator::ConfigurationMediator;
use crate::store::{ParameterStore, ParameterValues};
use crate::validation::{ChainedValidationResults, ValidationResult};

/// State of an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Waiting for the front-end to produce valid input.
    #[default]
    GettingInput,
    /// Input passed validation and is saved.
    InputValidated,
    /// The session was cancelled; nothing is saved.
    Aborted,
}

impl SessionState {
    /// Returns true for states a session never leaves.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::GettingInput)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GettingInput => write!(f, "getting input"),
            Self::InputValidated => write!(f, "input validated"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// Collects user input for a session.
///
/// `update` is called repeatedly while the session is in
/// [`SessionState::GettingInput`]; it is expected to stage values and call
/// [`Session::validate_input`] or [`Session::cancel`] eventually.
pub trait FrontEnd {
    /// Receives each category's descriptor and current values before input starts.
    fn init(&mut self, descriptor: &CategoryDescriptor, values: &ParameterValues);

    /// Called once before the first update.
    fn start(&mut self, _session: &mut Session) -> ConfigResult<()> {
        Ok(())
    }

    /// Performs one round of input.
    fn update(&mut self, session: &mut Session) -> ConfigResult<()>;

    /// Called when the session ends, on every exit path.
    fn cleanup(&mut self) {}
}

/// Runs `cleanup` when dropped.
struct CleanupGuard<'a, F: FrontEnd + ?Sized> {
    front_end: &'a mut F,
}

impl<F: FrontEnd + ?Sized> Drop for CleanupGuard<'_, F> {
    fn drop(&mut self) {
        self.front_end.cleanup();
    }
}

/// One edit session over a set of categories.
pub struct Session {
    categories: Vec<CategoryRef>,
    store: ParameterStore,
    state: SessionState,
}

impl Session {
    /// Creates a session over an already loaded store.
    pub fn new(categories: Vec<CategoryRef>, store: ParameterStore) -> Self {
        Self {
            categories,
            store,
            state: SessionState::GettingInput,
        }
    }

    /// Creates a session with the categories' persisted values.
    pub fn initialize<M: StorageMedium>(
        mediator: &mut ConfigurationMediator<M>,
        categories: Vec<CategoryRef>,
    ) -> ConfigResult<Self> {
        let store = mediator.load_parameters(&categories)?;
        Ok(Self::new(categories, store))
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The staged parameters.
    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    /// The session's categories, in order.
    pub fn categories(&self) -> &[CategoryRef] {
        &self.categories
    }

    // =========================================================================
    // FRONT-END OPERATIONS
    // =========================================================================

    /// Stages a value.
    pub fn set_value(&mut self, category: &str, name: &str, value: impl Into<String>) {
        self.store.set_parameter_value(category, name, value);
    }

    /// Validates a candidate value without staging it.
    pub fn validate_value(&self, category: &str, name: &str, value: &str) -> ValidationResult {
        self.store.validate_value(category, name, value)
    }

    /// Options of a parameter, cached unless `refresh` is set.
    pub fn options_for(&mut self, category: &str, name: &str, refresh: bool) -> &[String] {
        self.store.get_parameter_options(category, name, refresh)
    }

    /// Original value of a parameter.
    pub fn original_value(&self, category: &str, name: &str) -> &str {
        self.store.get_original_value(category, name)
    }

    /// Validates all staged input.
    ///
    /// Modified fields are validated first; only when all of them pass are
    /// the categories' whole-object validators run. A session still getting
    /// input moves to [`SessionState::InputValidated`] when no failure is
    /// found.
    pub fn validate_input(&mut self) -> ChainedValidationResults {
        let mut results = self.store.validate_all_values();
        if results.is_success() {
            for category in &self.categories {
                let values = self.store.get_parameters_values(category.title());
                results.push(category.validate(&values));
            }
        }

        if self.state == SessionState::GettingInput && results.is_success() {
            self.state = SessionState::InputValidated;
            debug!("Session input validated");
        } else if results.is_failure() {
            debug!(failures = results.len(), "Session input rejected");
        }
        results
    }

    /// Cancels a session that is still getting input.
    pub fn cancel(&mut self) {
        if self.state == SessionState::GettingInput {
            self.state = SessionState::Aborted;
            debug!("Session aborted");
        }
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Runs the session with a front-end until it is validated or aborted.
    ///
    /// `save` is called exactly once if input is validated, and never if the
    /// session is aborted. The front-end's `cleanup` runs on every exit path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SessionFinished`] if the session already
    /// reached a terminal state, and propagates front-end and save errors.
    pub fn start<F, S>(&mut self, front_end: &mut F, save: S) -> ConfigResult<SessionState>
    where
        F: FrontEnd + ?Sized,
        S: FnOnce(&[CategoryRef], &ParameterStore) -> ConfigResult<()>,
    {
        if self.state.is_terminal() {
            return Err(ConfigError::SessionFinished(self.state));
        }

        for category in &self.categories {
            let values = self.store.get_parameters_values(category.title());
            front_end.init(category.metadata(), &values);
        }

        {
            let mut guard = CleanupGuard { front_end };
            guard.front_end.start(self)?;
            while self.state == SessionState::GettingInput {
                guard.front_end.update(self)?;
            }
        }

        if self.state == SessionState::InputValidated {
            save(&self.categories, &self.store)?;
            info!(modified = self.store.modified_count(), "Configuration saved");
        } else {
            info!("Configuration edit cancelled");
        }
        Ok(self.state)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let titles: Vec<&str> = self.categories.iter().map(|c| c.title()).collect();
        f.debug_struct("Session")
            .field("categories", &titles)
            .field("store", &self.store)
            .field("state", &self.state)
            .finish()
    }
}

/// Loads the categories through the mediator, runs a session with the
/// front-end, and saves through the mediator if input is validated.
pub fn initialize_and_start<M, F>(
    mediator: &mut ConfigurationMediator<M>,
    categories: Vec<CategoryRef>,
    front_end: &mut F,
) -> ConfigResult<SessionState>
where
    M: StorageMedium,
    F: FrontEnd + ?Sized,
{
    let mut session = Session::initialize(mediator, categories)?;
    session.start(front_end, |categories, store| mediator.save(categories, store))
}
