//! CLI command implementations.

pub mod edit;
pub mod path;
pub mod reset;
pub mod set;
pub mod show;
pub mod status;

// Re-export submodules for convenience
pub use reset::ResetArgs;
pub use set::SetArgs;

use std::path::Path;

use paramstage_config::ConfigurationMediator;
use paramstage_storage::RedbMedium;

use crate::error::{CliError, CliResult};

/// Opens the settings database, creating its directory if needed.
pub fn open_mediator(path: &Path) -> CliResult<ConfigurationMediator<RedbMedium>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    tracing::debug!(path = %path.display(), "Opening settings database");
    Ok(ConfigurationMediator::new(RedbMedium::open(path)?))
}

/// A `category.name=value` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Category title.
    pub category: String,
    /// Parameter name.
    pub name: String,
    /// New value, possibly empty.
    pub value: String,
}

/// Parses a `category.name=value` assignment.
pub fn parse_assignment(s: &str) -> CliResult<Assignment> {
    let invalid = || CliError::InvalidAssignment(s.to_string());
    let (target, value) = s.split_once('=').ok_or_else(invalid)?;
    let (category, name) = target.split_once('.').ok_or_else(invalid)?;
    if category.is_empty() || name.is_empty() {
        return Err(invalid());
    }
    Ok(Assignment {
        category: category.to_string(),
        name: name.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        let a = parse_assignment("display.brightness=7").unwrap();
        assert_eq!(a.category, "display");
        assert_eq!(a.name, "brightness");
        assert_eq!(a.value, "7");

        // Only the first '=' separates the value
        let a = parse_assignment("network.api_key=a=b").unwrap();
        assert_eq!(a.value, "a=b");

        assert_eq!(parse_assignment("network.hostname=").unwrap().value, "");
    }

    #[test]
    fn test_parse_assignment_rejects_malformed() {
        for bad in ["brightness=7", "display.brightness", ".x=1", "display.=1"] {
            assert!(matches!(
                parse_assignment(bad),
                Err(CliError::InvalidAssignment(_))
            ));
        }
    }

    #[test]
    fn test_open_mediator_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.redb");
        open_mediator(&path).unwrap();
        assert!(path.exists());
    }
}
