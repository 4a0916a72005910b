//! Environment configuration for integration runs
//!
//! Resolves the variables the session provider and resource adapters need.
//! For local debugging an overrides file can stand in for CI-provided
//! variables: a JSON map of environment names to variable maps, so one file
//! holds the settings of several target environments.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Environment-variable resolution with optional debug overrides.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    overrides: HashMap<String, String>,
}

impl Environment {
    /// Resolve from the process environment only.
    #[must_use]
    pub fn from_process() -> Self {
        Self::default()
    }

    /// Resolve with overrides from a JSON file.
    ///
    /// The file maps environment names to variable maps:
    /// `{"STAGING": {"WORKSPACE_HOST": "..."}}`. A missing file falls through
    /// to the process environment; a present file without the requested
    /// environment name is a configuration error.
    pub fn from_overrides_file(env_name: &str, path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no overrides file, using process environment");
            return Ok(Self::from_process());
        }
        let text = std::fs::read_to_string(path).map_err(|e| Error::Configuration {
            message: format!("cannot read overrides file {}", path.display()),
            source: Some(Box::new(e)),
        })?;
        let all: HashMap<String, HashMap<String, String>> =
            serde_json::from_str(&text).map_err(|e| Error::Configuration {
                message: format!("malformed overrides file {}", path.display()),
                source: Some(Box::new(e)),
            })?;
        let overrides = all.get(env_name).ok_or_else(|| {
            Error::configuration(format!(
                "environment '{env_name}' not found in {}",
                path.display()
            ))
        })?;
        Ok(Self {
            overrides: overrides.clone(),
        })
    }

    /// Look up a variable, overrides first, then the process environment.
    #[must_use]
    pub fn get(&self, var: &str) -> Option<String> {
        self.overrides
            .get(var)
            .cloned()
            .or_else(|| std::env::var(var).ok())
    }

    /// Look up a variable, failing with [`Error::MissingEnvironment`].
    ///
    /// Harnesses typically map that error to a test skip rather than a
    /// failure (see [`Error::is_missing_environment`]).
    pub fn require(&self, var: &str) -> Result<String> {
        self.get(var).ok_or_else(|| Error::missing_env(var))
    }
}
