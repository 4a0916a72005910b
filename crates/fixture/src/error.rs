//! Error types for the fixture engine
use thiserror::Error;

/// Result type for fixture operations
pub type Result<T> = std::result::Result<T, Error>;

type Source = Box<dyn std::error::Error + Send + Sync>;

/// Error type covering creation, retry, and teardown of remote fixtures
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration is invalid or a required collaborator is unavailable
    #[error("Configuration error: {message}")]
    Configuration {
        /// The error message
        message: String,
        /// The underlying error
        #[source]
        source: Option<Source>,
    },

    /// A required environment variable is not set
    ///
    /// Distinguishable from other configuration failures so a harness can
    /// skip the test instead of failing it.
    #[error("Environment variable '{var}' is missing")]
    MissingEnvironment {
        /// The variable name
        var: String,
    },

    /// Transient remote failure (eventual consistency, rate limit, conflict)
    #[error("Transient remote failure: {message}")]
    Transient {
        /// The failure reason
        message: String,
        /// The underlying error
        #[source]
        source: Option<Source>,
    },

    /// The generated name is already taken by a pre-existing remote object
    #[error("Name '{name}' is already taken")]
    Collision {
        /// The colliding name candidate
        name: String,
    },

    /// The remote object no longer exists
    ///
    /// On delete this is the desired end state and teardown treats it as
    /// success.
    #[error("Remote object '{id}' not found")]
    NotFound {
        /// The remote object identifier
        id: String,
    },

    /// Non-retryable remote failure
    #[error("Remote failure: {message}")]
    Remote {
        /// The failure reason
        message: String,
        /// The underlying error
        #[source]
        source: Option<Source>,
    },

    /// The retry budget elapsed without a successful attempt
    #[error("Retry budget exhausted after {attempts} attempts in {elapsed:?}")]
    RetryExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Total time spent attempting
        elapsed: std::time::Duration,
        /// The last failure observed
        #[source]
        source: Box<Error>,
    },

    /// One or more teardown entries failed while draining a registry
    ///
    /// Every entry is attempted before this is raised; `failures` holds only
    /// the non-"not found" outcomes.
    #[error("Teardown failed for {} of {attempted} entries", failures.len())]
    Teardown {
        /// Total entries drained
        attempted: usize,
        /// The entries that failed
        failures: Vec<TeardownFailure>,
    },
}

/// A single failed teardown entry inside [`Error::Teardown`]
#[derive(Debug)]
pub struct TeardownFailure {
    /// Label of the failed entry (kind plus resource name)
    pub label: String,
    /// The error the release callback returned
    pub error: Error,
}

impl std::fmt::Display for TeardownFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.label, self.error)
    }
}

impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a missing-environment error
    pub fn missing_env<S: Into<String>>(var: S) -> Self {
        Self::MissingEnvironment { var: var.into() }
    }

    /// Create a transient remote error
    pub fn transient<S: Into<String>>(message: S) -> Self {
        Self::Transient {
            message: message.into(),
            source: None,
        }
    }

    /// Create a name-collision error
    pub fn collision<S: Into<String>>(name: S) -> Self {
        Self::Collision { name: name.into() }
    }

    /// Create a not-found error
    pub fn not_found<S: Into<String>>(id: S) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a non-retryable remote error
    pub fn remote<S: Into<String>>(message: S) -> Self {
        Self::Remote {
            message: message.into(),
            source: None,
        }
    }

    /// Create a non-retryable remote error wrapping an underlying cause
    pub fn remote_from<S: Into<String>>(message: S, source: Source) -> Self {
        Self::Remote {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Check if this error is retryable under the default policy
    ///
    /// Collisions are retryable: the factory regenerates the name candidate
    /// between attempts, so a collision never escalates on its own.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. } | Self::Collision { .. })
    }

    /// Check if this error is a name collision
    #[must_use]
    pub fn is_collision(&self) -> bool {
        matches!(self, Self::Collision { .. })
    }

    /// Check if this error reports an already-gone remote object
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a missing environment variable
    ///
    /// Harnesses typically map this to a test skip rather than a failure.
    #[must_use]
    pub fn is_missing_environment(&self) -> bool {
        matches!(self, Self::MissingEnvironment { .. })
    }
}
