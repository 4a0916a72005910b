//! RAII fixture scope
//!
//! A scope bundles one teardown registry with a factory bound to it. Tests
//! that finish normally call [`FixtureScope::close`] to surface teardown
//! failures; every other exit path drains on drop so resources never outlive
//! the scope that created them. One scope per test by default; a run-level
//! scope held for the whole session serves session-scoped fixtures.

use std::sync::Arc;

use tracing::error;

use crate::error::Result;
use crate::factory::FixtureFactory;
use crate::registry::TeardownRegistry;
use crate::watchdog::WatchdogConfig;

/// Scope owning a teardown registry, drained on close or drop.
#[derive(Debug)]
pub struct FixtureScope {
    registry: Arc<TeardownRegistry>,
    factory: FixtureFactory,
    closed: bool,
}

impl FixtureScope {
    /// Create a scope with the default watchdog configuration.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_watchdog(label, WatchdogConfig::default())
    }

    /// Create a scope with a custom watchdog configuration.
    #[must_use]
    pub fn with_watchdog(label: impl Into<String>, watchdog: WatchdogConfig) -> Self {
        let registry = Arc::new(TeardownRegistry::new(label));
        let factory = FixtureFactory::new(Arc::clone(&registry)).with_watchdog(watchdog);
        Self {
            registry,
            factory,
            closed: false,
        }
    }

    /// The factory provisioning into this scope.
    #[must_use]
    pub fn factory(&self) -> &FixtureFactory {
        &self.factory
    }

    /// The scope's registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<TeardownRegistry> {
        &self.registry
    }

    /// Drain the registry and surface any aggregate teardown failure.
    ///
    /// Prefer this over relying on drop: a drop cannot return the error.
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        self.registry.drain()
    }
}

impl Drop for FixtureScope {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(err) = self.registry.drain() {
            // Can't propagate from drop; the log is the only trace left.
            error!(scope = %self.registry.scope(), %err, "teardown failed during scope drop");
        }
    }
}
