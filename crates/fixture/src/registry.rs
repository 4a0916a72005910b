//! Scope-bound teardown registry
//!
//! Every successfully created fixture pushes one release callback here.
//! Draining runs the callbacks in strict reverse-insertion order, runs every
//! entry even when earlier ones fail, swallows "already gone" outcomes, and
//! surfaces the rest as one aggregate error so no failure masks another.

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{Error, Result, TeardownFailure};

/// A zero-argument release operation bound to one created resource
pub struct TeardownEntry {
    label: String,
    release: Box<dyn FnOnce() -> Result<()> + Send>,
}

impl TeardownEntry {
    /// Create an entry with a human-readable label (kind plus name).
    pub fn new<F>(label: impl Into<String>, release: F) -> Self
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        Self {
            label: label.into(),
            release: Box::new(release),
        }
    }

    /// The entry's label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl std::fmt::Debug for TeardownEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeardownEntry")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct State {
    entries: Vec<TeardownEntry>,
    drained: bool,
}

/// Ordered, scope-bound list of teardown entries, drained LIFO exactly once
pub struct TeardownRegistry {
    scope: String,
    state: Mutex<State>,
}

impl TeardownRegistry {
    /// Create an empty registry for the given scope label.
    #[must_use]
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            state: Mutex::new(State::default()),
        }
    }

    /// The scope label this registry belongs to.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Whether no entries are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Whether this registry has already been drained.
    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.state.lock().drained
    }

    /// Register a teardown entry.
    ///
    /// Refused once the registry has drained: the caller must not leave a
    /// live resource without a registered teardown, so the factory reacts by
    /// deleting the resource it just created.
    pub fn push(&self, entry: TeardownEntry) -> Result<()> {
        let mut state = self.state.lock();
        if state.drained {
            return Err(Error::configuration(format!(
                "teardown registry for scope '{}' already drained",
                self.scope
            )));
        }
        debug!(scope = %self.scope, label = %entry.label, "added fixture");
        state.entries.push(entry);
        Ok(())
    }

    /// Run every entry in reverse-insertion order.
    ///
    /// Entries reporting [`Error::NotFound`] count as success (the resource
    /// is already gone, which is the desired end state). All other failures
    /// are collected into [`Error::Teardown`] after every entry has run.
    /// Draining twice is an error.
    pub fn drain(&self) -> Result<()> {
        let entries = {
            let mut state = self.state.lock();
            if state.drained {
                return Err(Error::configuration(format!(
                    "teardown registry for scope '{}' already drained",
                    self.scope
                )));
            }
            state.drained = true;
            std::mem::take(&mut state.entries)
        };

        let attempted = entries.len();
        debug!(scope = %self.scope, count = attempted, "clearing fixtures");

        let mut failures = Vec::new();
        for entry in entries.into_iter().rev() {
            let TeardownEntry { label, release } = entry;
            debug!(scope = %self.scope, %label, "removing fixture");
            match release() {
                Ok(()) => {}
                Err(error) if error.is_not_found() => {
                    debug!(scope = %self.scope, %label, %error, "ignoring error during teardown");
                }
                Err(error) => {
                    warn!(scope = %self.scope, %label, %error, "teardown entry failed");
                    failures.push(TeardownFailure { label, error });
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Teardown {
                attempted,
                failures,
            })
        }
    }
}

impl std::fmt::Debug for TeardownRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TeardownRegistry")
            .field("scope", &self.scope)
            .field("entries", &state.entries.len())
            .field("drained", &state.drained)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn recording_entry(label: &str, log: &Arc<Mutex<Vec<String>>>) -> TeardownEntry {
        let log = Arc::clone(log);
        let name = label.to_string();
        TeardownEntry::new(label, move || {
            log.lock().push(name);
            Ok(())
        })
    }

    #[test]
    fn drains_in_reverse_insertion_order() {
        let registry = TeardownRegistry::new("test");
        let log = Arc::new(Mutex::new(Vec::new()));
        for label in ["a", "b", "c"] {
            registry.push(recording_entry(label, &log)).unwrap();
        }

        registry.drain().unwrap();
        assert_eq!(*log.lock(), vec!["c", "b", "a"]);
    }

    #[test]
    fn not_found_counts_as_success() {
        let registry = TeardownRegistry::new("test");
        registry
            .push(TeardownEntry::new("gone", || Err(Error::not_found("id-1"))))
            .unwrap();
        assert!(registry.drain().is_ok());
    }

    #[test]
    fn failures_are_collected_not_short_circuited() {
        let registry = TeardownRegistry::new("test");
        let log = Arc::new(Mutex::new(Vec::new()));
        registry.push(recording_entry("first", &log)).unwrap();
        registry
            .push(TeardownEntry::new("second", || Err(Error::remote("boom"))))
            .unwrap();
        registry.push(recording_entry("third", &log)).unwrap();

        let err = registry.drain().unwrap_err();
        match err {
            Error::Teardown {
                attempted,
                failures,
            } => {
                assert_eq!(attempted, 3);
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].label, "second");
            }
            other => panic!("expected Teardown, got {other:?}"),
        }
        // third runs before first (LIFO), both despite the failure in between
        assert_eq!(*log.lock(), vec!["third", "first"]);
    }

    #[test]
    fn push_after_drain_is_refused() {
        let registry = TeardownRegistry::new("test");
        registry.drain().unwrap();
        let result = registry.push(TeardownEntry::new("late", || Ok(())));
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn double_drain_is_an_error() {
        let registry = TeardownRegistry::new("test");
        registry.drain().unwrap();
        assert!(registry.drain().is_err());
    }

    #[test]
    fn len_tracks_pushes() {
        let registry = TeardownRegistry::new("test");
        assert!(registry.is_empty());
        registry
            .push(TeardownEntry::new("one", || Ok(())))
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_drained());
    }
}
