//! Construct-once session holder
//!
//! The authenticated client is built elsewhere and expensive to construct, so
//! it is created at most once per run and shared read-only across tests. The
//! cell never manages credentials or transport; it only enforces the
//! construct-once / read-only-after lifecycle.

use std::sync::OnceLock;

use parking_lot::Mutex;

use crate::error::{Error, Result};

/// Holds one externally constructed client for the whole run.
///
/// After successful initialization the value is immutable, so sharing `&C`
/// across concurrently running tests needs no further synchronization. A
/// failed initialization leaves the cell empty; the next caller retries.
pub struct SessionCell<C> {
    cell: OnceLock<C>,
    init_lock: Mutex<()>,
}

impl<C> SessionCell<C> {
    /// Create an empty cell.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            init_lock: Mutex::new(()),
        }
    }

    /// The client, if already initialized.
    #[must_use]
    pub fn get(&self) -> Option<&C> {
        self.cell.get()
    }

    /// Get the client, constructing it on first use.
    ///
    /// `init` runs at most once per successful initialization; concurrent
    /// callers block until the winner finishes. An `init` error is returned
    /// to the caller and does not poison the cell.
    pub fn get_or_init<F>(&self, init: F) -> Result<&C>
    where
        F: FnOnce() -> Result<C>,
    {
        if let Some(client) = self.cell.get() {
            return Ok(client);
        }
        let _guard = self.init_lock.lock();
        if let Some(client) = self.cell.get() {
            return Ok(client);
        }
        let client = init()?;
        // Cannot already be set: every writer holds init_lock.
        let _ = self.cell.set(client);
        self.cell
            .get()
            .ok_or_else(|| Error::configuration("session cell lost its value after set"))
    }
}

impl<C> Default for SessionCell<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for SessionCell<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCell")
            .field("initialized", &self.cell.get().is_some())
            .finish()
    }
}
