//! Generic resource factory
//!
//! Composes the name generator, purge tagger, retry engine, and teardown
//! registry around a resource kind's externally supplied `create`/`delete`
//! functions. The factory never interprets resource-specific options; those
//! stay inside the caller's closures.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::naming::{self, DEFAULT_NAME_LEN};
use crate::registry::{TeardownEntry, TeardownRegistry};
use crate::retry::{self, RetryPolicy};
use crate::watchdog::{PurgeTag, WatchdogConfig};

/// Read-only reference to a created remote resource.
///
/// The release capability lives exclusively in the teardown registry; a
/// handle cannot delete (or double-delete) its resource.
#[derive(Debug, Clone)]
pub struct Handle {
    kind: String,
    id: String,
    name: String,
    remove_after: String,
}

impl Handle {
    /// The resource kind this handle was provisioned as.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The remote identifier returned by the create function.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The generated resource name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The purge bucket (`YYYYMMDDHH`, UTC) this resource was tagged with.
    #[must_use]
    pub fn remove_after(&self) -> &str {
        &self.remove_after
    }
}

/// Engine-interpreted provisioning knobs.
///
/// Resource-specific creation options are forwarded untouched by capturing
/// them in the `create` closure.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProvisionOptions {
    /// Length of the random portion of the name candidate
    pub name_len: usize,
    /// Optional prefix; when set, candidates take the form
    /// `{prefix}-{random}-{purge marker}`
    pub prefix: Option<String>,
    /// Retry policy for the create call
    pub policy: RetryPolicy,
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self {
            name_len: DEFAULT_NAME_LEN,
            prefix: None,
            policy: RetryPolicy::default(),
        }
    }
}

impl ProvisionOptions {
    /// Options with a name prefix (the common convention for named objects).
    #[must_use]
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    /// Set the random-name length (constrained namespaces use e.g. 8).
    #[must_use]
    pub fn with_name_len(mut self, name_len: usize) -> Self {
        self.name_len = name_len;
        self
    }

    /// Set the retry policy for the create call.
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Creates uniquely named remote resources and guarantees their teardown.
#[derive(Debug, Clone)]
pub struct FixtureFactory {
    registry: Arc<TeardownRegistry>,
    watchdog: WatchdogConfig,
}

impl FixtureFactory {
    /// Create a factory registering teardowns on the given registry.
    #[must_use]
    pub fn new(registry: Arc<TeardownRegistry>) -> Self {
        Self {
            registry,
            watchdog: WatchdogConfig::default(),
        }
    }

    /// Override the purge-tagging configuration.
    #[must_use]
    pub fn with_watchdog(mut self, watchdog: WatchdogConfig) -> Self {
        self.watchdog = watchdog;
        self
    }

    /// The registry this factory registers teardowns on.
    #[must_use]
    pub fn registry(&self) -> &Arc<TeardownRegistry> {
        &self.registry
    }

    /// Provision a resource: draw a name, create it with retries, register
    /// its teardown, and return the handle.
    ///
    /// A fresh name candidate is drawn for every attempt, so collisions
    /// resolve transparently without escalating to the caller. The purge tag
    /// is computed once and shared across attempts.
    ///
    /// The teardown is registered before the handle is returned: there is no
    /// window in which the resource exists without a registered release. If
    /// the registry refuses the entry (scope already drained), the factory
    /// makes a best-effort delete of the just-created resource and fails.
    pub fn provision<C, D>(
        &self,
        kind: &str,
        options: &ProvisionOptions,
        mut create: C,
        delete: D,
    ) -> Result<Handle>
    where
        C: FnMut(&str, &PurgeTag) -> Result<String>,
        D: Fn(&str) -> Result<()> + Send + Sync + 'static,
    {
        let tag = self.watchdog.tag();

        let (id, name) = retry::execute(&options.policy, || {
            let candidate = candidate_name(options, &tag);
            match create(&candidate, &tag) {
                Ok(id) => Ok((id, candidate)),
                Err(err) => {
                    if err.is_collision() {
                        debug!(kind, name = %candidate, "name collision, regenerating");
                    }
                    Err(err)
                }
            }
        })?;

        let delete = Arc::new(delete);
        let entry = TeardownEntry::new(format!("{kind} {name}"), {
            let delete = Arc::clone(&delete);
            let id = id.clone();
            move || (*delete)(&id)
        });

        if let Err(push_err) = self.registry.push(entry) {
            // The resource exists but nothing tracks it. Delete it now rather
            // than leaking it until the watchdog sweep.
            warn!(kind, %name, %id, "registry refused teardown, deleting resource");
            if let Err(error) = (*delete)(&id) {
                warn!(kind, %id, %error, "best-effort delete failed, watchdog will reclaim");
            }
            return Err(push_err);
        }

        debug!(kind, %name, %id, remove_after = %tag.bucket(), "created fixture");
        Ok(Handle {
            kind: kind.to_string(),
            id,
            name,
            remove_after: tag.bucket(),
        })
    }
}

/// Compose a name candidate for one attempt.
fn candidate_name(options: &ProvisionOptions, tag: &PurgeTag) -> String {
    let random = naming::make_random(options.name_len);
    match &options.prefix {
        Some(prefix) => format!("{prefix}-{random}-{}", tag.marker()),
        None => random,
    }
}
