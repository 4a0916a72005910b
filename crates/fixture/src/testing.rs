//! Test support: a scripted in-memory stand-in for the remote service
//!
//! `FakeRemote` records every create/delete call in order and plays back
//! scripted outcomes, so lifecycle behavior (collisions, transient failures,
//! teardown ordering) can be exercised without a real workspace.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::error::{Error, Result};

/// Outcome of one scripted create attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateScript {
    /// Creation succeeds, an id is issued
    Succeed,
    /// The candidate name is reported as taken
    Collide,
    /// A transient failure (rate limit, visibility delay)
    Transient,
    /// A non-retryable failure
    Fatal,
}

/// Outcome of one scripted delete attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteScript {
    /// Deletion succeeds
    Succeed,
    /// The object is already gone
    NotFound,
    /// A non-retryable failure
    Fail,
}

/// One recorded remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    /// A create attempt with the candidate name
    Create {
        /// The candidate name passed to create
        name: String,
    },
    /// A delete attempt with the target id
    Delete {
        /// The id passed to delete
        id: String,
    },
}

/// Scripted fake of the remote workspace service.
///
/// Scripts are consumed front-to-back, one entry per call; once a script
/// queue is empty the default outcome applies (succeed, unless overridden
/// with [`FakeRemote::always_create`]).
#[derive(Debug, Default)]
pub struct FakeRemote {
    create_script: Mutex<VecDeque<CreateScript>>,
    create_default: Mutex<Option<CreateScript>>,
    delete_script: Mutex<VecDeque<DeleteScript>>,
    calls: Mutex<Vec<RemoteCall>>,
    created: Mutex<Vec<String>>,
    next_id: AtomicUsize,
}

impl FakeRemote {
    /// Create a fake that succeeds on every call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue outcomes for upcoming create attempts.
    pub fn script_create(&self, outcomes: impl IntoIterator<Item = CreateScript>) {
        self.create_script.lock().extend(outcomes);
    }

    /// Set the outcome applied once the create script is exhausted.
    pub fn always_create(&self, outcome: CreateScript) {
        *self.create_default.lock() = Some(outcome);
    }

    /// Queue outcomes for upcoming delete attempts.
    pub fn script_delete(&self, outcomes: impl IntoIterator<Item = DeleteScript>) {
        self.delete_script.lock().extend(outcomes);
    }

    /// Attempt to create an object with the given candidate name.
    pub fn create(&self, name: &str) -> Result<String> {
        self.calls.lock().push(RemoteCall::Create {
            name: name.to_string(),
        });
        let outcome = self
            .create_script
            .lock()
            .pop_front()
            .or(*self.create_default.lock())
            .unwrap_or(CreateScript::Succeed);
        match outcome {
            CreateScript::Succeed => {
                let id = format!("id-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
                self.created.lock().push(name.to_string());
                Ok(id)
            }
            CreateScript::Collide => Err(Error::collision(name)),
            CreateScript::Transient => Err(Error::transient("service still provisioning")),
            CreateScript::Fatal => Err(Error::remote("permission denied")),
        }
    }

    /// Attempt to delete an object by id.
    pub fn delete(&self, id: &str) -> Result<()> {
        self.calls.lock().push(RemoteCall::Delete { id: id.to_string() });
        let outcome = self
            .delete_script
            .lock()
            .pop_front()
            .unwrap_or(DeleteScript::Succeed);
        match outcome {
            DeleteScript::Succeed => Ok(()),
            DeleteScript::NotFound => Err(Error::not_found(id)),
            DeleteScript::Fail => Err(Error::remote("delete failed")),
        }
    }

    /// Every recorded call, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().clone()
    }

    /// Names of successfully created objects, in creation order.
    #[must_use]
    pub fn created_names(&self) -> Vec<String> {
        self.created.lock().clone()
    }

    /// Ids passed to delete, in call order.
    #[must_use]
    pub fn deleted_ids(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RemoteCall::Delete { id } => Some(id.clone()),
                RemoteCall::Create { .. } => None,
            })
            .collect()
    }

    /// Number of create attempts observed (including failed ones).
    #[must_use]
    pub fn create_attempts(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, RemoteCall::Create { .. }))
            .count()
    }
}
