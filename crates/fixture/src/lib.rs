//! # Ephemera Fixture
//!
//! Ephemeral remote-resource fixtures for integration testing against a
//! remote workspace platform. Each fixture creates a named remote object,
//! hands the test a read-only [`Handle`], and guarantees removal when the
//! scope ends — under partial failure, naming collisions, and
//! eventual-consistency delays.
//!
//! The per-resource create/delete calls are thin pass-throughs owned by
//! resource adapters; this crate is the shared lifecycle engine: random name
//! generation with collision handling, bounded retry with backoff, strict
//! LIFO teardown, and hour-bucketed purge tags that let an out-of-process
//! sweeper reclaim anything whose in-process teardown never ran.
//!
//! ```
//! use ephemera_fixture::{FixtureScope, ProvisionOptions};
//!
//! let scope = FixtureScope::new("demo");
//! let handle = scope.factory().provision(
//!     "schema",
//!     &ProvisionOptions::default(),
//!     |name, _tag| Ok(format!("id-{name}")), // remote create
//!     |_id| Ok(()),                          // remote delete
//! )?;
//! assert_eq!(handle.kind(), "schema");
//! scope.close()?;
//! # Ok::<(), ephemera_fixture::Error>(())
//! ```

pub mod environment;
pub mod error;
pub mod factory;
pub mod naming;
pub mod registry;
pub mod retry;
pub mod scope;
pub mod session;
pub mod testing;
pub mod watchdog;

pub use environment::Environment;
pub use error::{Error, Result, TeardownFailure};
pub use factory::{FixtureFactory, Handle, ProvisionOptions};
pub use registry::{TeardownEntry, TeardownRegistry};
pub use retry::RetryPolicy;
pub use scope::FixtureScope;
pub use session::SessionCell;
pub use watchdog::{PurgeTag, WatchdogConfig};
