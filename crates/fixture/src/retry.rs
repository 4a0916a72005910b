//! Bounded-duration retry with multiplicative backoff
//!
//! Wraps a fallible blocking remote operation. Transient failures sleep and
//! retry until the policy's duration budget runs out; non-retryable failures
//! propagate immediately. Retries block the calling thread — there is no
//! background task and no separate cancellation channel.

use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{Error, Result};

/// Predicate deciding whether an error is worth another attempt
pub type Classify = fn(&Error) -> bool;

/// Immutable per-call retry policy.
///
/// Defaults match the conflict-retry window the workspace service needs in
/// practice: 30 s total, 1 s initial delay, doubling up to a 10 s cap, with
/// ±10 % jitter applied to each sleep.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetryPolicy {
    /// Total budget; once it elapses the next transient failure is terminal
    #[cfg_attr(feature = "serde", serde(with = "humantime_serde"))]
    pub max_duration: Duration,
    /// Sleep before the second attempt
    #[cfg_attr(feature = "serde", serde(with = "humantime_serde"))]
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each transient failure
    pub backoff_factor: f64,
    /// Upper bound on a single sleep
    #[cfg_attr(feature = "serde", serde(with = "humantime_serde"))]
    pub max_delay: Duration,
    /// Decides which errors are transient; defaults to [`Error::is_retryable`]
    #[cfg_attr(feature = "serde", serde(skip, default = "default_classify"))]
    pub classify: Classify,
}

fn default_classify() -> Classify {
    Error::is_retryable
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_duration: Duration::from_secs(30),
            initial_delay: Duration::from_secs(1),
            backoff_factor: 2.0,
            max_delay: Duration::from_secs(10),
            classify: Error::is_retryable,
        }
    }
}

impl RetryPolicy {
    /// Policy for waiting out post-create visibility delays.
    ///
    /// Eventually-consistent services can take minutes to surface a new
    /// object, so this widens the budget to two minutes.
    #[must_use]
    pub fn eventually_consistent() -> Self {
        Self {
            max_duration: Duration::from_secs(120),
            ..Self::default()
        }
    }

    /// Set the total retry budget.
    #[must_use]
    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = max_duration;
        self
    }

    /// Set the delay before the second attempt.
    #[must_use]
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    /// Set the transient-error predicate.
    #[must_use]
    pub fn with_classify(mut self, classify: Classify) -> Self {
        self.classify = classify;
        self
    }
}

/// Invoke `operation` until it succeeds, fails fatally, or the budget runs out.
///
/// State machine: `Attempting -> Done` on success; `Attempting -> Backoff ->
/// Attempting` on a transient failure with time remaining;
/// [`Error::RetryExhausted`] once the budget would be overrun; any
/// non-retryable error propagates unchanged from the first occurrence.
pub fn execute<T, F>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    if policy.backoff_factor < 1.0 {
        return Err(Error::configuration(format!(
            "backoff_factor must be >= 1.0, got {}",
            policy.backoff_factor
        )));
    }

    let started = Instant::now();
    let mut delay = policy.initial_delay.min(policy.max_delay);
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let err = match operation() {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !(policy.classify)(&err) {
            return Err(err);
        }

        let sleep_for = jitter(delay);
        if started.elapsed() + sleep_for >= policy.max_duration {
            return Err(Error::RetryExhausted {
                attempts,
                elapsed: started.elapsed(),
                source: Box::new(err),
            });
        }

        debug!(
            attempt = attempts,
            delay_ms = u64::try_from(sleep_for.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "retrying after transient failure"
        );
        thread::sleep(sleep_for);
        delay = delay.mul_f64(policy.backoff_factor).min(policy.max_delay);
    }
}

/// Spread sleeps by ±10 % so parallel workers don't retry in lockstep.
fn jitter(delay: Duration) -> Duration {
    delay.mul_f64(0.9 + fastrand::f64() * 0.2)
}
