//! Purge tagging for the external watchdog sweep
//!
//! Every created resource carries a `remove_after` hour bucket and a short
//! random suffix. An out-of-process sweeper deletes anything whose bucket has
//! passed, which reclaims resources when in-process teardown never ran
//! (crash, kill, timeout). Rounding up to the hour makes resources created
//! close together share a bucket, so bulk sweeps stay cheap.

use std::time::Duration;

use chrono::{DateTime, Datelike, DurationRound, TimeDelta, Timelike, Utc};

use crate::naming;

/// Preserve resources created during tests for at least this long.
pub const DEFAULT_KEEP_FOR: Duration = Duration::from_secs(60 * 60);

/// Default purge-suffix length.
///
/// Long enough that 1,000 resources landing in the same bucket collide with
/// negligible probability.
pub const DEFAULT_SUFFIX_LEN: usize = 8;

/// Configuration for purge tagging
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WatchdogConfig {
    /// Minimum time a resource is preserved before the sweeper may take it
    #[cfg_attr(feature = "serde", serde(with = "humantime_serde"))]
    pub keep_for: Duration,
    /// Length of the random per-resource suffix
    pub suffix_len: usize,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            keep_for: DEFAULT_KEEP_FOR,
            suffix_len: DEFAULT_SUFFIX_LEN,
        }
    }
}

impl WatchdogConfig {
    /// Compute a purge tag for a resource created at `now`.
    ///
    /// Deterministic given `now` and the configuration, except for the random
    /// suffix draw.
    #[must_use]
    pub fn tag_at(&self, now: DateTime<Utc>) -> PurgeTag {
        let keep = TimeDelta::from_std(self.keep_for).unwrap_or_else(|_| TimeDelta::hours(1));
        PurgeTag {
            remove_after: round_up_to_hour(now + keep),
            suffix: naming::make_random(self.suffix_len),
        }
    }

    /// Compute a purge tag for a resource created right now.
    #[must_use]
    pub fn tag(&self) -> PurgeTag {
        self.tag_at(Utc::now())
    }
}

/// Advisory purge metadata for one created resource
///
/// Consumed by the external sweep process, never read back by this engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeTag {
    /// Hour-granular UTC instant from which the resource may be purged
    pub remove_after: DateTime<Utc>,
    /// Short random token keeping names unique within a shared bucket
    pub suffix: String,
}

impl PurgeTag {
    /// The purge bucket as a compact `YYYYMMDDHH` string.
    #[must_use]
    pub fn bucket(&self) -> String {
        self.remove_after.format("%Y%m%d%H").to_string()
    }

    /// Hex-encoded bucket marker (`ra{hex}`) for embedding into names.
    ///
    /// This is the token the sweep tool's matcher looks for.
    #[must_use]
    pub fn marker(&self) -> String {
        let t = &self.remove_after;
        let bucket = u64::from(t.year().unsigned_abs()) * 1_000_000
            + u64::from(t.month()) * 10_000
            + u64::from(t.day()) * 100
            + u64::from(t.hour());
        format!("ra{bucket:x}")
    }
}

/// Round up to the next hour boundary; instants already on a boundary stay.
fn round_up_to_hour(t: DateTime<Utc>) -> DateTime<Utc> {
    // duration_trunc only fails on timestamps outside chrono's range
    let floor = t.duration_trunc(TimeDelta::hours(1)).unwrap_or(t);
    if floor == t {
        t
    } else {
        floor + TimeDelta::hours(1)
    }
}
