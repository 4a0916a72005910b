//! Purge-tag bucketing and suffix uniqueness

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Timelike, Utc};
use proptest::prelude::*;
use rstest::rstest;

use ephemera_fixture::WatchdogConfig;

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

#[rstest]
#[case(at(2024, 3, 10, 14, 0, 0), "2024031015")] // boundary: 15:00 sharp after +1h
#[case(at(2024, 3, 10, 14, 0, 1), "2024031016")] // one second past rounds up
#[case(at(2024, 3, 10, 14, 59, 59), "2024031016")]
#[case(at(2024, 12, 31, 23, 30, 0), "2025010101")] // year rollover
fn bucket_rounds_up_to_the_hour(#[case] now: DateTime<Utc>, #[case] expected: &str) {
    let tag = WatchdogConfig::default().tag_at(now);
    assert_eq!(tag.bucket(), expected);
}

#[test]
fn same_window_shares_bucket_distinct_suffixes_over_many_draws() {
    let config = WatchdogConfig::default();
    let now = at(2024, 6, 1, 9, 20, 0);

    let mut buckets = HashSet::new();
    let mut suffixes = HashSet::new();
    for _ in 0..1_000 {
        let tag = config.tag_at(now);
        buckets.insert(tag.bucket());
        suffixes.insert(tag.suffix);
    }

    assert_eq!(buckets.len(), 1, "one shared purge bucket");
    assert_eq!(suffixes.len(), 1_000, "every suffix distinct");
}

proptest! {
    #[test]
    fn remove_after_is_hour_granular_and_in_the_future(
        secs in 0i64..4_000_000_000i64,
        keep_hours in 1u64..48u64,
    ) {
        let now = Utc.timestamp_opt(secs, 0).single().unwrap();
        let config = WatchdogConfig {
            keep_for: Duration::from_secs(keep_hours * 3600),
            ..WatchdogConfig::default()
        };
        let tag = config.tag_at(now);

        // Hour granularity
        prop_assert_eq!(tag.remove_after.minute(), 0);
        prop_assert_eq!(tag.remove_after.second(), 0);

        // At least the keep-for window in the future...
        let deadline = now + chrono::TimeDelta::hours(i64::try_from(keep_hours).unwrap());
        prop_assert!(tag.remove_after >= deadline);
        // ...but rounded up by strictly less than one hour.
        prop_assert!(tag.remove_after - deadline < chrono::TimeDelta::hours(1));
    }

    #[test]
    fn marker_is_stable_hex_of_bucket(secs in 0i64..4_000_000_000i64) {
        let now = Utc.timestamp_opt(secs, 0).single().unwrap();
        let tag = WatchdogConfig::default().tag_at(now);
        let bucket: u64 = tag.bucket().parse().unwrap();
        prop_assert_eq!(tag.marker(), format!("ra{bucket:x}"));
    }
}
