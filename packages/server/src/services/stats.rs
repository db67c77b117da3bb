//! Seven-day bathroom histogram.
//!
//! Bucket 6 is the 24 hours ending at `now`, bucket 0 the day six days
//! before that. Labels are the UTC weekday of each bucket, oldest first.

use chrono::{DateTime, Duration, Utc};
use pawtrack_common::{BathroomType, Consistency};

use crate::models::bathroom_log::{BathroomStatsResponse, ConsistencySeries};

pub const WINDOW_DAYS: usize = 7;

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// The slice of a bathroom log the histogram needs.
#[derive(Debug, Clone, Copy)]
pub struct StatsEvent {
    pub date: DateTime<Utc>,
    pub log_type: BathroomType,
    pub consistency: Option<Consistency>,
}

/// Start of the query window: logs dated at or after this instant are fetched.
pub fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(WINDOW_DAYS as i64)
}

/// Index of the bucket `date` falls into, or `None` outside the window.
pub fn bucket_index(now: DateTime<Utc>, date: DateTime<Utc>) -> Option<usize> {
    let elapsed_days = (now - date).num_milliseconds().div_euclid(DAY_MILLIS);
    let index = WINDOW_DAYS as i64 - 1 - elapsed_days;
    (0..WINDOW_DAYS as i64)
        .contains(&index)
        .then_some(index as usize)
}

pub fn labels(now: DateTime<Utc>) -> Vec<String> {
    (0..WINDOW_DAYS)
        .map(|i| {
            let day = now - Duration::days((WINDOW_DAYS - 1 - i) as i64);
            day.format("%a").to_string()
        })
        .collect()
}

pub fn compute_stats(
    events: impl IntoIterator<Item = StatsEvent>,
    now: DateTime<Utc>,
) -> BathroomStatsResponse {
    let mut pee = vec![0u32; WINDOW_DAYS];
    let mut poop = vec![0u32; WINDOW_DAYS];
    let mut consistency = ConsistencySeries {
        normal: vec![0; WINDOW_DAYS],
        soft: vec![0; WINDOW_DAYS],
        hard: vec![0; WINDOW_DAYS],
    };

    for event in events {
        let Some(idx) = bucket_index(now, event.date) else {
            continue;
        };
        if event.log_type.involves_pee() {
            pee[idx] += 1;
        }
        if event.log_type.involves_poop() {
            poop[idx] += 1;
            // Watery stools are counted in `poop` but have no series of their own.
            match event.consistency {
                Some(Consistency::Normal) => consistency.normal[idx] += 1,
                Some(Consistency::Soft) => consistency.soft[idx] += 1,
                Some(Consistency::Hard) => consistency.hard[idx] += 1,
                Some(Consistency::Watery) | None => {}
            }
        }
    }

    BathroomStatsResponse {
        labels: labels(now),
        pee,
        poop,
        consistency,
    }
}
