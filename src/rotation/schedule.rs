//! Hour and day boundaries for time-based rotation.

use super::RotationStrategy;
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Timelike};

/// Start of the hour (Hourly) or day (Daily) following `now`, in `now`'s zone.
///
/// Returns `None` for size-based rotation, which has no deadline.
#[must_use]
pub fn next_rotation_time<Tz: TimeZone>(
    strategy: RotationStrategy,
    now: DateTime<Tz>,
) -> Option<DateTime<Tz>> {
    let naive = now.naive_local();
    let boundary = match strategy {
        RotationStrategy::BySize { .. } => return None,
        RotationStrategy::Hourly => {
            let hour_start = naive.date().and_hms_opt(naive.hour(), 0, 0)?;
            hour_start + Duration::hours(1)
        }
        RotationStrategy::Daily => naive.date().succ_opt()?.and_hms_opt(0, 0, 0)?,
    };
    Some(resolve_local(boundary, now))
}

/// Maps a wall-clock boundary back to an instant.
///
/// A boundary repeated by a DST fall-back resolves to its first occurrence; one
/// skipped by a spring-forward resolves to the first valid hour after it.
fn resolve_local<Tz: TimeZone>(boundary: NaiveDateTime, now: DateTime<Tz>) -> DateTime<Tz> {
    let tz = now.timezone();
    if let Some(t) = tz.from_local_datetime(&boundary).earliest() {
        return t;
    }
    (1..=3)
        .map(|h| boundary + Duration::hours(h))
        .find_map(|candidate| tz.from_local_datetime(&candidate).earliest())
        .unwrap_or_else(|| now + Duration::hours(1))
}

/// True once `now` has reached the deadline.
#[must_use]
pub fn is_due<Tz: TimeZone>(deadline: Option<DateTime<Tz>>, now: DateTime<Tz>) -> bool {
    deadline.is_some_and(|d| now >= d)
}
