//! Daily time-of-day window used to filter candidate slots
use chrono::{DateTime, Duration, NaiveTime, Utc};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// A daily window in UTC minutes since midnight. `start_minutes` is in
/// `[0, 1440)` and `end_minutes` in `(0, 1440]` with `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDayWindow {
    pub start_minutes: i64,
    pub end_minutes: i64,
}

/// Minutes since midnight for `HH:mm`. Anything after the minutes,
/// such as seconds in `HH:mm:ss`, is ignored.
fn parse_hh_mm(s: &str) -> Option<i64> {
    let mut parts = s.trim().split(':');
    let h = parts.next()?.trim().parse::<i64>().ok()?;
    let m = parts.next()?.trim().parse::<i64>().ok()?;
    Some(h * 60 + m)
}

impl TimeOfDayWindow {
    /// Translate a local `HH:mm` window into UTC using
    /// `offset_minutes` (added to local time to get UTC, positive west
    /// of UTC). Returns `None` when any part is missing or malformed,
    /// or when the window is empty, in which case no filtering
    /// should happen.
    pub fn parse(
        start: Option<&str>,
        end: Option<&str>,
        offset_minutes: Option<i64>,
    ) -> Option<Self> {
        let start = parse_hh_mm(start?)?;
        let end = parse_hh_mm(end?)?;
        let offset = offset_minutes?;
        if end <= start {
            return None;
        }

        let start_utc = (start + offset).rem_euclid(MINUTES_PER_DAY);
        let end_utc = (end + offset - 1).rem_euclid(MINUTES_PER_DAY) + 1;

        // A window that wraps past midnight in UTC can't be expressed
        // as a single range within one day
        if end_utc <= start_utc {
            tracing::debug!(
                "Ignoring time of day window {}..{} after offset {}",
                start,
                end,
                offset
            );
            return None;
        }

        Some(Self {
            start_minutes: start_utc,
            end_minutes: end_utc,
        })
    }

    /// Whether a slot beginning at `start` and lasting `duration` sits
    /// inside the window of the UTC day it starts on.
    pub fn contains(&self, start: DateTime<Utc>, duration: Duration) -> bool {
        let into_day = start.time().signed_duration_since(NaiveTime::default());
        into_day >= Duration::minutes(self.start_minutes)
            && into_day + duration <= Duration::minutes(self.end_minutes)
    }
}
