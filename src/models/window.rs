//! Submission-date window a run accepts entries from.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone, Utc};
use serde::Serialize;

/// Trailing time span within which an entry's submission date must fall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    /// Earliest accepted timestamp (inclusive)
    pub start: DateTime<Utc>,

    /// Latest accepted timestamp
    pub end: DateTime<Utc>,

    /// Whether `end` itself is accepted
    pub end_inclusive: bool,
}

impl Window {
    /// `[now - days, now]`
    pub fn trailing(now: DateTime<Utc>, days: u32) -> Self {
        Self {
            start: days_before(now, days),
            end: now,
            end_inclusive: true,
        }
    }

    /// `[end - days, end)` where `end` is the latest `hour:00` in `offset`
    /// at or before `now`.
    ///
    /// Consecutive daily runs with the same cutoff tile the timeline
    /// without overlap.
    pub fn daily_cutoff(now: DateTime<Utc>, days: u32, offset: FixedOffset, hour: u32) -> Self {
        let local = now.with_timezone(&offset);
        let cutoff = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);

        let mut end_date = local.date_naive();
        if local.time() < cutoff {
            end_date = end_date.pred_opt().unwrap_or(end_date);
        }

        let end = offset
            .from_local_datetime(&end_date.and_time(cutoff))
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(now);

        Self {
            start: days_before(end, days),
            end,
            end_inclusive: false,
        }
    }

    /// Check whether a timestamp falls inside the window
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        if ts < self.start {
            return false;
        }
        if self.end_inclusive {
            ts <= self.end
        } else {
            ts < self.end
        }
    }

    /// Human-readable bounds rendered in `offset`
    pub fn describe(&self, offset: FixedOffset) -> String {
        format!(
            "{} – {} (UTC{})",
            self.start.with_timezone(&offset).format("%Y-%m-%d %H:%M"),
            self.end.with_timezone(&offset).format("%Y-%m-%d %H:%M"),
            offset
        )
    }
}

/// `days` before `ts`, clamped to the earliest representable instant
fn days_before(ts: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    ts.checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
