//! Integer-minute interval arithmetic over subtasks.
//!
//! Instants are reduced to whole minutes since the Unix epoch (seconds are
//! truncated toward negative infinity) so cascades never accumulate drift.
//! Conversion back to `DateTime<Utc>` happens only at the boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::SubTask;

/// Half-open `[start, end)` range in epoch minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
}

impl Interval {
    /// Create an interval; `None` unless `end > start`.
    pub fn new(start: i64, end: i64) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    /// Create an interval from instants; `None` unless `end > start` at minute precision.
    pub fn from_instants(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        Self::new(Self::minute_of(start), Self::minute_of(end))
    }

    /// Work interval of a subtask.
    pub fn work(subtask: &SubTask) -> Option<Self> {
        if subtask.duration_minutes == 0 {
            return None;
        }
        let start = Self::minute_of(subtask.scheduled_start_time?);
        Self::new(start, start + i64::from(subtask.duration_minutes))
    }

    /// Activity interval of a subtask (work plus break).
    pub fn activity(subtask: &SubTask) -> Option<Self> {
        let work = Self::work(subtask)?;
        Some(Self {
            start: work.start,
            end: work.end + i64::from(subtask.break_minutes),
        })
    }

    /// Whole minutes since the epoch.
    pub fn minute_of(instant: DateTime<Utc>) -> i64 {
        instant.timestamp().div_euclid(60)
    }

    /// Instant at the given epoch minute, saturating at chrono's range.
    pub fn instant_at(minute: i64) -> DateTime<Utc> {
        minute
            .checked_mul(60)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or(if minute < 0 {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            })
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        Self::instant_at(self.start)
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        Self::instant_at(self.end)
    }

    pub fn duration_minutes(&self) -> i64 {
        self.end - self.start
    }

    /// Strict overlap; touching boundaries do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// `[scheduledStartTime, scheduledStartTime + durationMinutes)`.
pub fn work_interval(subtask: &SubTask) -> Option<Interval> {
    Interval::work(subtask)
}

/// Work interval extended by `breakMinutes`.
pub fn activity_interval(subtask: &SubTask) -> Option<Interval> {
    Interval::activity(subtask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn work_and_activity_intervals() {
        let subtask = SubTask::new("a", "A")
            .with_durations(25, 5)
            .scheduled_at(at("2024-03-01T09:00:00Z"));

        let work = work_interval(&subtask).unwrap();
        let activity = activity_interval(&subtask).unwrap();
        assert_eq!(work.duration_minutes(), 25);
        assert_eq!(activity.duration_minutes(), 30);
        assert_eq!(work.start, activity.start);
        assert_eq!(activity.end_time(), at("2024-03-01T09:30:00Z"));
    }

    #[test]
    fn unscheduled_subtask_has_no_interval() {
        let subtask = SubTask::new("a", "A");
        assert!(work_interval(&subtask).is_none());
        assert!(activity_interval(&subtask).is_none());
    }

    #[test]
    fn seconds_truncate_to_the_minute() {
        let subtask = SubTask::new("a", "A").scheduled_at(at("2024-03-01T09:00:59Z"));
        let work = work_interval(&subtask).unwrap();
        assert_eq!(work.start_time(), at("2024-03-01T09:00:00Z"));
    }

    #[test]
    fn pre_epoch_minutes_floor() {
        assert_eq!(Interval::minute_of(at("1969-12-31T23:59:30Z")), -1);
        assert_eq!(Interval::instant_at(-1), at("1969-12-31T23:59:00Z"));
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let a = Interval::new(0, 30).unwrap();
        let b = Interval::new(30, 60).unwrap();
        let c = Interval::new(29, 31).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
        assert!(Interval::new(10, 10).is_none());
    }
}
