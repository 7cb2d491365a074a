//! Time gap detection between busy blocks.
//!
//! Finds the free slots of a day window that are not covered by any busy
//! interval. All values are epoch minutes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// A free slot on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeGap {
    pub start: i64,
    pub end: i64,
}

impl TimeGap {
    /// Create a new time gap; `None` if empty
    pub fn new(start: i64, end: i64) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        self.end - self.start
    }

    /// Check if a block of `minutes` starting at `from` fits inside this gap
    pub fn can_fit_from(&self, from: i64, minutes: i64) -> bool {
        let start = from.max(self.start);
        start + minutes <= self.end
    }

    pub fn as_interval(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end,
        }
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        Interval::instant_at(self.start)
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        Interval::instant_at(self.end)
    }

    /// Remainders of this gap on either side of `used`.
    pub fn split_around(&self, used: Interval) -> (Option<TimeGap>, Option<TimeGap>) {
        (
            TimeGap::new(self.start, used.start.min(self.end)),
            TimeGap::new(used.end.max(self.start), self.end),
        )
    }
}

/// Detector for finding time gaps in a schedule
pub struct TimeGapDetector {
    /// Minimum gap duration to report (in minutes)
    min_gap_minutes: i64,
}

impl TimeGapDetector {
    /// Create a new detector that reports every non-empty gap
    pub fn new() -> Self {
        Self { min_gap_minutes: 1 }
    }

    /// Set the minimum gap duration
    pub fn with_min_gap(mut self, minutes: i64) -> Self {
        self.min_gap_minutes = minutes.max(1);
        self
    }

    /// Find gaps between busy blocks inside `window`, sorted by start time.
    pub fn find_gaps(&self, busy: &[Interval], window: Interval) -> Vec<TimeGap> {
        let mut gaps = Vec::new();

        let mut sorted: Vec<Interval> = busy.to_vec();
        sorted.sort_by_key(|b| b.start);

        let mut last_end = window.start;

        for block in &sorted {
            // Already covered
            if block.end <= last_end {
                continue;
            }

            if block.start >= window.end {
                break;
            }

            if block.start > last_end {
                self.push_gap(&mut gaps, last_end, block.start.min(window.end));
            }

            last_end = block.end.min(window.end);
        }

        if last_end < window.end {
            self.push_gap(&mut gaps, last_end, window.end);
        }

        gaps
    }

    fn push_gap(&self, gaps: &mut Vec<TimeGap>, start: i64, end: i64) {
        if let Some(gap) = TimeGap::new(start, end) {
            if gap.duration_minutes() >= self.min_gap_minutes {
                gaps.push(gap);
            }
        }
    }
}

impl Default for TimeGapDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to find gaps with default settings
pub fn detect_time_gaps(busy: &[Interval], window: Interval) -> Vec<TimeGap> {
    TimeGapDetector::new().find_gaps(busy, window)
}
