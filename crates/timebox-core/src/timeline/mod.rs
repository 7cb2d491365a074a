//! Free-time detection on a day timeline.
//!
//! Busy blocks are activity intervals of scheduled subtasks; gaps are their
//! complement inside the configured day window.

mod gap;

pub use gap::{detect_time_gaps, TimeGap, TimeGapDetector};
