//! Subtask timeline scheduler.
//!
//! [`Scheduler`] bundles a [`SchedulerConfig`] with the boundary operations:
//! - chain resolution of one task after an edit
//! - edit submission, rejected on cross-task overlap
//! - completion rescheduling of the global timeline
//! - drag-and-drop placement on a snapped grid
//! - first-fit day optimization
//!
//! Every operation takes a snapshot and returns a new one. Nothing here
//! performs I/O or keeps state between calls.

mod optimizer;

pub use optimizer::{optimize_day, DayPlan, PlacedSubtask};

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use tracing::{info, warn};

use crate::chain::resolve_chain_in_place;
use crate::completion::{self, CompletionOutcome};
use crate::conflict::{detect_conflicts, ConflictReport};
use crate::edit::SubtaskEdit;
use crate::error::{ConflictError, NotFoundError, Result, ValidationError};
use crate::interval::Interval;
use crate::placement::{self, PlacementOutcome};
use crate::task::{locate_task, Task};

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Placement grid (minutes)
    pub grid_minutes: u32,
    /// Local start of the planning day
    pub day_start: NaiveTime,
    /// Local end of the planning day; at or before `day_start` means next day
    pub day_end: NaiveTime,
    /// Offset used to interpret local dates and clock times
    pub utc_offset: FixedOffset,
    /// Minimum free gap the optimizer considers (minutes)
    pub min_gap_minutes: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            grid_minutes: 15,
            day_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            day_end: NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default(),
            utc_offset: Utc.fix(),
            min_gap_minutes: 5,
        }
    }
}

impl SchedulerConfig {
    /// Local calendar date of an instant.
    pub fn local_date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.utc_offset).date_naive()
    }

    /// Instant of a local wall-clock date and time.
    pub fn local_to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        let shift = Duration::seconds(i64::from(self.utc_offset.local_minus_utc()));
        Utc.from_utc_datetime(&(local - shift))
    }

    /// Start of the planning day, the anchor of the placement grid.
    pub fn day_anchor(&self, day: NaiveDate) -> DateTime<Utc> {
        self.local_to_utc(day.and_time(self.day_start))
    }

    /// Planning window of a day in epoch minutes.
    pub fn day_window(&self, day: NaiveDate) -> Interval {
        let start = Interval::minute_of(self.day_anchor(day));
        let mut end = Interval::minute_of(self.local_to_utc(day.and_time(self.day_end)));
        // Window crossing midnight (e.g. 22:00 to 02:00)
        if end <= start {
            end += 24 * 60;
        }
        Interval { start, end }
    }
}

/// Parse `HH:MM` into a clock time.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    let (hour, minute) = value.trim().split_once(':')?;
    if hour.is_empty() || minute.len() != 2 {
        return None;
    }
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Chain resolution over the visible task set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainReport {
    pub tasks: Vec<Task>,
    pub task_id: String,
    pub moved: Vec<String>,
    pub conflicts: ConflictReport,
}

/// Subtask timeline scheduler
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
}

impl Scheduler {
    /// Create a new scheduler with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Resolve one task's chain, then flag residual overlap across all tasks.
    ///
    /// Cross-task conflicts are returned, never fixed.
    pub fn resolve_chain(&self, tasks: &[Task], task_id: &str) -> Result<ChainReport, NotFoundError> {
        let task_index = locate_task(tasks, task_id)?;
        let mut updated = tasks.to_vec();
        let moved = resolve_chain_in_place(&mut updated[task_index]);
        let conflicts = detect_conflicts(&updated);

        info!(task_id, moved = moved.len(), conflicts = conflicts.pairs.len(), "resolved chain");

        Ok(ChainReport {
            tasks: updated,
            task_id: task_id.to_string(),
            moved,
            conflicts,
        })
    }

    /// Apply an edit to one subtask, cascade its chain, and accept the result
    /// only if no subtask of the task overlaps another task.
    ///
    /// # Errors
    /// `NotFound` when the task or subtask is absent, `Validation` when the
    /// subtask is completed, `Conflict` when cross-task overlap remains. On
    /// error nothing is applied.
    pub fn submit_edit(
        &self,
        tasks: &[Task],
        task_id: &str,
        subtask_id: &str,
        edit: &SubtaskEdit,
    ) -> Result<ChainReport> {
        let task_index = locate_task(tasks, task_id)?;
        let mut updated = tasks.to_vec();
        let task = &mut updated[task_index];

        let subtask = task
            .subtask_mut(subtask_id)
            .ok_or_else(|| NotFoundError::Subtask(subtask_id.to_string()))?;
        if subtask.completed {
            return Err(ValidationError::CompletedSubtask(subtask_id.to_string()).into());
        }
        edit.apply(subtask);

        let moved = resolve_chain_in_place(task);
        let conflicts = detect_conflicts(&updated);

        let blocking = conflicts.cross_task_blockers(task_id);
        if !blocking.is_empty() {
            warn!(task_id, subtask_id, blocking = ?blocking, "rejected edit with cross-task overlap");
            return Err(ConflictError {
                task_id: task_id.to_string(),
                blocking,
                report: conflicts,
            }
            .into());
        }

        info!(task_id, subtask_id, moved = moved.len(), "applied edit");
        Ok(ChainReport {
            tasks: updated,
            task_id: task_id.to_string(),
            moved,
            conflicts,
        })
    }

    /// Re-sequence everything after a subtask's actual work end.
    pub fn apply_completion(
        &self,
        tasks: &[Task],
        subtask_id: &str,
        actual_work_end: DateTime<Utc>,
    ) -> Result<CompletionOutcome, NotFoundError> {
        completion::apply_completion(tasks, subtask_id, actual_work_end)
    }

    /// Snap a drop time and move exactly one subtask there.
    pub fn place_subtask(
        &self,
        tasks: &[Task],
        subtask_id: &str,
        raw_drop_time: DateTime<Utc>,
    ) -> Result<PlacementOutcome> {
        placement::place_subtask(tasks, subtask_id, raw_drop_time, &self.config)
    }

    /// Fill a day's free gaps with unscheduled subtasks.
    pub fn optimize_day(&self, tasks: &[Task], day: NaiveDate) -> DayPlan {
        optimize_day(tasks, day, &self.config)
    }

    /// Flag every overlap in the task set.
    pub fn detect_conflicts(&self, tasks: &[Task]) -> ConflictReport {
        detect_conflicts(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::task::SubTask;

    fn at(hm: &str) -> DateTime<Utc> {
        format!("2024-03-01T{hm}:00Z").parse().unwrap()
    }

    fn snapshot() -> Vec<Task> {
        let mut t1 = Task::new("t1", "Report", at("06:00"));
        t1.subtasks = vec![
            SubTask::new("a", "Draft").with_durations(25, 5).scheduled_at(at("09:00")),
            SubTask::new("b", "Edit").with_durations(25, 0).scheduled_at(at("09:15")),
        ];
        let mut t2 = Task::new("t2", "Email", at("06:30"));
        t2.subtasks = vec![SubTask::new("c", "Inbox").with_durations(30, 0).scheduled_at(at("14:00"))];
        vec![t1, t2]
    }

    #[test]
    fn day_window_defaults_to_workday() {
        let config = SchedulerConfig::default();
        let window = config.day_window(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(window.start_time(), at("08:00"));
        assert_eq!(window.end_time(), at("18:00"));
    }

    #[test]
    fn day_window_honours_offset_and_midnight() {
        let config = SchedulerConfig {
            day_start: parse_clock("22:00").unwrap(),
            day_end: parse_clock("02:00").unwrap(),
            utc_offset: FixedOffset::east_opt(2 * 3600).unwrap(),
            ..SchedulerConfig::default()
        };
        let window = config.day_window(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(window.start_time(), at("20:00"));
        assert_eq!(window.duration_minutes(), 240);
    }

    #[test]
    fn parse_clock_accepts_hh_mm_only() {
        assert_eq!(parse_clock("09:05"), NaiveTime::from_hms_opt(9, 5, 0));
        assert_eq!(parse_clock("9:05"), NaiveTime::from_hms_opt(9, 5, 0));
        assert!(parse_clock("24:00").is_none());
        assert!(parse_clock("09:5").is_none());
        assert!(parse_clock("0905").is_none());
        assert!(parse_clock("").is_none());
    }

    #[test]
    fn resolve_chain_moves_overlapping_successor() {
        let report = Scheduler::new().resolve_chain(&snapshot(), "t1").unwrap();
        assert_eq!(report.tasks[0].subtasks[1].scheduled_start_time, Some(at("09:30")));
        assert_eq!(report.moved, vec!["b".to_string()]);
        assert!(report.conflicts.is_empty());
    }

    #[test]
    fn resolve_chain_keeps_cross_task_flag() {
        let mut tasks = snapshot();
        tasks[0].subtasks[1].scheduled_start_time = Some(at("14:00"));
        tasks[0].subtasks[1].duration_minutes = 30;

        let scheduler = Scheduler::new();
        for task_id in ["t1", "t2"] {
            let report = scheduler.resolve_chain(&tasks, task_id).unwrap();
            assert!(report.conflicts.is_conflicting("b"));
            assert!(report.conflicts.is_conflicting("c"));
        }
    }

    #[test]
    fn submit_edit_rejects_cross_task_overlap_without_applying() {
        let edit = SubtaskEdit {
            duration_minutes: Some(300),
            ..SubtaskEdit::default()
        };
        let err = Scheduler::new().submit_edit(&snapshot(), "t1", "b", &edit).unwrap_err();
        match err {
            CoreError::Conflict(conflict) => {
                assert_eq!(conflict.task_id, "t1");
                assert_eq!(conflict.blocking, vec!["c".to_string()]);
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn submit_edit_resolves_intra_task_overlap() {
        let edit = SubtaskEdit {
            duration_minutes: Some(50),
            ..SubtaskEdit::default()
        };
        let report = Scheduler::new().submit_edit(&snapshot(), "t1", "a", &edit).unwrap();
        assert_eq!(report.tasks[0].subtasks[0].duration_minutes, 50);
        assert_eq!(report.tasks[0].subtasks[1].scheduled_start_time, Some(at("09:55")));
        assert!(report.conflicts.is_empty());
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let scheduler = Scheduler::new();
        assert_eq!(
            scheduler.resolve_chain(&snapshot(), "nope").unwrap_err(),
            NotFoundError::Task("nope".into())
        );
        let err = scheduler
            .submit_edit(&snapshot(), "t1", "c", &SubtaskEdit::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(NotFoundError::Subtask(_))));
    }
}
