//! Drag-and-drop relocation of a single subtask.
//!
//! The drop time is snapped to the grid and applied to exactly one subtask.
//! Nothing cascades and overlap is never rejected; it is only flagged.

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::conflict::{detect_conflicts, ConflictReport};
use crate::error::{Result, ValidationError};
use crate::scheduler::SchedulerConfig;
use crate::task::{locate_subtask, Task};

/// Result of a placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementOutcome {
    pub tasks: Vec<Task>,
    pub subtask_id: String,
    /// Start applied to the subtask after snapping
    pub snapped_start: DateTime<Utc>,
    pub conflicts: ConflictReport,
}

/// Round `raw` to the nearest grid boundary, half up.
///
/// The grid is anchored at the configured day start on `raw`'s local date, so
/// every result is a whole number of grid steps from that day's start.
pub fn snap_to_grid(raw: DateTime<Utc>, config: &SchedulerConfig) -> DateTime<Utc> {
    let anchor = config.day_anchor(config.local_date_of(raw));
    let grid_ms = i64::from(config.grid_minutes.max(1)) * 60_000;
    let offset_ms = (raw - anchor).num_milliseconds();
    let steps = (offset_ms + grid_ms / 2).div_euclid(grid_ms);
    anchor + Duration::milliseconds(steps * grid_ms)
}

/// Move one subtask to the snapped drop time and re-detect conflicts.
pub fn place_subtask(
    tasks: &[Task],
    subtask_id: &str,
    raw_drop_time: DateTime<Utc>,
    config: &SchedulerConfig,
) -> Result<PlacementOutcome> {
    let loc = locate_subtask(tasks, subtask_id)?;
    if tasks[loc.task_index].subtasks[loc.subtask_index].completed {
        return Err(ValidationError::CompletedSubtask(subtask_id.to_string()).into());
    }

    let snapped_start = snap_to_grid(raw_drop_time, config);
    let mut updated = tasks.to_vec();
    updated[loc.task_index].subtasks[loc.subtask_index].scheduled_start_time = Some(snapped_start);

    let conflicts = detect_conflicts(&updated);
    info!(
        subtask_id,
        raw = %raw_drop_time,
        snapped = %snapped_start,
        conflicts = conflicts.pairs.len(),
        "placed subtask"
    );

    Ok(PlacementOutcome {
        tasks: updated,
        subtask_id: subtask_id.to_string(),
        snapped_start,
        conflicts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, NotFoundError};
    use crate::task::SubTask;

    fn at(hms: &str) -> DateTime<Utc> {
        format!("2024-03-01T{hms}Z").parse().unwrap()
    }

    fn tasks() -> Vec<Task> {
        let mut t1 = Task::new("t1", "One", at("07:00:00"));
        t1.subtasks = vec![
            SubTask::new("a", "A").scheduled_at(at("09:00:00")),
            SubTask::new("b", "B").scheduled_at(at("09:30:00")),
        ];
        let mut t2 = Task::new("t2", "Two", at("07:00:00"));
        t2.subtasks = vec![SubTask::new("c", "C").scheduled_at(at("14:00:00"))];
        vec![t1, t2]
    }

    #[test]
    fn snaps_to_nearest_quarter_hour() {
        let config = SchedulerConfig::default();
        assert_eq!(snap_to_grid(at("10:07:00"), &config), at("10:00:00"));
        assert_eq!(snap_to_grid(at("10:07:30"), &config), at("10:15:00"));
        assert_eq!(snap_to_grid(at("10:08:00"), &config), at("10:15:00"));
        assert_eq!(snap_to_grid(at("10:15:00"), &config), at("10:15:00"));
    }

    #[test]
    fn snaps_before_day_start_and_under_offset() {
        let config = SchedulerConfig::default();
        assert_eq!(snap_to_grid(at("07:52:00"), &config), at("07:45:00"));

        let shifted = SchedulerConfig {
            day_start: chrono::NaiveTime::from_hms_opt(8, 10, 0).unwrap(),
            ..SchedulerConfig::default()
        };
        assert_eq!(snap_to_grid(at("08:20:00"), &shifted), at("08:25:00"));
    }

    #[test]
    fn places_one_subtask_without_cascading() {
        let out = place_subtask(&tasks(), "a", at("09:37:00"), &SchedulerConfig::default()).unwrap();
        assert_eq!(out.snapped_start, at("09:45:00"));
        assert_eq!(out.tasks[0].subtasks[0].scheduled_start_time, Some(at("09:45:00")));
        assert_eq!(out.tasks[0].subtasks[1].scheduled_start_time, Some(at("09:30:00")));
        assert!(out.conflicts.is_conflicting("a"));
        assert!(out.conflicts.is_conflicting("b"));
    }

    #[test]
    fn overlap_with_other_task_is_flagged_not_rejected() {
        let out = place_subtask(&tasks(), "a", at("14:05:00"), &SchedulerConfig::default()).unwrap();
        assert_eq!(out.snapped_start, at("14:00:00"));
        assert_eq!(out.conflicts.cross_task_blockers("t1"), vec!["c".to_string()]);
    }

    #[test]
    fn unknown_and_completed_subtasks_are_errors() {
        let config = SchedulerConfig::default();
        let err = place_subtask(&tasks(), "zz", at("10:00:00"), &config).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(NotFoundError::Subtask(_))));

        let mut done = tasks();
        done[0].subtasks[0].completed = true;
        let err = place_subtask(&done, "a", at("10:00:00"), &config).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::CompletedSubtask(_))));
    }
}
