//! Per-task forward cascade in list order.
//!
//! A chain is the subtasks of one task in the order the user authored them.
//! Each subtask must start no earlier than its predecessor's activity end; a
//! later manual start is kept, so gaps survive and only overlap is removed.

use tracing::debug;

use crate::interval::Interval;
use crate::task::{SubTask, Task};

/// Result of resolving one chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainResolution {
    pub task: Task,
    /// Ids of subtasks whose start was assigned or pushed forward
    pub moved: Vec<String>,
}

/// Resolve a task's chain, returning the updated task and the moved ids.
pub fn resolve_chain(task: &Task) -> ChainResolution {
    let mut task = task.clone();
    let moved = resolve_chain_in_place(&mut task);
    ChainResolution { task, moved }
}

/// Single forward pass over `task.subtasks`; returns the ids it moved.
///
/// Completed subtasks are never moved. Their end is `actual_end_time` plus
/// break when recorded, else their scheduled activity end; the baseline only
/// ever moves forward, so an early finish cannot pull later subtasks back
/// under a still-open predecessor. Subtasks
/// without an interval (zero duration) are skipped and do not reset the
/// baseline. Leading subtasks before the first baseline are left as-is.
pub fn resolve_chain_in_place(task: &mut Task) -> Vec<String> {
    let mut moved = Vec::new();
    let mut baseline: Option<i64> = None;

    for subtask in task.subtasks.iter_mut() {
        if subtask.completed {
            if let Some(end) = completed_activity_end(subtask) {
                baseline = Some(baseline.map_or(end, |b| b.max(end)));
            }
            continue;
        }
        if subtask.duration_minutes == 0 {
            continue;
        }

        if let Some(floor) = baseline {
            let manual = subtask.scheduled_start_time.map(Interval::minute_of);
            match manual {
                Some(start) if start >= floor => {}
                _ => {
                    debug!(
                        task_id = %task.id,
                        subtask_id = %subtask.id,
                        from = ?subtask.scheduled_start_time,
                        to = %Interval::instant_at(floor),
                        "cascading subtask start"
                    );
                    subtask.set_start_minute(floor);
                    moved.push(subtask.id.clone());
                }
            }
        }

        if let Some(activity) = subtask.activity_interval() {
            baseline = Some(activity.end);
        }
    }

    moved
}

fn completed_activity_end(subtask: &SubTask) -> Option<i64> {
    match subtask.actual_end_time {
        Some(actual) => Some(Interval::minute_of(actual) + i64::from(subtask.break_minutes)),
        None => subtask.activity_interval().map(|a| a.end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn at(hm: &str) -> DateTime<Utc> {
        format!("2024-03-01T{hm}:00Z").parse().unwrap()
    }

    fn chain(subtasks: Vec<SubTask>) -> Task {
        let mut task = Task::new("t", "Task", at("07:00"));
        task.subtasks = subtasks;
        task
    }

    fn start_of(task: &Task, idx: usize) -> Option<DateTime<Utc>> {
        task.subtasks[idx].scheduled_start_time
    }

    #[test]
    fn overlapping_successor_moves_to_activity_end() {
        let task = chain(vec![
            SubTask::new("a", "A").with_durations(25, 5).scheduled_at(at("09:00")),
            SubTask::new("b", "B").with_durations(25, 0).scheduled_at(at("09:15")),
        ]);
        let resolved = resolve_chain(&task);
        assert_eq!(start_of(&resolved.task, 1), Some(at("09:30")));
        assert_eq!(resolved.moved, vec!["b".to_string()]);
    }

    #[test]
    fn later_manual_start_keeps_its_gap() {
        let task = chain(vec![
            SubTask::new("a", "A").scheduled_at(at("09:00")),
            SubTask::new("b", "B").scheduled_at(at("11:00")),
        ]);
        let resolved = resolve_chain(&task);
        assert_eq!(start_of(&resolved.task, 1), Some(at("11:00")));
        assert!(resolved.moved.is_empty());
    }

    #[test]
    fn unset_starts_fill_in_back_to_back() {
        let task = chain(vec![
            SubTask::new("a", "A").with_durations(25, 5).scheduled_at(at("09:00")),
            SubTask::new("b", "B").with_durations(25, 5),
            SubTask::new("c", "C").with_durations(50, 0),
        ]);
        let resolved = resolve_chain(&task);
        assert_eq!(start_of(&resolved.task, 1), Some(at("09:30")));
        assert_eq!(start_of(&resolved.task, 2), Some(at("10:00")));
    }

    #[test]
    fn cascade_propagates_through_the_chain() {
        let task = chain(vec![
            SubTask::new("a", "A").with_durations(60, 0).scheduled_at(at("09:00")),
            SubTask::new("b", "B").with_durations(30, 0).scheduled_at(at("09:30")),
            SubTask::new("c", "C").with_durations(30, 0).scheduled_at(at("10:15")),
            SubTask::new("d", "D").with_durations(30, 0).scheduled_at(at("12:00")),
        ]);
        let resolved = resolve_chain(&task);
        assert_eq!(start_of(&resolved.task, 1), Some(at("10:00")));
        assert_eq!(start_of(&resolved.task, 2), Some(at("10:30")));
        assert_eq!(start_of(&resolved.task, 3), Some(at("12:00")));
    }

    #[test]
    fn leading_unscheduled_subtask_stays_unscheduled() {
        let task = chain(vec![
            SubTask::new("a", "A"),
            SubTask::new("b", "B").scheduled_at(at("09:00")),
        ]);
        let resolved = resolve_chain(&task);
        assert_eq!(start_of(&resolved.task, 0), None);
        assert_eq!(start_of(&resolved.task, 1), Some(at("09:00")));
    }

    #[test]
    fn completed_subtask_is_frozen_and_uses_actual_end() {
        let task = chain(vec![
            SubTask::new("a", "A")
                .with_durations(25, 5)
                .scheduled_at(at("09:00"))
                .completed_at(at("09:40")),
            SubTask::new("b", "B").scheduled_at(at("09:30")),
        ]);
        let resolved = resolve_chain(&task);
        assert_eq!(start_of(&resolved.task, 0), Some(at("09:00")));
        assert_eq!(start_of(&resolved.task, 1), Some(at("09:45")));
    }

    #[test]
    fn early_completion_does_not_pull_baseline_back() {
        let task = chain(vec![
            SubTask::new("a", "A").with_durations(60, 0).scheduled_at(at("09:00")),
            SubTask::new("b", "B")
                .with_durations(10, 0)
                .scheduled_at(at("09:30"))
                .completed_at(at("09:40")),
            SubTask::new("c", "C").with_durations(30, 0).scheduled_at(at("09:45")),
        ]);
        let resolved = resolve_chain(&task);
        assert_eq!(start_of(&resolved.task, 1), Some(at("09:30")));
        assert_eq!(start_of(&resolved.task, 2), Some(at("10:00")));
        assert_eq!(resolved.moved, vec!["c".to_string()]);
        assert!(crate::conflict::detect_conflicts(&[resolved.task]).is_empty());
    }

    #[test]
    fn zero_duration_subtask_is_skipped() {
        let task = chain(vec![
            SubTask::new("a", "A").with_durations(30, 0).scheduled_at(at("09:00")),
            SubTask::new("z", "Z").with_durations(0, 0).scheduled_at(at("08:00")),
            SubTask::new("b", "B").with_durations(30, 0).scheduled_at(at("09:10")),
        ]);
        let resolved = resolve_chain(&task);
        assert_eq!(start_of(&resolved.task, 1), Some(at("08:00")));
        assert_eq!(start_of(&resolved.task, 2), Some(at("09:30")));
    }

    #[test]
    fn second_pass_changes_nothing() {
        let task = chain(vec![
            SubTask::new("a", "A").with_durations(25, 5).scheduled_at(at("09:00")),
            SubTask::new("b", "B").scheduled_at(at("09:05")),
            SubTask::new("c", "C"),
        ]);
        let once = resolve_chain(&task);
        let twice = resolve_chain(&once.task);
        assert_eq!(once.task, twice.task);
        assert!(twice.moved.is_empty());
    }
}
