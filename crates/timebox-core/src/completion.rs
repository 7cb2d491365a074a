//! Re-sequencing of the global timeline after a subtask's work actually ends.
//!
//! Unlike the chain cascade this walks every task's subtasks in time order and
//! overwrites each downstream start unconditionally: the actual end time is a
//! fact about elapsed time, not a tentative edit.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::NotFoundError;
use crate::interval::Interval;
use crate::task::{locate_subtask, SubtaskLocation, Task};

/// Result of applying a completion event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub tasks: Vec<Task>,
    /// Ids of downstream subtasks whose start changed, in timeline order
    pub moved: Vec<String>,
}

struct Entry {
    loc: SubtaskLocation,
    start: i64,
}

/// Shift everything scheduled after `subtask_id` to follow its actual work end.
///
/// The finished subtask itself is not modified; callers record completion.
/// When it was never scheduled, the downstream set is every subtask starting
/// at or after its implied start (`actual_work_end - duration`).
pub fn apply_completion(
    tasks: &[Task],
    subtask_id: &str,
    actual_work_end: DateTime<Utc>,
) -> Result<CompletionOutcome, NotFoundError> {
    let finished_loc = locate_subtask(tasks, subtask_id)?;
    let finished = &tasks[finished_loc.task_index].subtasks[finished_loc.subtask_index];

    let end_minute = Interval::minute_of(actual_work_end);
    let mut last_activity_end = end_minute + i64::from(finished.break_minutes);

    let mut timeline: Vec<Entry> = Vec::new();
    for (task_index, task) in tasks.iter().enumerate() {
        for (subtask_index, subtask) in task.subtasks.iter().enumerate() {
            let loc = SubtaskLocation {
                task_index,
                subtask_index,
            };
            if loc != finished_loc && subtask.completed {
                continue;
            }
            if let Some(work) = subtask.work_interval() {
                timeline.push(Entry {
                    loc,
                    start: work.start,
                });
            }
        }
    }
    // Stable: equal starts keep snapshot order.
    timeline.sort_by_key(|e| e.start);

    let downstream: Vec<&Entry> = match timeline.iter().position(|e| e.loc == finished_loc) {
        Some(pos) => timeline[pos + 1..].iter().collect(),
        None => {
            let implied_start = end_minute - i64::from(finished.duration_minutes);
            timeline.iter().filter(|e| e.start >= implied_start).collect()
        }
    };

    let mut updated = tasks.to_vec();
    let mut moved = Vec::new();

    for entry in downstream {
        let subtask = &mut updated[entry.loc.task_index].subtasks[entry.loc.subtask_index];
        if entry.start != last_activity_end {
            debug!(
                subtask_id = %subtask.id,
                from = ?subtask.scheduled_start_time,
                to = %Interval::instant_at(last_activity_end),
                "rescheduling after completion"
            );
            subtask.set_start_minute(last_activity_end);
            moved.push(subtask.id.clone());
        }
        last_activity_end += i64::from(subtask.duration_minutes) + i64::from(subtask.break_minutes);
    }

    info!(
        subtask_id,
        actual_work_end = %actual_work_end,
        moved = moved.len(),
        "applied completion"
    );

    Ok(CompletionOutcome {
        tasks: updated,
        moved,
    })
}
