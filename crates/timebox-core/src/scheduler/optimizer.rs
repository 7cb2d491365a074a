//! First-fit day planning for unscheduled subtasks.
//!
//! Scheduled subtasks are immovable busy blocks. Unscheduled ones are taken in
//! priority order and dropped into the earliest free gap that holds their full
//! activity duration. This is deterministic first-fit, not optimal packing.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::SchedulerConfig;
use crate::interval::Interval;
use crate::task::{SubTask, Task};
use crate::timeline::{TimeGap, TimeGapDetector};

/// A subtask the optimizer scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedSubtask {
    pub task_id: String,
    pub subtask_id: String,
    pub start_time: DateTime<Utc>,
}

/// Result of planning a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPlan {
    pub tasks: Vec<Task>,
    /// Placements in the order they were made
    pub placed: Vec<PlacedSubtask>,
    /// Pool subtasks that fit no remaining gap
    pub unplaced: Vec<String>,
    /// Free gaps before any placement
    pub gaps: Vec<TimeGap>,
}

/// Fill the free gaps of `day` with unscheduled, not-completed subtasks.
///
/// Tasks are visited by priority (high first), then creation time, then
/// snapshot order; subtasks in list order. A placement never starts before an
/// earlier sibling's activity end nor ends after a later scheduled sibling's
/// start. Once a subtask of a task fails to fit, the task's remaining pool
/// subtasks stay unscheduled so the chain order is never inverted.
pub fn optimize_day(tasks: &[Task], day: NaiveDate, config: &SchedulerConfig) -> DayPlan {
    let window = config.day_window(day);

    let busy: Vec<Interval> = tasks
        .iter()
        .flat_map(|t| t.subtasks.iter())
        .filter_map(SubTask::activity_interval)
        .filter(|a| a.overlaps(&window))
        .collect();

    let initial_gaps = TimeGapDetector::new()
        .with_min_gap(i64::from(config.min_gap_minutes))
        .find_gaps(&busy, window);
    let mut gaps = initial_gaps.clone();

    let mut order: Vec<usize> = (0..tasks.len()).collect();
    order.sort_by(|&a, &b| {
        tasks[b]
            .priority
            .cmp(&tasks[a].priority)
            .then_with(|| tasks[a].created_at.cmp(&tasks[b].created_at))
            .then_with(|| a.cmp(&b))
    });

    let mut updated = tasks.to_vec();
    let mut placed = Vec::new();
    let mut unplaced = Vec::new();

    for task_index in order {
        let mut blocked = false;

        for subtask_index in 0..updated[task_index].subtasks.len() {
            let task = &updated[task_index];
            let subtask = &task.subtasks[subtask_index];
            if !in_pool(subtask) {
                continue;
            }
            if blocked {
                unplaced.push(subtask.id.clone());
                continue;
            }

            let floor = task.subtasks[..subtask_index]
                .iter()
                .filter_map(SubTask::activity_interval)
                .map(|a| a.end)
                .max()
                .unwrap_or(i64::MIN);
            let ceiling = task.subtasks[subtask_index + 1..]
                .iter()
                .filter_map(SubTask::activity_interval)
                .map(|a| a.start)
                .min()
                .unwrap_or(i64::MAX);
            let needed = i64::from(subtask.duration_minutes) + i64::from(subtask.break_minutes);

            match first_fit(&gaps, floor, ceiling, needed) {
                Some((gap_index, start)) => {
                    let used = Interval {
                        start,
                        end: start + needed,
                    };
                    let (before, after) = gaps[gap_index].split_around(used);
                    gaps.splice(gap_index..=gap_index, before.into_iter().chain(after));

                    let task_id = task.id.clone();
                    let subtask = &mut updated[task_index].subtasks[subtask_index];
                    subtask.set_start_minute(start);
                    debug!(
                        task_id = %task_id,
                        subtask_id = %subtask.id,
                        start = %used.start_time(),
                        "placed unscheduled subtask"
                    );
                    placed.push(PlacedSubtask {
                        task_id,
                        subtask_id: subtask.id.clone(),
                        start_time: used.start_time(),
                    });
                }
                None => {
                    blocked = true;
                    unplaced.push(subtask.id.clone());
                }
            }
        }
    }

    info!(
        day = %day,
        gaps = initial_gaps.len(),
        placed = placed.len(),
        unplaced = unplaced.len(),
        "optimized day"
    );

    DayPlan {
        tasks: updated,
        placed,
        unplaced,
        gaps: initial_gaps,
    }
}

fn in_pool(subtask: &SubTask) -> bool {
    !subtask.completed && subtask.scheduled_start_time.is_none() && subtask.duration_minutes > 0
}

fn first_fit(gaps: &[TimeGap], floor: i64, ceiling: i64, needed: i64) -> Option<(usize, i64)> {
    gaps.iter().enumerate().find_map(|(idx, gap)| {
        let start = gap.start.max(floor);
        (gap.can_fit_from(floor, needed) && start + needed <= ceiling).then_some((idx, start))
    })
}
