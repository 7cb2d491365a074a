//! Work-interval overlap detection across a task set.
//!
//! Only scheduled, not-completed subtasks take part. Results are annotations
//! for display; nothing here mutates the snapshot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::interval::Interval;
use crate::task::Task;

/// One side of a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictMember {
    pub task_id: String,
    pub subtask_id: String,
}

/// Two subtasks whose work intervals overlap. `first` starts no later than `second`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictPair {
    pub first: ConflictMember,
    pub second: ConflictMember,
}

impl ConflictPair {
    pub fn is_cross_task(&self) -> bool {
        self.first.task_id != self.second.task_id
    }

    pub fn involves(&self, subtask_id: &str) -> bool {
        self.first.subtask_id == subtask_id || self.second.subtask_id == subtask_id
    }

    /// The member opposite `subtask_id`, if it is part of this pair.
    pub fn other(&self, subtask_id: &str) -> Option<&ConflictMember> {
        if self.first.subtask_id == subtask_id {
            Some(&self.second)
        } else if self.second.subtask_id == subtask_id {
            Some(&self.first)
        } else {
            None
        }
    }
}

/// Conflict flags for a task set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    /// Every subtask id that overlaps at least one other subtask
    pub conflicting: BTreeSet<String>,
    /// Each overlapping pair, in sweep order
    pub pairs: Vec<ConflictPair>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn is_conflicting(&self, subtask_id: &str) -> bool {
        self.conflicting.contains(subtask_id)
    }

    /// Ids of every subtask overlapping `subtask_id`.
    pub fn conflicts_of(&self, subtask_id: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter_map(|p| p.other(subtask_id))
            .map(|m| m.subtask_id.as_str())
            .collect()
    }

    /// Subtasks of other tasks that overlap a subtask of `task_id`.
    pub fn cross_task_blockers(&self, task_id: &str) -> Vec<String> {
        let mut blockers = BTreeSet::new();
        for pair in self.pairs.iter().filter(|p| p.is_cross_task()) {
            if pair.first.task_id == task_id {
                blockers.insert(pair.second.subtask_id.clone());
            } else if pair.second.task_id == task_id {
                blockers.insert(pair.first.subtask_id.clone());
            }
        }
        blockers.into_iter().collect()
    }
}

struct Slot<'a> {
    task_id: &'a str,
    subtask_id: &'a str,
    work: Interval,
}

/// Detect every pairwise work-interval overlap in the task set.
pub fn detect_conflicts(tasks: &[Task]) -> ConflictReport {
    let slots: Vec<Slot<'_>> = tasks
        .iter()
        .flat_map(|task| {
            task.subtasks
                .iter()
                .filter(|s| !s.completed)
                .filter_map(move |s| {
                    s.work_interval().map(|work| Slot {
                        task_id: &task.id,
                        subtask_id: &s.id,
                        work,
                    })
                })
        })
        .collect();

    sweep(slots)
}

// Sorted sweep that keeps every still-open interval, so each overlapping pair
// is reported exactly once without comparing disjoint intervals.
fn sweep(mut slots: Vec<Slot<'_>>) -> ConflictReport {
    slots.sort_by_key(|s| (s.work.start, s.work.end));

    let mut report = ConflictReport::default();
    let mut open: Vec<usize> = Vec::new();

    for (idx, slot) in slots.iter().enumerate() {
        open.retain(|&o| slots[o].work.end > slot.work.start);

        for &o in &open {
            let earlier = &slots[o];
            report.conflicting.insert(earlier.subtask_id.to_string());
            report.conflicting.insert(slot.subtask_id.to_string());
            report.pairs.push(ConflictPair {
                first: ConflictMember {
                    task_id: earlier.task_id.to_string(),
                    subtask_id: earlier.subtask_id.to_string(),
                },
                second: ConflictMember {
                    task_id: slot.task_id.to_string(),
                    subtask_id: slot.subtask_id.to_string(),
                },
            });
        }

        open.push(idx);
    }

    report
}
