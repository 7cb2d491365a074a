//! Task and subtask types consumed by the scheduler.
//!
//! A [`Task`] owns an ordered chain of [`SubTask`]s. The scheduler only ever
//! rewrites `scheduled_start_time`; every other field is owned by the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{NotFoundError, ValidationError};
use crate::interval::Interval;

/// Default work duration for a new subtask.
pub const DEFAULT_DURATION_MINUTES: u32 = 25;

/// Task priority as set by the user or the priority advisor.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(ValidationError::InvalidValue {
                field: "priority".into(),
                message: format!("unknown priority '{other}'"),
            }),
        }
    }
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

/// A time-boxed unit of work inside a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTask {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub break_minutes: u32,
    #[serde(default)]
    pub scheduled_start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actual_end_time: Option<DateTime<Utc>>,
}

impl SubTask {
    /// Create an unscheduled subtask with default duration and no break.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            break_minutes: 0,
            scheduled_start_time: None,
            actual_end_time: None,
        }
    }

    /// Set work and break durations
    pub fn with_durations(mut self, duration_minutes: u32, break_minutes: u32) -> Self {
        self.duration_minutes = duration_minutes;
        self.break_minutes = break_minutes;
        self
    }

    /// Set the scheduled start
    pub fn scheduled_at(mut self, start: DateTime<Utc>) -> Self {
        self.scheduled_start_time = Some(start);
        self
    }

    /// Mark as completed at the given actual end
    pub fn completed_at(mut self, actual_end: DateTime<Utc>) -> Self {
        self.completed = true;
        self.actual_end_time = Some(actual_end);
        self
    }

    /// `[start, start + duration)`, or `None` when unscheduled.
    pub fn work_interval(&self) -> Option<Interval> {
        Interval::work(self)
    }

    /// `[start, start + duration + break)`, or `None` when unscheduled.
    pub fn activity_interval(&self) -> Option<Interval> {
        Interval::activity(self)
    }

    /// Scheduled and positive duration.
    pub fn is_scheduled(&self) -> bool {
        self.work_interval().is_some()
    }

    pub(crate) fn set_start_minute(&mut self, minute: i64) {
        self.scheduled_start_time = Some(Interval::instant_at(minute));
    }
}

/// A user goal broken into an ordered chain of subtasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub subtasks: Vec<SubTask>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            priority: Priority::default(),
            completed: false,
            subtasks: Vec::new(),
            created_at,
            updated_at: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_subtask(mut self, subtask: SubTask) -> Self {
        self.subtasks.push(subtask);
        self
    }

    pub fn subtask(&self, subtask_id: &str) -> Option<&SubTask> {
        self.subtasks.iter().find(|s| s.id == subtask_id)
    }

    pub fn subtask_mut(&mut self, subtask_id: &str) -> Option<&mut SubTask> {
        self.subtasks.iter_mut().find(|s| s.id == subtask_id)
    }
}

/// Position of a subtask inside a task-set snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubtaskLocation {
    pub task_index: usize,
    pub subtask_index: usize,
}

/// Find a subtask by id across the whole snapshot.
pub fn locate_subtask(tasks: &[Task], subtask_id: &str) -> Result<SubtaskLocation, NotFoundError> {
    tasks
        .iter()
        .enumerate()
        .find_map(|(task_index, task)| {
            task.subtasks
                .iter()
                .position(|s| s.id == subtask_id)
                .map(|subtask_index| SubtaskLocation {
                    task_index,
                    subtask_index,
                })
        })
        .ok_or_else(|| NotFoundError::Subtask(subtask_id.to_string()))
}

/// Find a task by id.
pub fn locate_task(tasks: &[Task], task_id: &str) -> Result<usize, NotFoundError> {
    tasks
        .iter()
        .position(|t| t.id == task_id)
        .ok_or_else(|| NotFoundError::Task(task_id.to_string()))
}
