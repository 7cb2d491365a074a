//! # Timebox Core Library
//!
//! This library provides the subtask timeline scheduler behind Timebox. Tasks
//! are broken into ordered, time-boxed subtasks; the scheduler assigns start
//! times, flags overlaps, and re-derives times as work runs long or short.
//!
//! ## Architecture
//!
//! Every operation is a pure function from a task-set snapshot plus an intent
//! to a new snapshot plus conflict information. Nothing performs I/O; callers
//! own storage and serialize concurrent writes.
//!
//! ## Key Components
//!
//! - [`interval`]: integer-minute work and activity intervals
//! - [`conflict`]: sweep-based overlap detection
//! - [`chain`]: per-task forward cascade in list order
//! - [`completion`]: global re-sequencing after an actual work end
//! - [`placement`]: grid-snapped drag-and-drop of one subtask
//! - [`Scheduler`]: facade holding [`SchedulerConfig`], including day optimization
//! - [`Config`]: TOML configuration management

pub mod chain;
pub mod completion;
pub mod conflict;
pub mod edit;
pub mod error;
pub mod interval;
pub mod placement;
pub mod scheduler;
pub mod storage;
pub mod task;
pub mod timeline;

pub use chain::{resolve_chain, ChainResolution};
pub use completion::{apply_completion, CompletionOutcome};
pub use conflict::{detect_conflicts, ConflictMember, ConflictPair, ConflictReport};
pub use edit::{EditForm, StartEdit, SubtaskEdit};
pub use error::{ConfigError, ConflictError, CoreError, NotFoundError, ValidationError};
pub use interval::{activity_interval, work_interval, Interval};
pub use placement::{place_subtask, snap_to_grid, PlacementOutcome};
pub use scheduler::{optimize_day, ChainReport, DayPlan, PlacedSubtask, Scheduler, SchedulerConfig};
pub use storage::Config;
pub use task::{Priority, SubTask, Task};
pub use timeline::{TimeGap, TimeGapDetector};
