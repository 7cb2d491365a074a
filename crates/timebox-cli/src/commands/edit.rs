use clap::Args;
use serde::Serialize;
use timebox_core::{ConflictReport, EditForm, SubtaskEdit, Task};

use crate::snapshot::SnapshotArgs;

/// Form fields are passed through as typed; validation happens in the core.
#[derive(Args)]
pub struct EditArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,
    /// Task owning the subtask
    #[arg(long)]
    pub task: String,
    /// Subtask to edit
    #[arg(long)]
    pub subtask: String,
    /// New description
    #[arg(long)]
    pub text: Option<String>,
    /// Work duration in minutes
    #[arg(long)]
    pub duration: Option<String>,
    /// Break after work in minutes
    #[arg(long = "break")]
    pub break_minutes: Option<String>,
    /// Local start date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
    /// Local start time (HH:MM)
    #[arg(long)]
    pub time: Option<String>,
}

#[derive(Serialize)]
struct EditOutput<'a> {
    subtask_id: &'a str,
    moved: &'a [String],
    conflicts: &'a ConflictReport,
    tasks: &'a [Task],
}

pub fn run(args: EditArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = args.snapshot.load()?;
    let scheduler = super::scheduler()?;

    let form = EditForm {
        text: args.text,
        duration: args.duration,
        break_minutes: args.break_minutes,
        date: args.date,
        time: args.time,
    };
    let edit = SubtaskEdit::from_form(&form, scheduler.config())?;
    let report = scheduler.submit_edit(&tasks, &args.task, &args.subtask, &edit)?;

    args.snapshot.commit(&report.tasks)?;
    super::print_json(&EditOutput {
        subtask_id: &args.subtask,
        moved: &report.moved,
        conflicts: &report.conflicts,
        tasks: &report.tasks,
    })
}
