use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use timebox_core::Task;

use crate::snapshot::SnapshotArgs;

#[derive(Args)]
pub struct CompleteArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,
    /// Subtask whose work just ended
    #[arg(long)]
    pub subtask: String,
    /// Actual work end (RFC 3339); defaults to now
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct CompleteOutput<'a> {
    subtask_id: &'a str,
    actual_end: DateTime<Utc>,
    moved: &'a [String],
    tasks: &'a [Task],
}

pub fn run(args: CompleteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = args.snapshot.load()?;
    let actual_end = args.at.unwrap_or_else(Utc::now);
    let outcome = super::scheduler()?.apply_completion(&tasks, &args.subtask, actual_end)?;

    args.snapshot.commit(&outcome.tasks)?;
    super::print_json(&CompleteOutput {
        subtask_id: &args.subtask,
        actual_end,
        moved: &outcome.moved,
        tasks: &outcome.tasks,
    })
}
