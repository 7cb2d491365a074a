use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use timebox_core::{ConflictReport, Task};

use crate::snapshot::SnapshotArgs;

#[derive(Args)]
pub struct PlaceArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,
    /// Subtask being dropped
    #[arg(long)]
    pub subtask: String,
    /// Raw drop time (RFC 3339)
    #[arg(long)]
    pub at: DateTime<Utc>,
}

#[derive(Serialize)]
struct PlaceOutput<'a> {
    subtask_id: &'a str,
    snapped_start: DateTime<Utc>,
    conflicts: &'a ConflictReport,
    tasks: &'a [Task],
}

pub fn run(args: PlaceArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = args.snapshot.load()?;
    let outcome = super::scheduler()?.place_subtask(&tasks, &args.subtask, args.at)?;

    args.snapshot.commit(&outcome.tasks)?;
    super::print_json(&PlaceOutput {
        subtask_id: &outcome.subtask_id,
        snapped_start: outcome.snapped_start,
        conflicts: &outcome.conflicts,
        tasks: &outcome.tasks,
    })
}
