use clap::Args;
use serde::Serialize;
use timebox_core::{ConflictReport, Task};

use crate::snapshot::SnapshotArgs;

#[derive(Args)]
pub struct ChainArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,
    /// Task whose subtasks are cascaded
    #[arg(long)]
    pub task: String,
}

#[derive(Serialize)]
struct ChainOutput<'a> {
    task_id: &'a str,
    moved: &'a [String],
    conflicts: &'a ConflictReport,
    tasks: &'a [Task],
}

pub fn run(args: ChainArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = args.snapshot.load()?;
    let report = super::scheduler()?.resolve_chain(&tasks, &args.task)?;

    args.snapshot.commit(&report.tasks)?;
    super::print_json(&ChainOutput {
        task_id: &report.task_id,
        moved: &report.moved,
        conflicts: &report.conflicts,
        tasks: &report.tasks,
    })
}
