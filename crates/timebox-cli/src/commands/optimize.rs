use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use serde::Serialize;
use timebox_core::{PlacedSubtask, Task};

use crate::snapshot::SnapshotArgs;

#[derive(Args)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,
    /// Local day to plan (YYYY-MM-DD)
    #[arg(long)]
    pub day: NaiveDate,
}

#[derive(Serialize)]
struct GapOutput {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    minutes: i64,
}

#[derive(Serialize)]
struct OptimizeOutput<'a> {
    day: NaiveDate,
    gaps: Vec<GapOutput>,
    placed: &'a [PlacedSubtask],
    unplaced: &'a [String],
    tasks: &'a [Task],
}

pub fn run(args: OptimizeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = args.snapshot.load()?;
    let plan = super::scheduler()?.optimize_day(&tasks, args.day);

    args.snapshot.commit(&plan.tasks)?;
    super::print_json(&OptimizeOutput {
        day: args.day,
        gaps: plan
            .gaps
            .iter()
            .map(|g| GapOutput {
                start: g.start_time(),
                end: g.end_time(),
                minutes: g.duration_minutes(),
            })
            .collect(),
        placed: &plan.placed,
        unplaced: &plan.unplaced,
        tasks: &plan.tasks,
    })
}
