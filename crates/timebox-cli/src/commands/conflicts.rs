use clap::Args;
use std::path::PathBuf;

use crate::snapshot;

#[derive(Args)]
pub struct ConflictsArgs {
    /// Task-set snapshot (JSON array of tasks)
    #[arg(long, short)]
    pub file: PathBuf,
}

pub fn run(args: ConflictsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = snapshot::load(&args.file)?;
    let report = super::scheduler()?.detect_conflicts(&tasks);
    super::print_json(&report)
}
