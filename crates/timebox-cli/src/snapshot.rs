//! Task-set snapshot files.
//!
//! The CLI is the caller that owns persistence: it reads a JSON array of
//! tasks, hands it to the scheduler, and writes the result back on request.

use clap::Args;
use std::path::{Path, PathBuf};
use timebox_core::Task;
use tracing::info;

/// Arguments shared by every command that operates on a snapshot.
#[derive(Args)]
pub struct SnapshotArgs {
    /// Task-set snapshot (JSON array of tasks)
    #[arg(long, short)]
    pub file: PathBuf,
    /// Write the updated task set back to the file
    #[arg(long)]
    pub write: bool,
}

impl SnapshotArgs {
    pub fn load(&self) -> Result<Vec<Task>, Box<dyn std::error::Error>> {
        load(&self.file)
    }

    /// Persist `tasks` if `--write` was given.
    pub fn commit(&self, tasks: &[Task]) -> Result<(), Box<dyn std::error::Error>> {
        if self.write {
            store(&self.file, tasks)?;
            info!(path = %self.file.display(), tasks = tasks.len(), "snapshot written");
        }
        Ok(())
    }
}

pub fn load(path: &Path) -> Result<Vec<Task>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let tasks: Vec<Task> = serde_json::from_str(&content)
        .map_err(|e| format!("invalid snapshot {}: {e}", path.display()))?;
    Ok(tasks)
}

pub fn store(path: &Path, tasks: &[Task]) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(tasks)?;
    std::fs::write(path, json)?;
    Ok(())
}
