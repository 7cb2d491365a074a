pub mod chain;
pub mod complete;
pub mod config;
pub mod conflicts;
pub mod edit;
pub mod optimize;
pub mod place;

use timebox_core::{Config, Scheduler};

/// Scheduler built from the user's config file.
pub fn scheduler() -> Result<Scheduler, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    Ok(Scheduler::with_config(config.scheduler_config()?))
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
