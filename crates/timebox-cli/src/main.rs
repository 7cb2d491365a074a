use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod snapshot;

#[derive(Parser)]
#[command(name = "timebox-cli", version, about = "Timebox CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cascade one task's subtask chain and report conflicts
    Chain(commands::chain::ChainArgs),
    /// Edit a subtask and cascade its chain; rejected on cross-task overlap
    Edit(commands::edit::EditArgs),
    /// Reschedule everything after a subtask's actual work end
    Complete(commands::complete::CompleteArgs),
    /// Drop a subtask on the timeline, snapped to the grid
    Place(commands::place::PlaceArgs),
    /// Fill a day's free gaps with unscheduled subtasks
    Optimize(commands::optimize::OptimizeArgs),
    /// Report overlapping subtasks
    Conflicts(commands::conflicts::ConflictsArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timebox_core=warn,timebox_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Chain(args) => commands::chain::run(args),
        Commands::Edit(args) => commands::edit::run(args),
        Commands::Complete(args) => commands::complete::run(args),
        Commands::Place(args) => commands::place::run(args),
        Commands::Optimize(args) => commands::optimize::run(args),
        Commands::Conflicts(args) => commands::conflicts::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "timebox-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
