//! Drape command-line driver.

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;

#[derive(Parser)]
#[command(name = "drape")]
#[command(version, about = "Position-based garment simulation")]
struct Cli {
    /// Logging verbosity level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from a config file.
    Simulate {
        /// Path to run config (TOML).
        #[arg(short, long, default_value = "run.toml")]
        config: String,

        /// Write the final garment state to this snapshot file.
        #[arg(short, long)]
        snapshot: Option<String>,
    },

    /// Run benchmark suite.
    Benchmark {
        /// Which scenario to run (hanging_sheet, sphere_drape, all).
        #[arg(short, long, default_value = "all")]
        scenario: String,

        /// Output CSV file path.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Inspect a state snapshot file.
    Inspect {
        /// Path to snapshot file.
        path: String,
    },

    /// Validate a run config (.toml) or mesh (.json).
    Validate {
        /// Path to mesh or config file.
        path: String,
    },

    /// Dump the active collision voxels after one tick as JSON line segments.
    Voxels {
        /// Scenario with a collision body.
        #[arg(short, long, default_value = "sphere_drape")]
        scenario: String,

        /// Output JSON file path.
        #[arg(short, long, default_value = "voxels.json")]
        output: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: could not install logger: {e}");
    }

    let result = match cli.command {
        Commands::Simulate { config, snapshot } => commands::simulate(&config, snapshot.as_deref()),
        Commands::Benchmark { scenario, output } => commands::benchmark(&scenario, output.as_deref()),
        Commands::Inspect { path } => commands::inspect(&path),
        Commands::Validate { path } => commands::validate(&path),
        Commands::Voxels { scenario, output } => commands::voxels(&scenario, &output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
