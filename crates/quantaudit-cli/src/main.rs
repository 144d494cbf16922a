//! CLI for quantaudit — deterministic audits for a toy quantum classifier.

mod commands;
mod ingest;
mod tui;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "quantaudit")]
#[command(about = "quantaudit — train, audit and dashboard toy quantum-state classifiers")]
#[command(version = quantaudit_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full audit pipeline on one task (or all five)
    Audit {
        /// Task to audit: index 0-4 or name (ghz, w, dicke2, cluster, random)
        task: Option<String>,

        /// Audit every task in one seeded pass
        #[arg(long)]
        all: bool,

        /// CSV dataset to gate the audit on (default: the task's ideal sample)
        #[arg(long)]
        dataset: Option<String>,

        /// RNG seed; omit for a fresh OS-random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Training epochs per task
        #[arg(long, default_value = "20")]
        epochs: usize,

        /// Print snapshots as JSON instead of the breakdown table
        #[arg(long)]
        json: bool,

        /// Write snapshots as JSON to a file
        #[arg(long)]
        output: Option<String>,

        /// Record each run as a session directory
        #[arg(long)]
        record: bool,
    },

    /// Stream a simulated training run epoch by epoch
    Train {
        /// Task to train: index 0-4 or name (ghz, w, dicke2, cluster, random)
        task: String,

        /// Epochs to run
        #[arg(long, default_value = "20")]
        epochs: usize,

        /// RNG seed; omit for a fresh OS-random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Delay between epochs in milliseconds
        #[arg(long, default_value = "150")]
        interval_ms: u64,

        /// Record the run as a session directory
        #[arg(long)]
        record: bool,

        /// Manifest tags as key:value pairs (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Session note stored in the manifest
        #[arg(long)]
        note: Option<String>,
    },

    /// Show the ideal basis states and their physics baselines
    Basis {
        /// Task to detail: index 0-4 or name; omit for the overview table
        task: Option<String>,

        /// Print the full amplitude vector (requires a task)
        #[arg(long)]
        amplitudes: bool,

        /// RNG seed for the Haar-random family
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Classify a CSV dataset and run the domain gate on it
    Classify {
        /// Path to the dataset
        file: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the statistical validation battery with pass/fail and p-values
    Validate {
        /// RNG seed; omit for a fresh OS-random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Write a markdown report to a file
        #[arg(long)]
        output: Option<String>,
    },

    /// Live interactive audit dashboard (TUI)
    Dashboard {
        /// Refresh rate in seconds
        #[arg(long, default_value = "0.5")]
        refresh: f64,

        /// RNG seed; omit for a fresh OS-random seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List and inspect recorded sessions
    Sessions {
        /// Path to a specific session directory to inspect
        session: Option<String>,

        /// Directory containing session recordings (default: ./sessions/)
        #[arg(long, default_value = "sessions")]
        dir: String,

        /// Recompute the snapshot digest and compare it to the manifest
        #[arg(long)]
        verify: bool,
    },

    /// Start the audit HTTP server (dashboard JSON API)
    Server {
        /// Port to listen on
        #[arg(long, default_value = "8642")]
        port: u16,

        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Audit {
            task,
            all,
            dataset,
            seed,
            epochs,
            json,
            output,
            record,
        } => commands::audit::run(commands::audit::AuditCommandConfig {
            task: task.as_deref(),
            all,
            dataset: dataset.as_deref(),
            seed,
            epochs,
            json,
            output_path: output.as_deref(),
            record,
        }),
        Commands::Train {
            task,
            epochs,
            seed,
            interval_ms,
            record,
            tags,
            note,
        } => commands::train::run(&task, epochs, seed, interval_ms, record, &tags, note.as_deref()),
        Commands::Basis {
            task,
            amplitudes,
            seed,
        } => commands::basis::run(task.as_deref(), amplitudes, seed),
        Commands::Classify { file, json } => commands::classify::run(&file, json),
        Commands::Validate { seed, output } => commands::validate::run(seed, output.as_deref()),
        Commands::Dashboard { refresh, seed } => commands::dashboard::run(refresh, seed),
        Commands::Sessions {
            session,
            dir,
            verify,
        } => commands::sessions::run(session.as_deref(), &dir, verify),
        Commands::Server { port, host } => commands::server::run(&host, port),
    }
}
