//! Command line front end: `solve` writes predictions, `eval` replays training data.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::bench::arc::{solve_many, solve_many_parallel};
use crate::bench::runner::evaluate_on_training;
use crate::core::{SolverConfig, DEFAULT_TIME_BUDGET_SECS};
use crate::perception::grid::{load_tasks, write_predictions};

/// Few-shot grid rule induction by operator search and exact verification
#[derive(Parser)]
#[command(name = "arc-sieve")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict an output grid for every test input and write them as JSON
    Solve {
        /// Task collection (JSON array or one task per line)
        #[arg(long)]
        test_json: PathBuf,

        /// Where to write the predictions
        #[arg(long, default_value = "submission.json")]
        out: PathBuf,

        #[command(flatten)]
        budget: BudgetArgs,

        /// Solve tasks concurrently
        #[arg(long)]
        parallel: bool,
    },
    /// Re-solve training pairs as held-out inputs and report proxy accuracy
    Eval {
        /// Task collection with training pairs
        #[arg(long)]
        train_json: PathBuf,

        #[command(flatten)]
        budget: BudgetArgs,

        /// Print one line per task
        #[arg(long)]
        detail: bool,
    },
}

#[derive(clap::Args)]
pub struct BudgetArgs {
    /// Wall-clock budget per task, in seconds
    #[arg(long, default_value_t = DEFAULT_TIME_BUDGET_SECS)]
    max_time_per_task: f64,

    /// 1 to also try two-operator compositions, 0 for single operators only
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=1))]
    use_compositions: u8,
}

impl BudgetArgs {
    fn config(&self) -> anyhow::Result<SolverConfig> {
        SolverConfig::new(self.max_time_per_task, self.use_compositions == 1)
            .context("invalid --max-time-per-task")
    }
}

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);
    // A second init in the same process is a no-op.
    let _ = Registry::default().with(filter).with(fmt_layer).try_init();
}

pub fn run() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Solve { test_json, out, budget, parallel } => {
            let config = budget.config()?;
            let tasks = load_tasks(&test_json)?;
            let preds = if parallel {
                solve_many_parallel(&tasks, &config)?
            } else {
                solve_many(&tasks, &config)?
            };
            write_predictions(&out, &preds)?;
            println!("Wrote: {}", out.display());
        }
        Commands::Eval { train_json, budget, detail } => {
            let config = budget.config()?;
            let tasks = load_tasks(&train_json)?;
            let report = evaluate_on_training(&tasks, &config)?;
            if detail {
                report.print_detail();
            } else {
                report.print_summary();
            }
        }
    }
    Ok(())
}
