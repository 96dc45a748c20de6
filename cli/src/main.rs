//! qnet command line runner
//!
//! Loads a network description, runs it and prints the occupancy report.
//!
//! # Example
//!
//! ```bash
//! # Single run with the seed from the file
//! qnet configs/tandem.properties
//!
//! # Thirty independent replications, summary as JSON
//! qnet configs/feedback.json --replications 30 --json
//! ```

mod loader;
mod report;

use anyhow::{bail, Context};
use clap::Parser;
use qnet_core::{
    derive_seeds, replicate, NetworkConfig, ReplicationSummary, Simulation, SimulationReport,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Open queueing network simulator
///
/// Runs a discrete-event simulation of the network described in CONFIG.
/// Output is reproducible for a given seed.
#[derive(Parser, Debug)]
#[command(name = "qnet")]
#[command(version, about, long_about = None)]
struct Args {
    /// Network description (`.json` or properties format)
    config: PathBuf,

    /// Override the generator seed from the file
    #[arg(long, conflicts_with = "random_seed")]
    seed: Option<u64>,

    /// Use a random seed instead of the configured one
    #[arg(long)]
    random_seed: bool,

    /// Stop the clock at this simulated time
    #[arg(long)]
    horizon: Option<f64>,

    /// Maximum number of random draws
    #[arg(short = 'b', long)]
    draw_budget: Option<u64>,

    /// Number of independent replications
    #[arg(short = 'r', long, default_value = "1")]
    replications: usize,

    /// Emit JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct ReplicationOutput<'a> {
    summary: &'a ReplicationSummary,
    runs: &'a [SimulationReport],
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,qnet_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = loader::load_file(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let config = apply_overrides(config, &args);
    config.validate().context("invalid network after overrides")?;

    if args.replications == 0 {
        bail!("--replications must be at least 1");
    }

    let rendered = if args.replications > 1 {
        let seeds = derive_seeds(config.seed, args.replications);
        let reports = replicate(&config, &seeds)?;
        let summary = ReplicationSummary::from_reports(&reports);
        debug!(
            replications = summary.replications,
            mean_time = summary.final_time.mean,
            "Replications finished"
        );
        if args.json {
            serde_json::to_string_pretty(&ReplicationOutput {
                summary: &summary,
                runs: &reports,
            })?
        } else {
            report::render_summary(&summary)
        }
    } else {
        let report = Simulation::new(&config)?.run()?;
        if args.json {
            report.to_json()?
        } else {
            report::render_text(&report)
        }
    };

    match &args.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{}", rendered),
    }
    Ok(())
}

fn apply_overrides(mut config: NetworkConfig, args: &Args) -> NetworkConfig {
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    } else if args.random_seed {
        config = config.with_seed(rand::random());
    }
    if let Some(horizon) = args.horizon {
        config = config.with_horizon(horizon);
    }
    if let Some(budget) = args.draw_budget {
        config = config.with_draw_budget(budget);
    }
    debug!(
        seed = config.seed,
        horizon = ?config.horizon,
        draw_budget = ?config.draw_budget,
        queues = config.queues.len(),
        "Configuration ready"
    );
    config
}
