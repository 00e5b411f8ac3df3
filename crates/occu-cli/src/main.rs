//! occusim CLI

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod config_io;
mod survey;

#[derive(Parser)]
#[command(name = "occusim")]
#[command(about = "occusim - synthetic multi-species occupancy survey data")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

/// Simulation settings shared by `generate` and `replicates`.
///
/// Without `--config`, flags apply on top of the `config-template` default
/// (covariate 1 fixed, the rest random).
#[derive(Args, Debug, Clone)]
pub struct SimArgs {
    /// Simulation config (JSON if `.json`, YAML otherwise)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of species
    #[arg(long)]
    pub species: Option<usize>,

    /// Number of sites
    #[arg(long)]
    pub sites: Option<usize>,

    /// Number of site covariates
    #[arg(long)]
    pub covariates: Option<usize>,

    /// Repeat surveys per site
    #[arg(long)]
    pub surveys: Option<u64>,

    /// Mark covariate K (1-indexed) as a fixed effect. Repeatable.
    #[arg(long = "fixed", value_name = "K")]
    pub fixed: Vec<usize>,

    /// Mark covariate K (1-indexed) as a random effect. Repeatable.
    #[arg(long = "random", value_name = "K")]
    pub random: Vec<usize>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Emit `{config, data, truth}` instead of the bare data list.
    #[arg(long)]
    pub include_truth: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one synthetic dataset
    Generate {
        #[command(flatten)]
        sim: SimArgs,

        /// Output file (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate replicate datasets (replicate r uses seed + r)
    Replicates {
        #[command(flatten)]
        sim: SimArgs,

        /// Number of replicates
        #[arg(short, long, default_value = "10")]
        n: usize,

        /// Output file (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a dataset against the inference engine's data contract
    Validate {
        /// Dataset JSON (bare data list or `generate --include-truth` output)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Naive (and, if present, true) occupancy per species
    Summarize {
        /// Dataset JSON (bare data list or `generate --include-truth` output)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Marginal log-likelihood of a dataset at its stored truth
    Loglik {
        /// Output of `generate --include-truth`
        #[arg(short, long)]
        input: PathBuf,

        /// Also emit per-row contributions
        #[arg(long)]
        pointwise: bool,

        /// Output file (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the default simulation config
    ConfigTemplate {
        /// Emit YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },

    /// Print version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate { sim, output } => survey::cmd_generate(&sim, output.as_ref()),
        Commands::Replicates { sim, n, output } => {
            survey::cmd_replicates(&sim, n, output.as_ref())
        }
        Commands::Validate { input } => survey::cmd_validate(&input),
        Commands::Summarize { input, output } => survey::cmd_summarize(&input, output.as_ref()),
        Commands::Loglik { input, pointwise, output } => {
            survey::cmd_loglik(&input, pointwise, output.as_ref())
        }
        Commands::ConfigTemplate { yaml } => config_io::cmd_config_template(yaml),
        Commands::Version => {
            println!("occusim {}", occu_core::VERSION);
            Ok(())
        }
    }
}

fn write_json(output: Option<&PathBuf>, value: &serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(value)?)?;
        tracing::info!(path = %path.display(), "wrote output");
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}
