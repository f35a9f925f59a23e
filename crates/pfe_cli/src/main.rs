//! pfe - Command Line PFE Estimation
//!
//! Operational entry point for the PFE estimators.
//!
//! # Commands
//!
//! - `pfe classical` - Monte Carlo EE and PFE with antithetic sampling
//! - `pfe quantum` - Discretized PFE with simulated amplitude estimation
//! - `pfe compare` - Classical, exact discretized and simulated quantum side by side
//! - `pfe benchmark` - PFE error against a reference run over a ladder of sample sizes
//! - `pfe profile` - EE/PFE profile over a time grid and the resulting CVA
//!
//! # Configuration
//!
//! Values are taken from, in decreasing priority: command-line flags,
//! `PFE_LOG_LEVEL` / `PFE_SEED`, the `--config` TOML file, built-in defaults.
//! Logs go to stderr so JSON on stdout can be piped.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

use error::Result;

use config::{build_config, CliArgs, PortfolioOverrides};
use output::OutputFormat;

/// Potential Future Exposure estimation for a two-asset basket
#[derive(Parser, Debug)]
#[command(name = "pfe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Master seed; chosen at random and reported when omitted
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(flatten)]
    portfolio: PortfolioArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Basket and model overrides
#[derive(Args, Debug, Default)]
struct PortfolioArgs {
    /// Weight of asset 1
    #[arg(long, global = true, allow_negative_numbers = true)]
    w1: Option<f64>,

    /// Weight of asset 2
    #[arg(long, global = true, allow_negative_numbers = true)]
    w2: Option<f64>,

    /// Strike of the basket
    #[arg(long, global = true, allow_negative_numbers = true)]
    strike: Option<f64>,

    /// Initial price of both assets
    #[arg(long, global = true)]
    s0: Option<f64>,

    /// Drift per year of both assets
    #[arg(long, global = true, allow_negative_numbers = true)]
    mu: Option<f64>,

    /// Volatility of both assets
    #[arg(long, global = true)]
    sigma: Option<f64>,

    /// Horizon in years
    #[arg(long, global = true)]
    tau: Option<f64>,

    /// Confidence level of the PFE
    #[arg(long, global = true)]
    alpha: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classical Monte Carlo estimate
    Classical {
        /// Base number of scenarios (doubled with antithetic pairing)
        #[arg(short = 'n', long)]
        num_samples: Option<usize>,

        /// Disable antithetic pairing
        #[arg(long)]
        no_antithetic: bool,
    },

    /// Discretized estimate with simulated amplitude estimation
    Quantum {
        /// Register size; the distribution has 2^num_qubits bins
        #[arg(short = 'q', long)]
        num_qubits: Option<u32>,

        /// Amplitude-estimation precision qubits
        #[arg(short, long)]
        ae_iterations: Option<u32>,
    },

    /// Classical vs exact discretized vs simulated quantum
    Compare {
        /// Base number of Monte Carlo scenarios
        #[arg(short = 'n', long)]
        num_samples: Option<usize>,

        /// Register size of the discretization
        #[arg(short = 'q', long)]
        num_qubits: Option<u32>,

        /// Amplitude-estimation precision qubits
        #[arg(short, long)]
        ae_iterations: Option<u32>,
    },

    /// Convergence of the classical estimator against a reference run
    Benchmark {
        /// Comma-separated sample sizes
        #[arg(short, long, value_delimiter = ',')]
        sample_sizes: Option<Vec<usize>>,

        /// Sample count of the reference run
        #[arg(short, long)]
        reference_samples: Option<usize>,

        /// Run sizes on the thread pool; per-size runtimes then overlap
        #[arg(long)]
        parallel: bool,
    },

    /// EE/PFE profile over a time grid and CVA
    Profile {
        /// Comma-separated grid times in years
        #[arg(short, long, value_delimiter = ',')]
        time_grid: Option<Vec<f64>>,

        /// Base number of scenarios per grid time
        #[arg(short = 'n', long)]
        num_samples: Option<usize>,

        /// Counterparty hazard rate
        #[arg(long)]
        hazard_rate: Option<f64>,

        /// Loss given default
        #[arg(long)]
        lgd: Option<f64>,
    },
}

impl Cli {
    fn to_args(&self) -> CliArgs {
        let p = &self.portfolio;
        let mut args = CliArgs {
            config_file: self.config.clone(),
            log_level: self.log_level.clone(),
            seed: self.seed,
            portfolio: PortfolioOverrides {
                w1: p.w1,
                w2: p.w2,
                strike: p.strike,
                s0: p.s0,
                mu: p.mu,
                sigma: p.sigma,
                tau: p.tau,
                alpha: p.alpha,
            },
            ..Default::default()
        };

        match &self.command {
            Commands::Classical {
                num_samples,
                no_antithetic,
            } => {
                args.num_samples = *num_samples;
                args.no_antithetic = *no_antithetic;
            }
            Commands::Quantum {
                num_qubits,
                ae_iterations,
            } => {
                args.num_qubits = *num_qubits;
                args.ae_iterations = *ae_iterations;
            }
            Commands::Compare {
                num_samples,
                num_qubits,
                ae_iterations,
            } => {
                args.num_samples = *num_samples;
                args.num_qubits = *num_qubits;
                args.ae_iterations = *ae_iterations;
            }
            Commands::Benchmark {
                sample_sizes,
                reference_samples,
                parallel,
            } => {
                args.sample_sizes = sample_sizes.clone();
                args.reference_samples = *reference_samples;
                args.parallel = *parallel;
            }
            Commands::Profile {
                time_grid,
                num_samples,
                hazard_rate,
                lgd,
            } => {
                args.time_grid = time_grid.clone();
                args.num_samples = *num_samples;
                args.hazard_rate = *hazard_rate;
                args.lgd = *lgd;
            }
        }
        args
    }
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = build_config(&cli.to_args()).context("failed to build configuration")?;
    init_tracing(config.log_level.as_filter_str());
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Classical { .. } => commands::classical::run(&config, cli.format),
        Commands::Quantum { .. } => commands::quantum::run(&config, cli.format),
        Commands::Compare { .. } => commands::compare::run(&config, cli.format),
        Commands::Benchmark { .. } => commands::benchmark::run(&config, cli.format),
        Commands::Profile { .. } => commands::profile::run(&config, cli.format),
    }
    .context("command failed")
}
