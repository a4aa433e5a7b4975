//! Command-line interface definitions.

pub mod check;
pub mod run;
pub mod scan;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::app::Config;
use crate::error::Result;

/// crossarb - cross-venue prediction market arbitrage scanner.
#[derive(Parser, Debug)]
#[command(name = "crossarb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan on the poll interval until Ctrl-C
    Run(RunArgs),

    /// Run a single scan and print the opportunities found
    Scan(RunArgs),

    /// Validate configuration file
    Check(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for the `run` and `scan` subcommands.
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Path to configuration file (defaults apply when it does not exist)
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Comma-separated list of strategies to enable
    #[arg(long)]
    pub strategies: Option<String>,

    /// Override minimum profit, in cents per $1 payout
    #[arg(long)]
    pub min_profit_cents: Option<Decimal>,
}

impl RunArgs {
    /// Load the config file (or defaults), then apply flag overrides.
    #[allow(clippy::result_large_err)]
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_or_default(&self.config)?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.json_logs {
            config.logging.format = "json".to_string();
        }
        if let Some(strategies) = &self.strategies {
            config.strategies.enabled = strategies
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(cents) = self.min_profit_cents {
            config.detection.min_profit_threshold = cents / Decimal::ONE_HUNDRED;
        }
    }
}
