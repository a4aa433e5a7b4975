//! Handler for the `run` command.

use tokio::signal;
use tracing::{error, info};

use crate::app::Orchestrator;
use crate::cli::RunArgs;
use crate::error::Result;

/// Execute the run command.
pub async fn execute(args: &RunArgs) -> Result<()> {
    let config = args.load_config()?;
    config.init_logging();

    info!(
        strategies = ?config.strategies.enabled,
        polymarket = config.polymarket.enabled,
        kalshi = config.kalshi.enabled,
        csv = %config.output.csv_path.display(),
        "crossarb starting"
    );

    let orchestrator = Orchestrator::from_config(&config)?;

    tokio::select! {
        result = orchestrator.run() => {
            if let Err(e) = result {
                error!(error = %e, "Fatal error");
                return Err(e);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!(
        scans = orchestrator.state().scans_started(),
        distinct_opportunities = orchestrator.state().seen_count(),
        "crossarb stopped"
    );
    Ok(())
}
