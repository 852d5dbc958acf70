//! Molty Royale agent binary.
//!
//! Loads configuration, registers the agent in a game, and plays it with
//! the decision engine until the game ends, the agent dies, the server
//! keeps failing, or the process receives Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Read process settings and load `molty-config.yaml`
//! 3. Install the Ctrl-C handler
//! 4. Start the health server
//! 5. Bootstrap: maintenance wait, account, game, registration
//! 6. Run the game loop
//! 7. Log the result and exit with its status

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use molty_core::clock::SystemClock;
use molty_core::config::AgentConfig;
use molty_core::control::StopSignal;
use molty_core::game_loop::{GameLoop, LoopReport, LoopSettings};
use molty_policy::RngSource;
use molty_runner::bootstrap::bootstrap;
use molty_runner::health::{HealthState, StatusObserver, start_server};
use molty_runner::settings::{ProcessSettings, log_filter};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_target(true)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "molty-runner starting");

    match run().await {
        Ok(Some(report)) if report.outcome.is_clean_exit() => ExitCode::SUCCESS,
        Ok(Some(_)) => ExitCode::FAILURE,
        Ok(None) => {
            info!("Stopped before the game started");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("molty-runner failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Everything after logging. `Ok(None)` means a stop arrived during
/// bootstrap.
async fn run() -> anyhow::Result<Option<LoopReport>> {
    // 2. Settings and configuration.
    let settings = ProcessSettings::from_env()?;
    // Env overrides are applied while loading.
    let config = AgentConfig::load_or_default(&settings.config_path)
        .with_context(|| format!("loading {}", settings.config_path.display()))?;
    info!(
        config_path = %settings.config_path.display(),
        agent = %config.agent.registered_name(),
        base_url = %config.api.base_url,
        turn_interval_secs = config.game_loop.turn_interval_secs,
        max_consecutive_errors = config.game_loop.max_consecutive_errors,
        "Configuration loaded"
    );

    // 3. Ctrl-C handler.
    let stop = Arc::new(StopSignal::new());
    {
        let stop = Arc::clone(&stop);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping");
                    stop.request_stop();
                }
                Err(err) => warn!(error = %err, "Failed to listen for Ctrl-C"),
            }
        });
    }
    info!("Signal handler installed");

    // 4. Health server.
    let health = Arc::new(HealthState::new());
    if config.health.enabled {
        let health_config = config.health.clone();
        let state = Arc::clone(&health);
        tokio::spawn(async move {
            if let Err(err) = start_server(&health_config, state).await {
                error!(error = %err, "Health server stopped");
            }
        });
    } else {
        info!("Health server disabled");
    }

    // 5. Bootstrap.
    let clock = SystemClock;
    let Some(session) = bootstrap(&config, &clock, &stop)
        .await
        .context("bootstrap failed")?
    else {
        return Ok(None);
    };
    info!(
        game_id = %session.game_id(),
        agent_id = %session.agent_id(),
        "Bootstrap complete"
    );

    // 6. Game loop.
    let rng = settings.seed.map_or_else(RngSource::from_os, RngSource::seeded);
    let game_loop = GameLoop::new(
        session,
        clock,
        rng,
        LoopSettings::from(&config),
        Arc::clone(&stop),
    );
    let mut observer = StatusObserver::new(health);
    let report = game_loop.run(&mut observer).await;

    // 7. Result.
    info!(
        outcome = ?report.outcome,
        clean_exit = report.outcome.is_clean_exit(),
        "molty-runner finished"
    );
    Ok(Some(report))
}
