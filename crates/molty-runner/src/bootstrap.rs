//! Everything that happens before the first turn.
//!
//! 1. **Maintenance** -- wait out the daily window, polling once a minute.
//! 2. **Account** -- reuse a configured or saved API key if the server
//!    still accepts it, otherwise create an account and save the issued
//!    credentials.
//! 3. **Game** -- join the first waiting game, or create one.
//! 4. **Registration** -- register the agent as `{name}_AI`.
//!
//! A stop request between steps ends the sequence with `Ok(None)`.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use molty_api::credentials::Credentials;
use molty_api::{ApiClient, ApiError, GameSession};
use molty_core::clock::{Clock, MaintenanceWindow};
use molty_core::config::AgentConfig;
use molty_core::control::StopSignal;
use molty_types::{GameId, GameStatus};
use tracing::{info, warn};

use crate::error::RunnerError;

/// How often the maintenance window is re-checked before start-up.
pub const MAINTENANCE_POLL: Duration = Duration::from_secs(60);

/// Run the full start-up sequence.
///
/// Returns `Ok(None)` if a stop was requested before registration
/// completed.
pub async fn bootstrap<C: Clock>(
    config: &AgentConfig,
    clock: &C,
    stop: &StopSignal,
) -> Result<Option<GameSession>, RunnerError> {
    if !wait_out_maintenance(clock, &config.maintenance, stop).await {
        return Ok(None);
    }

    let client = authenticate(ApiClient::new(&config.api)?, config).await?;
    if stop.is_stop_requested() {
        return Ok(None);
    }

    let game_id = find_or_create_game(&client).await?;
    if stop.is_stop_requested() {
        return Ok(None);
    }

    let name = config.agent.registered_name();
    let registration = client.register_agent(&game_id, &name).await?;
    info!(
        game_id = %game_id,
        agent_id = %registration.id,
        name = %name,
        hp = registration.hp,
        ep = registration.ep,
        "Agent registered"
    );

    Ok(Some(GameSession::new(
        Arc::new(client),
        game_id,
        registration.id,
    )))
}

/// Sleep until `window` is over.
///
/// Returns `false` if a stop was requested while waiting.
pub async fn wait_out_maintenance<C: Clock>(
    clock: &C,
    window: &MaintenanceWindow,
    stop: &StopSignal,
) -> bool {
    let mut waited = false;
    loop {
        if stop.is_stop_requested() {
            return false;
        }
        if !window.contains(clock.now()) {
            if waited {
                info!("Maintenance window over, starting up");
            }
            return true;
        }
        if !waited {
            info!(
                start = %window.start,
                end = %window.end,
                "Inside maintenance window, waiting before start-up"
            );
            waited = true;
        }
        tokio::select! {
            () = clock.sleep(MAINTENANCE_POLL) => {}
            () = stop.wait() => return false,
        }
    }
}

/// Return a client carrying a working API key.
///
/// The configured key wins over one saved in the credentials file. A key
/// the server refuses with a client error is discarded and a fresh
/// account is created; any other failure is returned.
pub async fn authenticate(client: ApiClient, config: &AgentConfig) -> Result<ApiClient, RunnerError> {
    let credentials_path = Path::new(&config.api.credentials_file);

    let known_key = match client.api_key() {
        Some(key) => Some(key.to_owned()),
        None => Credentials::read_from(credentials_path)?.map(|c| c.api_key),
    };

    if let Some(key) = known_key {
        let client = client.with_api_key(key);
        match client.account_info().await {
            Ok(account) => {
                info!(account_id = %account.id, "Reusing existing account");
                return Ok(client);
            }
            Err(err) if err.is_client_error() || matches!(err, ApiError::Rejected(_)) => {
                warn!(error = %err, "Saved API key refused, creating a new account");
                return create_account(client, config, credentials_path).await;
            }
            Err(err) => return Err(err.into()),
        }
    }

    create_account(client, config, credentials_path).await
}

async fn create_account(
    client: ApiClient,
    config: &AgentConfig,
    credentials_path: &Path,
) -> Result<ApiClient, RunnerError> {
    let account = client.create_account(&config.agent.name).await?;
    info!(account_id = %account.account_id, "Account created");

    // The key is still usable for this run if the file cannot be written.
    if let Err(err) = Credentials::from(&account).write_to(credentials_path) {
        warn!(
            path = %credentials_path.display(),
            error = %err,
            "Failed to save credentials"
        );
    } else {
        info!(path = %credentials_path.display(), "Credentials saved");
    }

    Ok(client.with_api_key(account.api_key))
}

/// Pick the first waiting game, creating one when none is open.
pub async fn find_or_create_game(client: &ApiClient) -> Result<GameId, RunnerError> {
    let games = client.waiting_games().await?;
    if let Some(game) = games.into_iter().find(|g| g.status() == GameStatus::Waiting) {
        info!(game_id = %game.id, "Joining waiting game");
        return Ok(game.id);
    }

    let game = client.create_game().await?;
    info!(game_id = %game.id, "No waiting game, created one");
    Ok(game.id)
}
