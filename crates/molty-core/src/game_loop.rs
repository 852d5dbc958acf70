//! The resilient polling loop that plays one game.
//!
//! Each iteration runs four phases in order:
//!
//! 1. **Maintenance Check** -- inside the daily window, sleep and restart.
//! 2. **Fetch** -- poll the remote state; classify and absorb failures.
//! 3. **Decide+Act** -- run the decision engine and submit one action.
//! 4. **Wait** -- sleep until the next turn, or for the maintenance sleep
//!    when the submission was refused for maintenance.
//!
//! A stop request is checked before every phase, and every sleep races
//! against the [`StopSignal`] so a Ctrl-C never waits out a five-minute
//! maintenance pause. The loop ends only through one of the
//! [`LoopOutcome`] variants; it has no error return.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use molty_policy::{Decision, RandomSource, evaluate};
use molty_types::{GameStatus, StateSnapshot};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::clock::{Clock, MaintenanceWindow};
use crate::config::AgentConfig;
use crate::control::StopSignal;
use crate::session::{RemoteSession, SessionError};

/// Timing and error budget for one loop run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSettings {
    /// Pause between turns.
    pub turn_interval: Duration,
    /// Poll interval while the game has not started.
    pub waiting_poll: Duration,
    /// Pause after a counted failure.
    pub error_backoff: Duration,
    /// Pause while the server is in maintenance.
    pub maintenance_sleep: Duration,
    /// The loop gives up once more than this many failures happen in a row.
    pub max_consecutive_errors: u32,
    /// Daily window during which no request is sent.
    pub maintenance: MaintenanceWindow,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self::from(&AgentConfig::default())
    }
}

impl From<&AgentConfig> for LoopSettings {
    fn from(config: &AgentConfig) -> Self {
        Self {
            turn_interval: config.game_loop.turn_interval(),
            waiting_poll: config.game_loop.waiting_poll(),
            error_backoff: config.game_loop.error_backoff(),
            maintenance_sleep: config.game_loop.maintenance_sleep(),
            max_consecutive_errors: config.game_loop.max_consecutive_errors,
            maintenance: config.maintenance,
        }
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum LoopOutcome {
    /// The server reported the game as finished.
    GameFinished {
        /// Kills scored by the agent.
        kills: u32,
    },
    /// The agent is dead.
    AgentDied,
    /// Too many consecutive fetch failures.
    TooManyErrors {
        /// Failures in a row when the loop gave up.
        consecutive: u32,
    },
    /// A stop was requested.
    UserInterrupt,
}

impl LoopOutcome {
    /// Whether the process should exit successfully after this outcome.
    pub const fn is_clean_exit(self) -> bool {
        matches!(self, Self::GameFinished { .. } | Self::UserInterrupt)
    }
}

/// Summary of a finished loop run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoopReport {
    /// Why the loop stopped.
    pub outcome: LoopOutcome,
    /// Turns on which a decision was made.
    pub turns: u64,
    /// Actions the server accepted.
    pub actions_submitted: u64,
    /// When the last accepted action was submitted.
    pub last_action_at: Option<DateTime<Utc>>,
}

/// Everything known about one played turn.
#[derive(Debug)]
pub struct TurnRecord<'a> {
    /// Turns played so far in this run, including this one.
    pub turn: u64,
    /// The state the decision was made on.
    pub snapshot: &'a StateSnapshot,
    /// The chosen action and the rule that chose it.
    pub decision: &'a Decision,
    /// Whether the server accepted the action.
    pub submitted: bool,
    /// When the turn was played.
    pub at: DateTime<Utc>,
}

/// Callback invoked as the loop makes progress.
///
/// Implementations can use this to expose status over HTTP, collect
/// statistics, etc.
pub trait TurnObserver: Send {
    /// Called after every decision, whether or not submission succeeded.
    fn on_turn(&mut self, record: &TurnRecord<'_>);

    /// Called when the loop enters or leaves maintenance.
    fn on_maintenance(&mut self, _active: bool) {}

    /// Called once with the final report.
    fn on_finish(&mut self, _report: &LoopReport) {}
}

/// A no-op observer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl TurnObserver for NoOpObserver {
    fn on_turn(&mut self, _record: &TurnRecord<'_>) {}
}

/// Whether a sleep ran to completion or was cut short by a stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pause {
    Elapsed,
    Interrupted,
}

/// Drives one agent through one game.
pub struct GameLoop<S, C, R> {
    session: S,
    clock: C,
    rng: R,
    settings: LoopSettings,
    stop: Arc<StopSignal>,
    consecutive_errors: u32,
    in_maintenance: bool,
    in_window: bool,
    turns: u64,
    actions_submitted: u64,
    last_action_at: Option<DateTime<Utc>>,
}

impl<S, C, R> GameLoop<S, C, R>
where
    S: RemoteSession,
    C: Clock,
    R: RandomSource + Send,
{
    /// Create a loop over `session`, ready to run.
    pub const fn new(
        session: S,
        clock: C,
        rng: R,
        settings: LoopSettings,
        stop: Arc<StopSignal>,
    ) -> Self {
        Self {
            session,
            clock,
            rng,
            settings,
            stop,
            consecutive_errors: 0,
            in_maintenance: false,
            in_window: false,
            turns: 0,
            actions_submitted: 0,
            last_action_at: None,
        }
    }

    /// Play until the game ends, the agent dies, errors pile up, or a
    /// stop is requested.
    pub async fn run(mut self, observer: &mut dyn TurnObserver) -> LoopReport {
        info!(
            turn_interval_secs = self.settings.turn_interval.as_secs(),
            max_consecutive_errors = self.settings.max_consecutive_errors,
            "Game loop starting"
        );

        let outcome = self.drive(observer).await;
        let report = LoopReport {
            outcome,
            turns: self.turns,
            actions_submitted: self.actions_submitted,
            last_action_at: self.last_action_at,
        };
        log_loop_end(&report);
        observer.on_finish(&report);
        report
    }

    async fn drive(&mut self, observer: &mut dyn TurnObserver) -> LoopOutcome {
        loop {
            // --- Maintenance check ---
            if self.stop.is_stop_requested() {
                return LoopOutcome::UserInterrupt;
            }
            if self.settings.maintenance.contains(self.clock.now()) {
                self.in_window = true;
                self.set_maintenance(true, observer);
                if self.pause(self.settings.maintenance_sleep).await == Pause::Interrupted {
                    return LoopOutcome::UserInterrupt;
                }
                continue;
            }
            if self.in_window {
                self.in_window = false;
                self.set_maintenance(false, observer);
            }

            // --- Fetch ---
            if self.stop.is_stop_requested() {
                return LoopOutcome::UserInterrupt;
            }
            let snapshot = match self.session.fetch_state().await {
                Ok(snapshot) => {
                    self.consecutive_errors = 0;
                    self.set_maintenance(false, observer);
                    snapshot
                }
                Err(err) => {
                    let delay = match self.absorb_fetch_error(&err, observer) {
                        Ok(delay) => delay,
                        Err(outcome) => return outcome,
                    };
                    if self.pause(delay).await == Pause::Interrupted {
                        return LoopOutcome::UserInterrupt;
                    }
                    continue;
                }
            };

            // --- Status gate ---
            match snapshot.status {
                GameStatus::Finished => {
                    return LoopOutcome::GameFinished {
                        kills: snapshot.kills,
                    };
                }
                GameStatus::Waiting => {
                    info!(status = %snapshot.status, "Game not running yet, waiting");
                    if self.pause(self.settings.waiting_poll).await == Pause::Interrupted {
                        return LoopOutcome::UserInterrupt;
                    }
                    continue;
                }
                GameStatus::Running => {}
            }
            if !snapshot.agent.is_alive {
                return LoopOutcome::AgentDied;
            }

            // --- Decide + Act ---
            if self.stop.is_stop_requested() {
                return LoopOutcome::UserInterrupt;
            }
            let wait = self.play_turn(&snapshot, observer).await;

            // --- Wait ---
            if self.pause(wait).await == Pause::Interrupted {
                return LoopOutcome::UserInterrupt;
            }
        }
    }

    /// Count a failed fetch and pick the delay before the next attempt.
    ///
    /// Returns the terminal outcome once the error budget is exhausted.
    fn absorb_fetch_error(
        &mut self,
        err: &SessionError,
        observer: &mut dyn TurnObserver,
    ) -> Result<Duration, LoopOutcome> {
        if !err.is_counted() {
            self.set_maintenance(true, observer);
            return Ok(self.settings.maintenance_sleep);
        }

        // The server answered with something other than maintenance.
        self.set_maintenance(false, observer);
        self.consecutive_errors = self.consecutive_errors.saturating_add(1);
        if self.consecutive_errors > self.settings.max_consecutive_errors {
            error!(
                consecutive = self.consecutive_errors,
                error = %err,
                "Too many consecutive errors, giving up"
            );
            return Err(LoopOutcome::TooManyErrors {
                consecutive: self.consecutive_errors,
            });
        }
        warn!(
            consecutive = self.consecutive_errors,
            max = self.settings.max_consecutive_errors,
            error = %err,
            "State fetch failed"
        );
        Ok(self.settings.error_backoff)
    }

    /// Decide, submit once, and return how long to wait before the next
    /// fetch. A maintenance answer to the submission stretches the wait to
    /// the maintenance sleep; the action itself is never resent.
    async fn play_turn(
        &mut self,
        snapshot: &StateSnapshot,
        observer: &mut dyn TurnObserver,
    ) -> Duration {
        let decision = evaluate(snapshot, &mut self.rng);
        self.turns = self.turns.saturating_add(1);

        info!(
            turn = self.turns,
            server_turn = snapshot.turn,
            hp = snapshot.vitals.hp,
            max_hp = snapshot.vitals.max_hp,
            ep = snapshot.vitals.ep,
            region = %snapshot.location.region_id,
            rule = decision.rule,
            action = %decision.action,
            "Turn decided"
        );

        let mut wait = self.settings.turn_interval;
        let submitted = match self.session.submit_action(&decision.action).await {
            Ok(()) => {
                self.actions_submitted = self.actions_submitted.saturating_add(1);
                self.last_action_at = Some(self.clock.now());
                debug!(action = %decision.action, "Action accepted");
                true
            }
            Err(err) if err.is_maintenance() => {
                warn!(action = %decision.action, "Action refused for maintenance, turn lost");
                self.set_maintenance(true, observer);
                wait = self.settings.maintenance_sleep;
                false
            }
            Err(err) => {
                warn!(action = %decision.action, error = %err, "Action submission failed, turn lost");
                false
            }
        };

        observer.on_turn(&TurnRecord {
            turn: self.turns,
            snapshot,
            decision: &decision,
            submitted,
            at: self.clock.now(),
        });
        wait
    }

    fn set_maintenance(&mut self, active: bool, observer: &mut dyn TurnObserver) {
        if self.in_maintenance == active {
            return;
        }
        self.in_maintenance = active;
        if active {
            info!(
                sleep_secs = self.settings.maintenance_sleep.as_secs(),
                "Server maintenance, pausing requests"
            );
        } else {
            info!("Maintenance over, resuming");
        }
        observer.on_maintenance(active);
    }

    async fn pause(&self, duration: Duration) -> Pause {
        tokio::select! {
            () = self.clock.sleep(duration) => Pause::Elapsed,
            () = self.stop.wait() => Pause::Interrupted,
        }
    }
}

/// Log the loop end summary.
pub fn log_loop_end(report: &LoopReport) {
    info!(
        outcome = ?report.outcome,
        turns = report.turns,
        actions_submitted = report.actions_submitted,
        last_action_at = ?report.last_action_at,
        "Game loop ended"
    );
}
