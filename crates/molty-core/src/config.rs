//! Configuration loading and typed config structures for the Molty agent.
//!
//! The configuration lives in `molty-config.yaml` at the project root.
//! Every field has a default, so an empty file (or no file at all) yields
//! a working agent. A handful of environment variables override the YAML
//! values; see [`AgentConfig::apply_overrides`].

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::clock::MaintenanceWindow;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override held an unusable value.
    #[error("invalid value for {name}: {value}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level agent configuration.
///
/// Mirrors the structure of `molty-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AgentConfig {
    /// Agent identity settings.
    #[serde(default)]
    pub agent: AgentSection,

    /// Game server connection settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Loop timing and error budget.
    #[serde(default, rename = "loop")]
    pub game_loop: LoopConfig,

    /// Daily server maintenance window (UTC).
    #[serde(default)]
    pub maintenance: MaintenanceWindow,

    /// Health endpoint settings.
    #[serde(default)]
    pub health: HealthConfig,
}

impl AgentConfig {
    /// Load configuration from a YAML file at the given path, without
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_yaml(&contents)
    }

    /// Load from `path` when it exists, else start from defaults.
    ///
    /// Environment overrides are applied in both cases.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Yaml`] for an
    /// unreadable file, or [`ConfigError::InvalidEnv`] if an override
    /// cannot be parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        Self::load_or_default_with(path, |name| std::env::var(name).ok())
    }

    /// [`Self::load_or_default`] with overrides from an arbitrary lookup.
    pub fn load_or_default_with<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_overrides(lookup)?;
        Ok(config)
    }


    /// Parse configuration from a YAML string without touching the
    /// environment.
    pub fn parse_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// [`Self::load_or_default`]).
    ///
    /// - `AGENT_NAME` overrides `agent.name`
    /// - `MOLTY_BASE_URL` overrides `api.base_url`
    /// - `MOLTY_API_KEY` overrides `api.api_key` (blank values are ignored)
    /// - `PORT` overrides `health.port`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("AGENT_NAME") {
            self.agent.name = name;
        }
        if let Some(url) = lookup("MOLTY_BASE_URL") {
            self.api.base_url = url;
        }
        if let Some(key) = lookup("MOLTY_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.api.api_key = Some(key);
        }
        if let Some(port) = lookup("PORT") {
            self.health.port = port.parse().map_err(|_parse| ConfigError::InvalidEnv {
                name: "PORT",
                value: port.clone(),
            })?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Agent identity configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentSection {
    /// Base name; the registered agent is called `{name}_AI`.
    #[serde(default = "default_agent_name")]
    pub name: String,
}

impl AgentSection {
    /// Name under which the agent registers in a game.
    pub fn registered_name(&self) -> String {
        format!("{}_AI", self.name)
    }
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
        }
    }
}

/// Game server connection configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the game API, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Existing API key to reuse instead of creating an account.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// File the issued credentials are written to.
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,

    /// Bounded retry for idempotent calls.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl ApiConfig {
    /// Per-request timeout as a [`Duration`].
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            request_timeout_secs: default_request_timeout_secs(),
            credentials_file: default_credentials_file(),
            retry: RetryConfig::default(),
        }
    }
}

/// Exponential backoff parameters for retried API calls.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, in milliseconds.
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    /// Upper bound for any single delay, in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Growth factor between consecutive delays.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            multiplier: default_multiplier(),
        }
    }
}

/// Game loop timing and error budget.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoopConfig {
    /// Pause between turns, in seconds.
    #[serde(default = "default_turn_interval_secs")]
    pub turn_interval_secs: u64,

    /// Poll interval while the game has not started, in seconds.
    #[serde(default = "default_waiting_poll_secs")]
    pub waiting_poll_secs: u64,

    /// Pause after a counted failure, in seconds.
    #[serde(default = "default_error_backoff_secs")]
    pub error_backoff_secs: u64,

    /// Pause while the server is in maintenance, in seconds.
    #[serde(default = "default_maintenance_sleep_secs")]
    pub maintenance_sleep_secs: u64,

    /// The loop gives up once this many consecutive failures are exceeded.
    #[serde(default = "default_max_consecutive_errors")]
    pub max_consecutive_errors: u32,
}

impl LoopConfig {
    /// Pause between turns.
    pub const fn turn_interval(&self) -> Duration {
        Duration::from_secs(self.turn_interval_secs)
    }

    /// Poll interval while waiting for the game to start.
    pub const fn waiting_poll(&self) -> Duration {
        Duration::from_secs(self.waiting_poll_secs)
    }

    /// Pause after a counted failure.
    pub const fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_secs)
    }

    /// Pause while the server is in maintenance.
    pub const fn maintenance_sleep(&self) -> Duration {
        Duration::from_secs(self.maintenance_sleep_secs)
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            turn_interval_secs: default_turn_interval_secs(),
            waiting_poll_secs: default_waiting_poll_secs(),
            error_backoff_secs: default_error_backoff_secs(),
            maintenance_sleep_secs: default_maintenance_sleep_secs(),
            max_consecutive_errors: default_max_consecutive_errors(),
        }
    }
}

/// Health endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthConfig {
    /// Whether to serve the health endpoint at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Listen address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_host(),
            port: default_port(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_agent_name() -> String {
    "ProBot".to_owned()
}

fn default_base_url() -> String {
    "https://mort-royal-production.up.railway.app/api".to_owned()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

fn default_credentials_file() -> String {
    "api_key.txt".to_owned()
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_min_delay_ms() -> u64 {
    2_000
}

const fn default_max_delay_ms() -> u64 {
    10_000
}

const fn default_multiplier() -> f64 {
    2.0
}

const fn default_turn_interval_secs() -> u64 {
    60
}

const fn default_waiting_poll_secs() -> u64 {
    30
}

const fn default_error_backoff_secs() -> u64 {
    30
}

const fn default_maintenance_sleep_secs() -> u64 {
    300
}

const fn default_max_consecutive_errors() -> u32 {
    5
}

const fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8000
}
