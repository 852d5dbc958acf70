//! Process settings loaded from environment variables.
//!
//! Everything about the agent's behavior lives in `molty-config.yaml`;
//! the environment only says where that file is, how loud to log, and
//! whether to seed the policy's random source.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::error::RunnerError;

/// Config file used when `MOLTY_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "molty-config.yaml";

/// Log filter used when neither `RUST_LOG` nor `LOG_LEVEL` is set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Settings read once at process start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSettings {
    /// Path of the YAML configuration file.
    pub config_path: PathBuf,
    /// Seed for a reproducible policy run; OS entropy when absent.
    pub seed: Option<u64>,
}

impl ProcessSettings {
    /// Load settings from the process environment.
    ///
    /// - `MOLTY_CONFIG` -- config file path (default `molty-config.yaml`)
    /// - `MOLTY_SEED` -- optional `u64` random seed
    pub fn from_env() -> Result<Self, RunnerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RunnerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = lookup("MOLTY_CONFIG")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_owned());

        let seed = lookup("MOLTY_SEED")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| RunnerError::Settings(format!("invalid MOLTY_SEED: {e}")))
            })
            .transpose()?;

        Ok(Self {
            config_path: PathBuf::from(config_path),
            seed,
        })
    }
}

/// Build the log filter: `RUST_LOG`, else `LOG_LEVEL`, else `info`.
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level(|name| std::env::var(name).ok())))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// The `LOG_LEVEL` directive, lower-cased, or the default.
pub fn log_level<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("LOG_LEVEL")
        .map(|level| level.trim().to_lowercase())
        .filter(|level| !level.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn defaults_without_environment() {
        let settings = ProcessSettings::from_lookup(|_| None).unwrap();
        assert_eq!(settings.config_path, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(settings.seed, None);
        assert_eq!(log_level(|_| None), "info");
    }

    #[test]
    fn explicit_values() {
        let settings = ProcessSettings::from_lookup(|name| match name {
            "MOLTY_CONFIG" => Some("/etc/molty.yaml".to_owned()),
            "MOLTY_SEED" => Some(" 42 ".to_owned()),
            _ => None,
        })
        .unwrap();
        assert_eq!(settings.config_path, PathBuf::from("/etc/molty.yaml"));
        assert_eq!(settings.seed, Some(42));
        assert_eq!(log_level(|_| Some("DEBUG".to_owned())), "debug");
    }

    #[test]
    fn bad_seed_is_rejected() {
        let err = ProcessSettings::from_lookup(|name| {
            (name == "MOLTY_SEED").then(|| "lucky".to_owned())
        })
        .unwrap_err();
        assert!(matches!(err, RunnerError::Settings(_)));
    }
}
