//! Error types for the runner process.
//!
//! [`RunnerError`] wraps every failure that can stop the process before
//! the game loop starts. Once the loop runs, it has no error path of its
//! own; its outcome decides the exit code.

/// Top-level error for the runner process.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// An environment setting was unusable.
    #[error("settings error: {0}")]
    Settings(String),

    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: molty_core::config::ConfigError,
    },

    /// A game API call failed during bootstrap.
    #[error("API error: {source}")]
    Api {
        /// The underlying API error.
        #[from]
        source: molty_api::ApiError,
    },

    /// Reading or writing the credentials file failed.
    #[error("credentials file error: {source}")]
    Credentials {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
