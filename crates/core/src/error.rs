//! Startup configuration errors.

use thiserror::Error;

/// Errors raised while assembling the process configuration.
///
/// Both variants are fatal: the service refuses to start.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required credential environment variable is unset or blank.
    #[error("missing credential: environment variable {var} is not set")]
    MissingCredential {
        /// Name of the environment variable.
        var: String,
    },

    /// Configuration file or environment override could not be parsed.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
