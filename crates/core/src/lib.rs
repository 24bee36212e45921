//! Configuration and startup checks shared by the sales KPI crates.

pub mod config;
pub mod config_loader;
pub mod credentials;
pub mod error;

pub use config::{AppConfig, DataConfig, InsightsConfig, ServerConfig, LOSS_WON_FILE, OPPORTUNITY_FILE};
pub use config_loader::ConfigLoader;
pub use credentials::require_credential;
pub use error::{ConfigError, Result};
