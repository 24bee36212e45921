use crate::config::AppConfig;
use crate::error::{ConfigError, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads application configuration from `config/Config.toml` and `APP_` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from("config/Config.toml")
    }

    /// Loads application configuration by layering built-in defaults, a TOML file and
    /// `APP_`-prefixed environment variables (`__` separates nested keys).
    ///
    /// A missing file is not an error; every field has a default.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or an environment override cannot be parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("APP_").split("__"))
            .extract()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        tracing::debug!(
            data_dir = %config.data.dir.display(),
            port = config.server.port,
            "Configuration loaded"
        );

        Ok(config)
    }
}
