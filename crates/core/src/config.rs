use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default name of the opportunity extract.
pub const OPPORTUNITY_FILE: &str = "Opportunity.xlsx";

/// Default name of the won/lost order analysis extract.
pub const LOSS_WON_FILE: &str = "Loss_or_Won_Order_Analysis.xlsx";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub insights: InsightsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Socket address the HTTP listener binds to.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Location of the two spreadsheet extracts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub opportunity_file: String,
    pub loss_won_file: String,
}

impl DataConfig {
    #[must_use]
    pub fn opportunity_path(&self) -> PathBuf {
        self.dir.join(&self.opportunity_file)
    }

    #[must_use]
    pub fn loss_won_path(&self) -> PathBuf {
        self.dir.join(&self.loss_won_file)
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            opportunity_file: OPPORTUNITY_FILE.to_string(),
            loss_won_file: LOSS_WON_FILE.to_string(),
        }
    }
}

/// Text-generation service used by the insights endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    pub api_url: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Environment variable holding the service credential.
    pub api_key_env: String,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4.1".to_string(),
            timeout_secs: 30,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}
