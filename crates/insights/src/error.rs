//! Error types for the insight summarizer.
//!
//! Every variant is recoverable: the caller degrades to a KPI-only response.

use thiserror::Error;

/// Errors raised while generating narrative insights.
#[derive(Debug, Error)]
pub enum SummarizationError {
    /// The request did not complete within the configured timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Connection or transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Response body or message from the service.
        message: String,
    },

    /// The response body did not carry a completion.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// No usable credential was available to authenticate.
    #[error("missing credential: {0}")]
    MissingCredential(String),
}

impl SummarizationError {
    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for SummarizationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<sales_kpi_core::ConfigError> for SummarizationError {
    fn from(err: sales_kpi_core::ConfigError) -> Self {
        Self::MissingCredential(err.to_string())
    }
}

/// Result type alias for summarizer operations.
pub type Result<T> = std::result::Result<T, SummarizationError>;
