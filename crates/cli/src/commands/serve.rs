//! Serve command: build the snapshot once, then answer HTTP requests from it.

use super::{load_config, load_snapshot};
use anyhow::{Context, Result};
use clap::Args;
use sales_kpi_insights::{OpenAiClient, Summarizer};
use sales_kpi_web_api::{ApiServer, AppState};
use std::sync::Arc;

/// Arguments for the serve command.
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// Listen address (HOST:PORT), overrides `[server]`
    #[arg(short, long)]
    pub addr: Option<String>,
}

/// Runs the serve command.
///
/// The text-generation credential is checked first, so a missing key fails
/// before any extract is read. Nothing binds until the snapshot is built.
///
/// # Errors
/// Returns an error if startup fails or the server stops with an error.
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = load_config(&args.config)?;

    let client = OpenAiClient::from_settings(&config.insights).with_context(|| {
        format!(
            "Cannot start without the {} environment variable",
            config.insights.api_key_env
        )
    })?;
    tracing::info!(base_url = client.base_url(), model = client.model(), "Insight client ready");

    let snapshot = load_snapshot(&config)?;

    let state = AppState::new(snapshot, Summarizer::new(Arc::new(client)));
    let addr = args.addr.unwrap_or_else(|| config.server.addr());

    ApiServer::new(state).serve(&addr).await
}
