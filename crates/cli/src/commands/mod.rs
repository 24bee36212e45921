//! CLI commands for the sales KPI service.

pub mod report;
pub mod serve;

pub use report::{run_report, ReportArgs};
pub use serve::{run_serve, ServeArgs};

use anyhow::{Context, Result};
use sales_kpi_core::{AppConfig, ConfigLoader};
use sales_kpi_data::Snapshot;

/// Loads the layered configuration from `path`.
pub(crate) fn load_config(path: &str) -> Result<AppConfig> {
    ConfigLoader::load_from(path).with_context(|| format!("Failed to load configuration from {path}"))
}

/// Loads, cleans and joins the configured extracts.
pub(crate) fn load_snapshot(config: &AppConfig) -> Result<Snapshot> {
    tracing::info!(
        opportunities = %config.data.opportunity_path().display(),
        loss_won = %config.data.loss_won_path().display(),
        "Loading sales extracts"
    );
    Snapshot::load(&config.data).context("Failed to build the sales snapshot")
}
