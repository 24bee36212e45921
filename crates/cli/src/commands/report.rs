//! Report command: print the full KPI document without starting a server.

use super::{load_config, load_snapshot};
use anyhow::Result;
use clap::Args;
use sales_kpi_analytics::{all_kpis, KpiReportFormatter};
use std::path::PathBuf;

/// Arguments for the report command.
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// Directory holding the two workbook extracts, overrides `[data].dir`
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Print the KPI document as JSON instead of a text report
    #[arg(long)]
    pub json: bool,
}

/// Runs the report command.
///
/// # Errors
/// Returns an error if the configuration or extracts cannot be loaded.
pub fn run_report(args: ReportArgs) -> Result<()> {
    let mut config = load_config(&args.config)?;
    if let Some(dir) = args.data_dir {
        config.data.dir = dir;
    }

    let snapshot = load_snapshot(&config)?;
    let kpis = all_kpis(&snapshot);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&kpis)?);
    } else {
        println!("{}", KpiReportFormatter::format(&kpis));
    }

    Ok(())
}
