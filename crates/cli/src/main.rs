use clap::{Parser, Subcommand};

mod commands;

use commands::{ReportArgs, ServeArgs};

#[derive(Parser)]
#[command(name = "sales-kpi")]
#[command(about = "Sales KPI service over CRM opportunity extracts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the snapshot and serve the KPI API
    Serve(ServeArgs),
    /// Build the snapshot and print the full KPI report
    Report(ReportArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // .env is optional; real environment variables take precedence
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Ok(path) = dotenv {
        tracing::info!("Loaded environment from {}", path.display());
    }

    match cli.command {
        Commands::Serve(args) => {
            commands::run_serve(args).await?;
        }
        Commands::Report(args) => {
            commands::run_report(args)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["sales-kpi", "serve"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.config, "config/Config.toml");
                assert!(args.addr.is_none());
            }
            Commands::Report(_) => panic!("expected serve"),
        }
    }

    #[test]
    fn test_report_flags() {
        let cli = Cli::try_parse_from([
            "sales-kpi",
            "report",
            "--data-dir",
            "/tmp/extracts",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Report(args) => {
                assert!(args.json);
                assert_eq!(args.data_dir.unwrap().to_str(), Some("/tmp/extracts"));
            }
            Commands::Serve(_) => panic!("expected report"),
        }
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(Cli::try_parse_from(["sales-kpi", "backtest"]).is_err());
    }
}
