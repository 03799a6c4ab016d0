//! Anypoint Connect - Connected App provisioning CLI
//!
//! Main entry point for the anypoint-connect application.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use anypoint_connect::cli::{Cli, Commands};
use anypoint_connect::commands;
use anypoint_connect::commands::cleanup::CleanupOutcome;
use anypoint_connect::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration before tracing so DEBUG can pick the log level
    let config = Config::load(&cli.config, &cli)?;

    init_tracing(config.debug, cli.json_logs);
    config.report_rejected_env();
    tracing::debug!(?config, "Loaded configuration from {}", cli.config);

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Provision { .. } => {
            tracing::info!("Starting Connected App provisioning");
            let outcome = commands::provision::run_provision(&config).await?;
            if let Some(report) = &outcome.report {
                if !report.failed.is_empty() {
                    tracing::warn!(
                        "{} organization(s) could not be authorized: {:?}",
                        report.failed.len(),
                        report.failed
                    );
                }
            }
            Ok(())
        }
        Commands::Cleanup => {
            tracing::info!("Starting Connected App cleanup");
            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            let mut output = std::io::stdout();
            let outcome = commands::cleanup::run_cleanup(&config, &mut input, &mut output).await?;
            if let CleanupOutcome::Completed(report) = outcome {
                tracing::info!(
                    "Deleted {} of {} Connected Apps",
                    report.deleted.len(),
                    report.total
                );
            }
            Ok(())
        }
        Commands::Scopes { file } => {
            commands::scopes::show_scopes(&config, file)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(debug: bool, json: bool) {
    let default_level = if debug {
        "anypoint_connect=debug"
    } else {
        "anypoint_connect=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
