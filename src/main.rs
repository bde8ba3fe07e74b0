use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::filter::Directive;

use study_planner::app::App;
use study_planner::cli::{self, Cli};
use study_planner::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => Config::load_from(Path::new(path)),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    if let Some(data) = cli.data {
        config.data_path = data;
    }

    // Initialize logging (RUST_LOG wins, then the configured level)
    let default_level: Directive = config
        .log_level
        .parse()
        .unwrap_or_else(|_| tracing::Level::WARN.into());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Using data file {}", config.data_path);

    let app = App::new(&config);
    cli::execute(cli.command, &app)
        .await
        .with_context(|| format!("Data file: {}", config.data_path))?;

    Ok(())
}
