use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use raceapp::ServerConfig;

#[derive(Parser)]
#[command(name = "raceapp")]
#[command(about = "Serve application log extracts over HTTP", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./raceapp.toml when present)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Interface to bind, overriding the configuration
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overriding the configuration
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Application log to read, overriding the configuration
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::load_from(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ServerConfig::load().context("loading configuration")?,
    };

    config
        .apply_cli_overrides(cli.host, cli.port, cli.log_file)
        .context("applying command-line overrides")?;

    raceapp::serve(config).await
}
