use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::EnvFilter;

use pgmaster::config::{self, Config};
use pgmaster::metrics::ProbeMetrics;
use pgmaster::{MasterFinder, PgConnector};

/// Default config locations, tried in order
const CONFIG_PATHS: [&str; 2] = ["config/pgmaster.toml", "pgmaster.toml"];

#[derive(Parser)]
#[command(name = "pgmaster")]
#[command(about = "Print the writable PostgreSQL primary among candidate hosts", long_about = None)]
struct Cli {
    /// Config file (defaults to config/pgmaster.toml, then pgmaster.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Per-host timeout in milliseconds (overrides config)
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    /// Print probe metrics to stderr after the lookup
    #[arg(long)]
    metrics: bool,

    /// Candidate hosts in priority order (replace configured hosts)
    hosts: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr, stdout carries only the result
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)
            .context("Failed to load config")?,
        None => load_or_default_config(),
    };

    if let Some(timeout_ms) = cli.timeout_ms {
        config.probe.timeout_ms = timeout_ms;
    }
    if !cli.hosts.is_empty() {
        config.probe.hosts = cli.hosts;
    }

    let connector = PgConnector::from_config(&config.postgres);
    let mut finder = MasterFinder::new(connector, config.probe.timeout());

    info!(
        hosts = config.probe.hosts.len(),
        timeout = ?finder.timeout(),
        "Looking for writable master"
    );

    let metrics = if cli.metrics {
        let metrics = Arc::new(ProbeMetrics::new()?);
        finder = finder.with_observer(metrics.clone());
        Some(metrics)
    } else {
        None
    };

    let result = finder.find(&config.probe.hosts).await;

    if let Some(metrics) = metrics {
        eprint!("{}", metrics.gather()?);
    }

    let master = result.context("Master lookup failed")?;
    println!("{}", master);
    Ok(())
}

fn load_or_default_config() -> Config {
    for path in CONFIG_PATHS {
        match config::load_config(path) {
            Ok(config) => {
                info!(path = path, "Loaded configuration");
                return config;
            }
            Err(e) if e.is_not_found() => {
                debug!(path = path, "Config file not present");
            }
            Err(e) => {
                warn!(path = path, error = %e, "Failed to load config");
            }
        }
    }

    info!("Using default configuration");
    Config::default()
}
