//! tuitionweb main entry point

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::RwLock;
use tuitionweb_api::start_server;
use tuitionweb_client::{HttpSource, SnapshotSource, SourceRef};
use tuitionweb_config::{Config, SourceKind};
use tuitionweb_core::Dashboard;

#[derive(Parser, Debug)]
#[command(name = "tuitionweb")]
#[command(version = "0.1.0")]
#[command(about = "Tuition payment dashboards over the payments API", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn build_source(config: &Config) -> SourceRef {
    match config.data.source {
        SourceKind::Http => Arc::new(HttpSource::new(
            config.api.base_url.clone(),
            config.api.token.clone(),
            Duration::from_secs(config.api.timeout_secs),
        )),
        SourceKind::Snapshot => Arc::new(SnapshotSource::new(config.data.path.clone())),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = Config::load(args.config.clone())
        .map_err(|e| anyhow::anyhow!("{}", e.to_details()))
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str()))
        .init();

    log::info!("Config loaded: source={}, api={}", config.data.source, config.api.base_url);

    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut dashboard = Dashboard::new(config.clone(), build_source(&config));
        match dashboard.load().await {
            Ok(()) => {
                let degraded = &dashboard.data().degraded;
                if !degraded.is_empty() {
                    log::warn!("Loaded with empty collections: {:?}", degraded);
                }
            }
            Err(e) => log::error!("Dashboard not loaded: {}", e.to_details()),
        }

        let dashboard = Arc::new(RwLock::new(dashboard));
        start_server(&config, dashboard).await.context("Server error")
    })
}
