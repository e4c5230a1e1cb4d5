use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use weather_dosha::{DoshaPipeline, ServiceConfig, telemetry, web};

/// Weather-driven dosha classification service
#[derive(Debug, Parser)]
#[command(name = "weather-dosha", version, about)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "DOSHA_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ServiceConfig::load_from_path(cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let _telemetry = telemetry::init(&config.logging)?;

    let pipeline = Arc::new(DoshaPipeline::from_config(&config)?);
    tracing::info!(
        "Starting weather-dosha {} (cache ttl {:?}, {} entries)",
        weather_dosha::VERSION,
        pipeline.cache().ttl(),
        pipeline.cache().capacity()
    );
    web::run(pipeline, &config.server).await
}
