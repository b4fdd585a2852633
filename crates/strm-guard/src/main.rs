use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use strm_guard::reload::spawn_sighup_reload;
use strm_guard::{Config, ProxyServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "strm-guard", version, about)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "STRM_GUARD_CONFIG")]
    config: PathBuf,
    /// Override `listen.port`
    #[arg(short, long)]
    port: Option<u16>,
    /// Override `upstream.url`
    #[arg(long)]
    upstream: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    if let Some(port) = args.port {
        config.listen.port = port;
    }
    if let Some(upstream) = args.upstream {
        config.upstream.url = upstream;
        config.validate()?;
    }

    let server = ProxyServer::new(config)?;
    spawn_sighup_reload(args.config.clone(), server.snapshot())
        .context("Failed to install SIGHUP handler")?;

    tokio::select! {
        result = server.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
            Ok(())
        }
    }
}
