//! rcon-relay daemon
//!
//! Keeps an authenticated RCON connection to a game server and serves a
//! web UI plus JSON API for checking status and running commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rr_core::config::{self, RelayConfig};

#[derive(Parser)]
#[command(name = "rcon-relay")]
#[command(about = "Relay web requests to a game server's RCON endpoint")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RCON server host (overrides config)
    #[arg(long, env = "RCON_HOST")]
    rcon_host: Option<String>,

    /// RCON server port (overrides config)
    #[arg(long, env = "RCON_PORT")]
    rcon_port: Option<u16>,

    /// RCON password (overrides config)
    #[arg(long, env = "RCON_PASSWORD", hide_env_values = true)]
    rcon_password: Option<String>,

    /// HTTP bind address (overrides config)
    #[arg(short, long)]
    bind: Option<String>,

    /// Directory of static web UI files (overrides config)
    #[arg(long)]
    public_dir: Option<PathBuf>,

    /// Write a config file with every default to --config (or the default
    /// path) and exit
    #[arg(long)]
    init_config: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| args.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("rcon-relay starting...");

    if args.init_config {
        let path = args.config.clone().unwrap_or_else(config::default_config_path);
        config::write_default_config(&path)
            .with_context(|| format!("Failed to write config to {:?}", path))?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let config = load_config(&args)?;

    let cancel = CancellationToken::new();
    spawn_signal_handler(cancel.clone());

    rr_server::run(config, cancel)
        .await
        .context("rcon-relay failed")?;

    tracing::info!("rcon-relay shutdown complete");
    Ok(())
}

/// Load the config file (explicit path must exist) and apply CLI overrides
fn load_config(args: &Args) -> Result<RelayConfig> {
    let mut config = if let Some(config_path) = &args.config {
        config::load_config(config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        let default_path = config::default_config_path();
        if default_path.exists() {
            config::load_config(&default_path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {:?}: {}", default_path, e);
                RelayConfig::default()
            })
        } else {
            tracing::info!("Using default configuration");
            RelayConfig::default()
        }
    };

    if let Some(host) = &args.rcon_host {
        config.rcon.host = host.clone();
    }
    if let Some(port) = args.rcon_port {
        config.rcon.port = port;
    }
    if let Some(password) = &args.rcon_password {
        config.rcon.password = password.clone();
    }
    if let Some(bind) = &args.bind {
        config.http.bind_address = bind.clone();
    }
    if let Some(public_dir) = &args.public_dir {
        config.http.public_dir = public_dir.clone();
    }

    if config.rcon.password.is_empty() {
        tracing::warn!("No RCON password configured - authentication will likely fail");
    }

    Ok(config)
}

/// Cancel `cancel` on Ctrl+C or SIGTERM
fn spawn_signal_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating shutdown...");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, initiating shutdown...");
            }
        }

        cancel.cancel();
    });
}
