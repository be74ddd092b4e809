#![forbid(unsafe_code)]

use std::{net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use watchtube::{
    api::{self, AppState},
    auth::{AllowAll, BearerToken},
    config::{self, DEFAULT_CONFIG_PATH, RuntimeConfig},
    seed::{self, Seed},
    store::Store,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Serve the watchtube video comments API.")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", default_value = DEFAULT_CONFIG_PATH, help = "Path to the config file")]
    config: PathBuf,
    #[arg(long = "host", value_name = "ADDR", help = "Address to listen on")]
    host: Option<String>,
    #[arg(long = "port", value_name = "PORT", help = "Port to listen on")]
    port: Option<u16>,
    #[arg(
        long = "base-path",
        value_name = "PATH",
        help = "Prefix for the watch routes (default /watch)"
    )]
    base_path: Option<String>,
    #[arg(
        long = "seed",
        value_name = "PATH",
        help = "TOML file with the profile and videos to serve"
    )]
    seed: Option<PathBuf>,
    #[arg(
        long = "auth-token",
        value_name = "TOKEN",
        help = "Require this bearer token on the watch routes"
    )]
    auth_token: Option<String>,
}

impl Cli {
    fn resolve(self) -> Result<RuntimeConfig> {
        let mut runtime = config::load_runtime_config_from(&self.config)?;
        if let Some(port) = std::env::var("WATCHTUBE_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
        {
            runtime.port = port;
        }
        if let Some(host) = self.host {
            runtime.host = host;
        }
        if let Some(port) = self.port {
            runtime.port = port;
        }
        if let Some(base_path) = self.base_path {
            config::validate_base_path(&base_path)?;
            runtime.base_path = base_path;
        }
        if self.seed.is_some() {
            runtime.seed_file = self.seed;
        }
        if self.auth_token.is_some() {
            runtime.auth_token = self.auth_token;
        }
        Ok(runtime)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let runtime = Cli::parse().resolve()?;

    let seed = match &runtime.seed_file {
        Some(path) => seed::load_seed(path)?,
        None => Seed::demo(),
    };
    let store = Store::from_seed(seed).context("building video store")?;
    tracing::info!(videos = store.len(), "store seeded");

    let state = match &runtime.auth_token {
        Some(token) => {
            tracing::info!("bearer token required on {}", runtime.base_path);
            AppState::new(store, BearerToken::new(token.clone()))
        }
        None => AppState::new(store, AllowAll),
    };
    let app = api::router(state, &runtime.base_path);

    let addr = SocketAddr::new(
        runtime
            .host
            .parse()
            .with_context(|| format!("parsing listen address {:?}", runtime.host))?,
        runtime.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding to {}", addr))?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running API server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", err);
    }
}
