use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use tangiblex_node::api::{start_api_server, AppState};
use tangiblex_node::Config;

/// TangibleX REST API
#[derive(Parser)]
#[clap(name = "api-server")]
#[clap(about = "TangibleX backend API: assets, analysis, KYC and yield endpoints")]
struct Args {
    /// YAML configuration file (defaults to config/default.yaml when present)
    #[clap(long)]
    config: Option<PathBuf>,

    /// Override the listen port
    #[clap(long)]
    port: Option<u16>,

    /// Override the bind address
    #[clap(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(host) = args.host {
        config.api.host = host;
    }

    info!("Starting TangibleX API server...");
    info!("{}", config.summary());

    let state = AppState::from_config(&config)?;
    start_api_server(&config.api, state).await
}
