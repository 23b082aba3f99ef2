// TangibleX oracle worker
// Pushes synthetic prices and model risk scores to the OracleUpdater contract

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use tangiblex_node::evm::{self, AssetReader, AssetSource, OracleSink, OracleUpdaterClient};
use tangiblex_node::oracle::OracleWorker;
use tangiblex_node::signal::shutdown_signal;
use tangiblex_node::Config;

#[derive(Parser)]
#[command(name = "oracle-worker")]
#[command(about = "TangibleX oracle worker: periodic on-chain price and risk updates")]
struct Cli {
    /// YAML configuration file (defaults to config/default.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a single tick and exit
    #[arg(long)]
    once: bool,

    /// Override the tick period in seconds
    #[arg(long)]
    interval_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(interval) = cli.interval_secs.filter(|i| *i > 0) {
        config.oracle.interval_secs = interval;
    }

    let sink: Option<Arc<dyn OracleSink>> = match config.contracts.oracle_updater {
        Some(oracle) => {
            let key = config
                .oracle
                .private_key
                .as_deref()
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| anyhow!("PRIVATE_KEY is required when ORACLE_UPDATER_ADDRESS is set"))?;
            let client =
                OracleUpdaterClient::connect(&config.chain.rpc_url, config.chain.chain_id, key, oracle)
                    .context("oracle updater client")?;
            Some(Arc::new(client) as Arc<dyn OracleSink>)
        }
        None => None,
    };

    let registry: Option<Arc<dyn AssetSource>> = if config.oracle.use_registry_ids {
        let provider = evm::http_provider(&config.chain.rpc_url)?;
        let reader = AssetReader::new(provider, config.contracts.asset_registry)?;
        Some(Arc::new(reader) as Arc<dyn AssetSource>)
    } else {
        None
    };

    info!("Oracle worker started");
    info!("Connected to: {}", config.chain.rpc_url);
    info!(
        "Oracle address: {}",
        config
            .contracts
            .oracle_updater
            .map(|a| format!("{a:?}"))
            .unwrap_or_else(|| "Not configured".to_string())
    );
    info!("Explorer: {}", config.chain.explorer_url);

    let worker = OracleWorker::new(&config.oracle, sink, registry);
    info!("Period: {:?}", worker.period());

    if cli.once {
        let report = worker.run_tick().await;
        info!("Single tick finished: {} transaction(s)", report.transactions());
        return Ok(());
    }

    worker.run_until(shutdown_signal()).await;
    Ok(())
}
