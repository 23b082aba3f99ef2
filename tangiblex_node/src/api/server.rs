use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post},
    Router,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::ai_services::{DocumentAnalyzer, RiskYieldModel};
use crate::api::errors::ApiError;
use crate::api::handlers::{analysis, assets, kyc, status, yield_vault};
use crate::config::{ApiConfig, Config};
use crate::evm::{self, AssetReader, AssetSource, YieldSource, YieldVaultReader};
use crate::identity::KycMockService;
use crate::signal::shutdown_signal;

/// Upper bound for KYC document uploads
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Shared, immutable handler state
#[derive(Clone)]
pub struct AppState {
    pub assets: Arc<dyn AssetSource>,
    pub yields: Arc<dyn YieldSource>,
    pub model: RiskYieldModel,
    pub analyzer: Arc<DocumentAnalyzer>,
    pub kyc: KycMockService,
}

impl AppState {
    pub fn new(
        assets: Arc<dyn AssetSource>,
        yields: Arc<dyn YieldSource>,
        analyzer: Arc<DocumentAnalyzer>,
    ) -> Self {
        Self {
            assets,
            yields,
            model: RiskYieldModel::new(),
            analyzer,
            kyc: KycMockService::new(),
        }
    }

    /// Wire the chain readers and the analyzer from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = evm::http_provider(&config.chain.rpc_url)?;
        let assets = AssetReader::new(provider.clone(), config.contracts.asset_registry)
            .context("asset registry reader")?;
        let yields = YieldVaultReader::new(provider, config.contracts.yield_vault)
            .context("yield vault reader")?;
        let analyzer =
            DocumentAnalyzer::from_config(&config.analysis).context("document analyzer")?;

        if !analyzer.has_provider() {
            info!("No analysis API key configured, document analysis will return mock results");
        }

        Ok(Self::new(Arc::new(assets), Arc::new(yields), Arc::new(analyzer)))
    }
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

// API Router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(status::health_check))
        // Asset registry
        .route("/api/assets", get(assets::list_assets))
        .route("/api/assets/:id", get(assets::get_asset))
        // Scoring and document analysis
        .route("/api/analysis/document", post(analysis::analyze_document))
        .route("/api/analysis/risk-score", post(analysis::risk_score))
        .route("/api/analysis/yield-prediction", post(analysis::yield_prediction))
        // KYC
        .route("/api/kyc/submit", post(kyc::submit_kyc))
        .route("/api/kyc/status/:address", get(kyc::kyc_status))
        // Yield vault
        .route("/api/yield/claimable/:asset_id/:address", get(yield_vault::claimable_yield))
        .route("/api/yield/pool/:asset_id", get(yield_vault::yield_pool))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any),
        )
        .with_state(state)
}

// Server startup
pub async fn start_api_server(config: &ApiConfig, state: AppState) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("TangibleX API listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("TangibleX API stopped");
    Ok(())
}
