use crate::api::errors::{ApiError, ApiResult, NOT_DEPLOYED_MESSAGE};
use crate::api::handlers::parse_asset_id;
use crate::api::server::AppState;
use crate::evm::AssetRecord;
use axum::{
    extract::{Path, State},
    response::Json,
};
use futures::future::try_join_all;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AssetsResponse {
    pub assets: Vec<AssetRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct AssetResponse {
    pub asset: AssetRecord,
}

/// All active assets, fetched concurrently.
pub async fn list_assets(State(state): State<AppState>) -> ApiResult<Json<AssetsResponse>> {
    if !state.assets.is_deployed() {
        return Ok(Json(AssetsResponse {
            assets: Vec::new(),
            message: Some(NOT_DEPLOYED_MESSAGE),
        }));
    }

    let ids = state.assets.list_active_asset_ids().await?;
    let assets = try_join_all(ids.into_iter().map(|id| state.assets.get_asset(id))).await?;

    Ok(Json(AssetsResponse { assets, message: None }))
}

pub async fn get_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> ApiResult<Json<AssetResponse>> {
    if !state.assets.is_deployed() {
        return Err(ApiError::not_found(NOT_DEPLOYED_MESSAGE));
    }

    let asset_id = parse_asset_id(&asset_id)?;
    let asset = state.assets.get_asset(asset_id).await?;
    Ok(Json(AssetResponse { asset }))
}
