use crate::api::errors::{ApiResult, NOT_DEPLOYED_MESSAGE};
use crate::api::handlers::{parse_address, parse_asset_id};
use crate::api::server::AppState;
use crate::evm::YieldPool;
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ClaimableResponse {
    /// Decimal uint256
    pub claimable: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct PoolResponse {
    pub pool: Option<YieldPool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

pub async fn claimable_yield(
    State(state): State<AppState>,
    Path((asset_id, address)): Path<(String, String)>,
) -> ApiResult<Json<ClaimableResponse>> {
    if !state.yields.is_deployed() {
        return Ok(Json(ClaimableResponse {
            claimable: "0".to_string(),
            message: Some(NOT_DEPLOYED_MESSAGE),
        }));
    }

    let asset_id = parse_asset_id(&asset_id)?;
    let user = parse_address(&address)?;

    let claimable = state.yields.claimable_yield(asset_id, user).await?;
    Ok(Json(ClaimableResponse {
        claimable: claimable.to_string(),
        message: None,
    }))
}

pub async fn yield_pool(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> ApiResult<Json<PoolResponse>> {
    if !state.yields.is_deployed() {
        return Ok(Json(PoolResponse {
            pool: None,
            message: Some(NOT_DEPLOYED_MESSAGE),
        }));
    }

    let asset_id = parse_asset_id(&asset_id)?;

    let pool = state.yields.yield_pool(asset_id).await?;
    Ok(Json(PoolResponse {
        pool: Some(pool),
        message: None,
    }))
}
