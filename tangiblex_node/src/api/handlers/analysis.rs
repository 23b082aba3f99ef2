use crate::ai_services::{AssetData, DocumentAnalysis, MarketConditions};
use crate::api::errors::{ApiError, ApiResult};
use crate::api::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    pub document_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskScoreRequest {
    pub asset_data: Option<AssetData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldPredictionRequest {
    pub asset_data: Option<AssetData>,
    pub market_conditions: Option<MarketConditions>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis: DocumentAnalysis,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskScoreResponse {
    pub risk_score: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldPredictionResponse {
    pub predicted_yield: String,
}

pub async fn analyze_document(
    State(state): State<AppState>,
    payload: Result<Json<DocumentRequest>, JsonRejection>,
) -> ApiResult<Json<AnalysisResponse>> {
    let Json(request) = payload?;
    let text = request
        .document_text
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Document text is required"))?;

    let analysis = state.analyzer.analyze_asset_document(&text).await;
    Ok(Json(AnalysisResponse { analysis }))
}

pub async fn risk_score(
    State(state): State<AppState>,
    payload: Result<Json<RiskScoreRequest>, JsonRejection>,
) -> ApiResult<Json<RiskScoreResponse>> {
    let Json(request) = payload?;
    let asset = request
        .asset_data
        .ok_or_else(|| ApiError::bad_request("Asset data is required"))?;

    Ok(Json(RiskScoreResponse {
        risk_score: state.model.calculate_risk_score(&asset),
    }))
}

pub async fn yield_prediction(
    State(state): State<AppState>,
    payload: Result<Json<YieldPredictionRequest>, JsonRejection>,
) -> ApiResult<Json<YieldPredictionResponse>> {
    let Json(request) = payload?;
    let asset = request
        .asset_data
        .ok_or_else(|| ApiError::bad_request("Asset data is required"))?;
    let market = request.market_conditions.unwrap_or_default();

    Ok(Json(YieldPredictionResponse {
        predicted_yield: state.model.predict_yield(&asset, &market),
    }))
}
