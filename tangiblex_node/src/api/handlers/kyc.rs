use crate::api::errors::ApiResult;
use crate::api::server::AppState;
use crate::identity::{KycStatus, KycSubmission};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    response::Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct KycStatusResponse {
    pub status: KycStatus,
}

/// Multipart form with an `address` text field and a `document` file.
pub async fn submit_kyc(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<KycSubmission>> {
    let mut multipart = multipart?;

    let mut address: Option<String> = None;
    let mut document: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("address") => address = Some(field.text().await?),
            Some("document") => document = Some(field.bytes().await?.to_vec()),
            _ => {}
        }
    }

    let receipt = state
        .kyc
        .submit(address.as_deref(), document.as_deref())?;
    Ok(Json(receipt))
}

pub async fn kyc_status(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Json<KycStatusResponse> {
    Json(KycStatusResponse {
        status: state.kyc.status(&address),
    })
}
