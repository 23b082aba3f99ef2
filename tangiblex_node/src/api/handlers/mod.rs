pub mod analysis;
pub mod assets;
pub mod kyc;
pub mod status;
pub mod yield_vault;

use crate::api::errors::ApiError;
use ethers::types::{Address, U256};

/// Decimal uint256 path parameter.
pub(crate) fn parse_asset_id(raw: &str) -> Result<U256, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::validation_error("assetId", "expected a decimal integer"));
    }
    U256::from_dec_str(trimmed)
        .map_err(|_| ApiError::validation_error("assetId", "out of uint256 range"))
}

pub(crate) fn parse_address(raw: &str) -> Result<Address, ApiError> {
    raw.trim()
        .parse::<Address>()
        .map_err(|_| ApiError::validation_error("address", "expected a 20-byte hex address"))
}
