//! Human-readable ABIs of the TangibleX contracts this node talks to.

use crate::evm::types::EvmError;
use ethers::abi::{parse_abi, Abi};

pub const ASSET_REGISTRY_ABI: &[&str] = &[
    "function getAsset(uint256 assetId) external view returns ((string,uint8,uint8,address,address,uint256,uint256,uint256,uint256,string))",
    "function getActiveAssets() external view returns (uint256[])",
    "function assetCount() external view returns (uint256)",
];

pub const YIELD_VAULT_ABI: &[&str] = &[
    "function getClaimableYield(uint256 assetId, address user) external view returns (uint256)",
    "function yieldPools(uint256) external view returns (address, uint256, uint256, uint256, uint256, bool)",
];

pub const ORACLE_UPDATER_ABI: &[&str] = &[
    "function updateAssetPrice(uint256 assetId, uint256 price, uint256 confidence) external",
    "function updateRiskScore(uint256 assetId, uint256 score, string reason) external",
];

pub fn load(name: &str, definition: &[&str]) -> Result<Abi, EvmError> {
    parse_abi(definition).map_err(|e| EvmError::Abi(format!("{name}: {e}")))
}
