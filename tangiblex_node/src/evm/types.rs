use ethers::types::{Address, U256};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors from ledger reads and writes
#[derive(Debug, Error)]
pub enum EvmError {
    #[error("{0} contract not deployed yet")]
    NotDeployed(&'static str),

    #[error("upstream fetch failed: {0}")]
    Upstream(String),

    #[error("transaction {hash} failed: {reason}")]
    Transaction { hash: String, reason: String },

    #[error("invalid signer configuration: {0}")]
    Signer(String),

    #[error("contract ABI error: {0}")]
    Abi(String),
}

/// Asset class as stored by the asset registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssetType {
    RealEstate,
    Invoice,
    Bond,
    Loan,
    Other,
}

impl AssetType {
    pub const ALL: [AssetType; 5] = [
        AssetType::RealEstate,
        AssetType::Invoice,
        AssetType::Bond,
        AssetType::Loan,
        AssetType::Other,
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }
}

/// Lifecycle state of a registered asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Active,
    Matured,
    Defaulted,
    Unknown(u8),
}

impl AssetStatus {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => AssetStatus::Pending,
            1 => AssetStatus::Active,
            2 => AssetStatus::Matured,
            3 => AssetStatus::Defaulted,
            other => AssetStatus::Unknown(other),
        }
    }
}

impl Serialize for AssetStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AssetStatus::Pending => serializer.serialize_str("Pending"),
            AssetStatus::Active => serializer.serialize_str("Active"),
            AssetStatus::Matured => serializer.serialize_str("Matured"),
            AssetStatus::Defaulted => serializer.serialize_str("Defaulted"),
            AssetStatus::Unknown(code) => serializer.serialize_str(&format!("Unknown({code})")),
        }
    }
}

/// Raw `getAsset` return tuple, in ABI order.
pub type RawAsset = (
    String,
    u8,
    u8,
    Address,
    Address,
    U256,
    U256,
    U256,
    U256,
    String,
);

/// Raw `yieldPools` return tuple, in ABI order.
pub type RawYieldPool = (Address, U256, U256, U256, U256, bool);

/// On-chain asset record. Owned by the ledger; never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub ipfs_hash: String,
    /// `None` when the registry holds a code outside the known set
    pub asset_type: Option<AssetType>,
    pub asset_type_code: u8,
    pub status: AssetStatus,
    pub issuer: Address,
    pub token_address: Option<Address>,
    #[serde(serialize_with = "serialize_u256_decimal")]
    pub total_value: U256,
    pub maturity_date: u64,
    pub created_at: u64,
    /// Basis points
    #[serde(serialize_with = "serialize_u256_decimal")]
    pub expected_yield: U256,
    pub metadata: String,
}

impl From<RawAsset> for AssetRecord {
    fn from(raw: RawAsset) -> Self {
        let (
            ipfs_hash,
            asset_type,
            status,
            issuer,
            token_address,
            total_value,
            maturity_date,
            created_at,
            expected_yield,
            metadata,
        ) = raw;

        Self {
            ipfs_hash,
            asset_type: AssetType::from_code(asset_type),
            asset_type_code: asset_type,
            status: AssetStatus::from_code(status),
            issuer,
            token_address: (!token_address.is_zero()).then_some(token_address),
            total_value,
            maturity_date: saturating_u64(maturity_date),
            created_at: saturating_u64(created_at),
            expected_yield,
            metadata,
        }
    }
}

/// Yield vault pool for one asset
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldPool {
    pub rwa_token: Address,
    #[serde(serialize_with = "serialize_u256_decimal")]
    pub total_yield_deposited: U256,
    #[serde(serialize_with = "serialize_u256_decimal")]
    pub total_yield_claimed: U256,
    pub last_distribution_time: u64,
    #[serde(serialize_with = "serialize_u256_decimal")]
    pub yield_rate: U256,
    pub active: bool,
}

impl From<RawYieldPool> for YieldPool {
    fn from(raw: RawYieldPool) -> Self {
        let (rwa_token, deposited, claimed, last_distribution, yield_rate, active) = raw;
        Self {
            rwa_token,
            total_yield_deposited: deposited,
            total_yield_claimed: claimed,
            last_distribution_time: saturating_u64(last_distribution),
            yield_rate,
            active,
        }
    }
}

fn saturating_u64(value: U256) -> u64 {
    if value > U256::from(u64::MAX) {
        u64::MAX
    } else {
        value.as_u64()
    }
}

/// uint256 values go out as decimal strings so JS clients keep full precision.
pub fn serialize_u256_decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}
