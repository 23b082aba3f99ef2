//! EVM ledger access: contract ABIs, read-only accessors and the signed
//! oracle client.

pub mod abi;
pub mod asset_reader;
pub mod oracle_client;
pub mod types;
pub mod yield_reader;

use ethers::providers::{Http, Provider};
use std::sync::Arc;

pub use asset_reader::{AssetReader, AssetSource};
pub use oracle_client::{OracleSink, OracleUpdaterClient, SignerClient};
pub use types::{AssetRecord, AssetStatus, AssetType, EvmError, YieldPool};
pub use yield_reader::{YieldSource, YieldVaultReader};

/// Read-only JSON-RPC provider shared by the readers
pub fn http_provider(rpc_url: &str) -> Result<Arc<Provider<Http>>, EvmError> {
    Provider::<Http>::try_from(rpc_url)
        .map(Arc::new)
        .map_err(|e| EvmError::Upstream(format!("invalid RPC URL {rpc_url}: {e}")))
}
