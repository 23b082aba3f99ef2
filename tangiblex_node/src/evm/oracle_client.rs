//! Signed writes to the oracle updater contract
//!
//! Each submission waits for one confirmation before returning, so a single
//! caller never has two transactions from the same signer in flight.

use crate::evm::abi::{self, ORACLE_UPDATER_ABI};
use crate::evm::types::EvmError;
use async_trait::async_trait;
use ethers::contract::{Contract, ContractCall};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, TxHash, U256, U64};
use log::debug;
use std::sync::Arc;

/// Destination for oracle updates
#[async_trait]
pub trait OracleSink: Send + Sync {
    async fn update_asset_price(
        &self,
        asset_id: U256,
        price: U256,
        confidence: U256,
    ) -> Result<TxHash, EvmError>;

    async fn update_risk_score(
        &self,
        asset_id: U256,
        score: U256,
        reason: &str,
    ) -> Result<TxHash, EvmError>;
}

pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

pub struct OracleUpdaterClient<M> {
    contract: Contract<M>,
}

impl OracleUpdaterClient<SignerClient> {
    /// Build a signing HTTP client for `oracle` on `chain_id`.
    pub fn connect(
        rpc_url: &str,
        chain_id: u64,
        private_key: &str,
        oracle: Address,
    ) -> Result<Self, EvmError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| EvmError::Upstream(format!("invalid RPC URL {rpc_url}: {e}")))?;
        let wallet = parse_wallet(private_key)?.with_chain_id(chain_id);
        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        Self::new(client, oracle)
    }
}

impl<M: Middleware + 'static> OracleUpdaterClient<M> {
    pub fn new(client: Arc<M>, oracle: Address) -> Result<Self, EvmError> {
        let contract = Contract::new(
            oracle,
            abi::load("OracleUpdater", ORACLE_UPDATER_ABI)?,
            client,
        );
        Ok(Self { contract })
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    async fn submit(&self, call: ContractCall<M, ()>, label: &str) -> Result<TxHash, EvmError> {
        let pending = call
            .send()
            .await
            .map_err(|e| EvmError::Upstream(format!("{label}: {e}")))?;
        let hash = pending.tx_hash();
        debug!("{} sent: {:?}", label, hash);

        let receipt = pending
            .confirmations(1)
            .await
            .map_err(|e| EvmError::Transaction {
                hash: format!("{hash:?}"),
                reason: e.to_string(),
            })?;

        match receipt {
            Some(receipt) if receipt.status == Some(U64::from(1)) => Ok(hash),
            Some(_) => Err(EvmError::Transaction {
                hash: format!("{hash:?}"),
                reason: "reverted on-chain".to_string(),
            }),
            None => Err(EvmError::Transaction {
                hash: format!("{hash:?}"),
                reason: "dropped before confirmation".to_string(),
            }),
        }
    }
}

#[async_trait]
impl<M: Middleware + 'static> OracleSink for OracleUpdaterClient<M> {
    async fn update_asset_price(
        &self,
        asset_id: U256,
        price: U256,
        confidence: U256,
    ) -> Result<TxHash, EvmError> {
        let call = self
            .contract
            .method::<_, ()>("updateAssetPrice", (asset_id, price, confidence))
            .map_err(|e| EvmError::Abi(e.to_string()))?;
        self.submit(call, "updateAssetPrice").await
    }

    async fn update_risk_score(
        &self,
        asset_id: U256,
        score: U256,
        reason: &str,
    ) -> Result<TxHash, EvmError> {
        let call = self
            .contract
            .method::<_, ()>("updateRiskScore", (asset_id, score, reason.to_string()))
            .map_err(|e| EvmError::Abi(e.to_string()))?;
        self.submit(call, "updateRiskScore").await
    }
}

/// Accepts keys with or without the `0x` prefix.
pub fn parse_wallet(private_key: &str) -> Result<LocalWallet, EvmError> {
    let key = private_key.trim();
    let key = key
        .strip_prefix("0x")
        .or_else(|| key.strip_prefix("0X"))
        .unwrap_or(key);
    key.parse::<LocalWallet>()
        .map_err(|e| EvmError::Signer(e.to_string()))
}
