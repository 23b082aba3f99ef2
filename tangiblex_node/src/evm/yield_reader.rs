//! Read-only access to the yield vault contract

use crate::evm::abi::{self, YIELD_VAULT_ABI};
use crate::evm::types::{EvmError, RawYieldPool, YieldPool};
use async_trait::async_trait;
use ethers::contract::Contract;
use ethers::providers::Middleware;
use ethers::types::{Address, U256};
use std::sync::Arc;

#[async_trait]
pub trait YieldSource: Send + Sync {
    fn is_deployed(&self) -> bool;

    async fn claimable_yield(&self, asset_id: U256, user: Address) -> Result<U256, EvmError>;

    async fn yield_pool(&self, asset_id: U256) -> Result<YieldPool, EvmError>;
}

pub struct YieldVaultReader<M> {
    contract: Option<Contract<M>>,
}

impl<M: Middleware + 'static> YieldVaultReader<M> {
    pub fn new(client: Arc<M>, vault: Option<Address>) -> Result<Self, EvmError> {
        let contract = match vault {
            Some(address) => Some(Contract::new(
                address,
                abi::load("YieldVault", YIELD_VAULT_ABI)?,
                client,
            )),
            None => None,
        };
        Ok(Self { contract })
    }

    fn contract(&self) -> Result<&Contract<M>, EvmError> {
        self.contract
            .as_ref()
            .ok_or(EvmError::NotDeployed("yield vault"))
    }
}

#[async_trait]
impl<M: Middleware + 'static> YieldSource for YieldVaultReader<M> {
    fn is_deployed(&self) -> bool {
        self.contract.is_some()
    }

    async fn claimable_yield(&self, asset_id: U256, user: Address) -> Result<U256, EvmError> {
        self.contract()?
            .method::<_, U256>("getClaimableYield", (asset_id, user))
            .map_err(|e| EvmError::Abi(e.to_string()))?
            .call()
            .await
            .map_err(|e| EvmError::Upstream(format!("getClaimableYield({asset_id}): {e}")))
    }

    async fn yield_pool(&self, asset_id: U256) -> Result<YieldPool, EvmError> {
        let raw = self
            .contract()?
            .method::<_, RawYieldPool>("yieldPools", asset_id)
            .map_err(|e| EvmError::Abi(e.to_string()))?
            .call()
            .await
            .map_err(|e| EvmError::Upstream(format!("yieldPools({asset_id}): {e}")))?;

        Ok(YieldPool::from(raw))
    }
}
