//! Read-only access to the asset registry contract

use crate::evm::abi::{self, ASSET_REGISTRY_ABI};
use crate::evm::types::{AssetRecord, EvmError, RawAsset};
use async_trait::async_trait;
use ethers::contract::Contract;
use ethers::providers::Middleware;
use ethers::types::{Address, U256};
use std::sync::Arc;

/// Source of on-chain asset records
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Whether a registry address is configured
    fn is_deployed(&self) -> bool;

    /// Ids of active assets; empty when the registry is not deployed
    async fn list_active_asset_ids(&self) -> Result<Vec<U256>, EvmError>;

    async fn get_asset(&self, asset_id: U256) -> Result<AssetRecord, EvmError>;

    async fn asset_count(&self) -> Result<U256, EvmError>;
}

/// Asset registry reader over any ethers middleware
pub struct AssetReader<M> {
    contract: Option<Contract<M>>,
}

impl<M: Middleware + 'static> AssetReader<M> {
    pub fn new(client: Arc<M>, registry: Option<Address>) -> Result<Self, EvmError> {
        let contract = match registry {
            Some(address) => Some(Contract::new(
                address,
                abi::load("AssetRegistry", ASSET_REGISTRY_ABI)?,
                client,
            )),
            None => None,
        };
        Ok(Self { contract })
    }

    fn contract(&self) -> Result<&Contract<M>, EvmError> {
        self.contract
            .as_ref()
            .ok_or(EvmError::NotDeployed("asset registry"))
    }
}

#[async_trait]
impl<M: Middleware + 'static> AssetSource for AssetReader<M> {
    fn is_deployed(&self) -> bool {
        self.contract.is_some()
    }

    async fn list_active_asset_ids(&self) -> Result<Vec<U256>, EvmError> {
        let Some(contract) = self.contract.as_ref() else {
            return Ok(Vec::new());
        };

        contract
            .method::<_, Vec<U256>>("getActiveAssets", ())
            .map_err(|e| EvmError::Abi(e.to_string()))?
            .call()
            .await
            .map_err(|e| EvmError::Upstream(format!("getActiveAssets: {e}")))
    }

    async fn get_asset(&self, asset_id: U256) -> Result<AssetRecord, EvmError> {
        let raw = self
            .contract()?
            .method::<_, RawAsset>("getAsset", asset_id)
            .map_err(|e| EvmError::Abi(e.to_string()))?
            .call()
            .await
            .map_err(|e| EvmError::Upstream(format!("getAsset({asset_id}): {e}")))?;

        Ok(AssetRecord::from(raw))
    }

    async fn asset_count(&self) -> Result<U256, EvmError> {
        self.contract()?
            .method::<_, U256>("assetCount", ())
            .map_err(|e| EvmError::Abi(e.to_string()))?
            .call()
            .await
            .map_err(|e| EvmError::Upstream(format!("assetCount: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::{encode, Token};
    use ethers::providers::{Http, MockProvider, Provider};
    use ethers::types::Bytes;
    use crate::evm::types::{AssetStatus, AssetType};

    fn provider() -> Arc<Provider<Http>> {
        // Never dialled: these tests only exercise the not-deployed paths.
        Arc::new(Provider::<Http>::try_from("http://127.0.0.1:1").unwrap())
    }

    #[tokio::test]
    async fn test_unconfigured_registry_lists_nothing() {
        let reader = AssetReader::new(provider(), None).unwrap();
        assert!(!reader.is_deployed());
        assert!(reader.list_active_asset_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_registry_get_asset_errors() {
        let reader = AssetReader::new(provider(), None).unwrap();
        let err = reader.get_asset(U256::zero()).await.unwrap_err();
        assert!(matches!(err, EvmError::NotDeployed(_)));
    }

    #[test]
    fn test_configured_registry_is_deployed() {
        let reader = AssetReader::new(provider(), Some(Address::from_low_u64_be(0xaa))).unwrap();
        assert!(reader.is_deployed());
    }

    fn mocked_reader() -> (AssetReader<Provider<MockProvider>>, MockProvider) {
        let (provider, mock) = Provider::mocked();
        let reader =
            AssetReader::new(Arc::new(provider), Some(Address::from_low_u64_be(0xaa))).unwrap();
        (reader, mock)
    }

    #[tokio::test]
    async fn test_get_asset_decodes_registry_tuple() {
        let (reader, mock) = mocked_reader();
        let issuer = Address::from_low_u64_be(0x11);
        let reply = encode(&[Token::Tuple(vec![
            Token::String("QmDeed".to_string()),
            Token::Uint(U256::from(2u8)),
            Token::Uint(U256::from(1u8)),
            Token::Address(issuer),
            Token::Address(Address::zero()),
            Token::Uint(U256::from(2_000_000u64)),
            Token::Uint(U256::from(1_900_000_000u64)),
            Token::Uint(U256::from(1_700_000_000u64)),
            Token::Uint(U256::from(650u64)),
            Token::String("{\"city\":\"Austin\"}".to_string()),
        ])]);
        mock.push::<Bytes, _>(Bytes::from(reply)).unwrap();

        let asset = reader.get_asset(U256::from(7u64)).await.unwrap();
        assert_eq!(asset.ipfs_hash, "QmDeed");
        assert_eq!(asset.asset_type, Some(AssetType::Bond));
        assert_eq!(asset.status, AssetStatus::Active);
        assert_eq!(asset.issuer, issuer);
        assert_eq!(asset.token_address, None);
        assert_eq!(asset.total_value, U256::from(2_000_000u64));
        assert_eq!(asset.maturity_date, 1_900_000_000);
        assert_eq!(asset.created_at, 1_700_000_000);
        assert_eq!(asset.expected_yield, U256::from(650u64));
        assert_eq!(asset.metadata, "{\"city\":\"Austin\"}");
    }

    #[tokio::test]
    async fn test_active_ids_and_count_decode() {
        let (reader, mock) = mocked_reader();
        let ids = encode(&[Token::Array(vec![
            Token::Uint(U256::from(3u64)),
            Token::Uint(U256::from(5u64)),
        ])]);
        mock.push::<Bytes, _>(Bytes::from(ids)).unwrap();
        assert_eq!(
            reader.list_active_asset_ids().await.unwrap(),
            vec![U256::from(3u64), U256::from(5u64)]
        );

        let count = encode(&[Token::Uint(U256::from(6u64))]);
        mock.push::<Bytes, _>(Bytes::from(count)).unwrap();
        assert_eq!(reader.asset_count().await.unwrap(), U256::from(6u64));
    }

    #[tokio::test]
    async fn test_failed_call_is_upstream_error() {
        let (reader, _mock) = mocked_reader();
        let err = reader.get_asset(U256::one()).await.unwrap_err();
        assert!(matches!(err, EvmError::Upstream(ref msg) if msg.starts_with("getAsset(1)")));
    }
}
