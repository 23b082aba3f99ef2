//! Node configuration
//!
//! Built once at process start and passed to each component. Sources, lowest
//! precedence first: optional YAML file, `TANGIBLEX__SECTION__KEY` environment
//! variables, then the flat variable names used by existing deployments
//! (`ASSET_REGISTRY_ADDRESS`, `MANTLE_RPC_URL`, ...).

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat, Map};
use ethers::types::Address;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Looked up relative to the working directory; missing is fine.
pub const DEFAULT_CONFIG_PATH: &str = "config/default";

pub const ENV_PREFIX: &str = "TANGIBLEX";

/// Flat environment names and the config keys they override.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("PORT", "api.port"),
    ("MANTLE_RPC_URL", "chain.rpc_url"),
    ("KYC_MANAGER_ADDRESS", "contracts.kyc_manager"),
    ("ASSET_REGISTRY_ADDRESS", "contracts.asset_registry"),
    ("ORACLE_UPDATER_ADDRESS", "contracts.oracle_updater"),
    ("YIELD_VAULT_ADDRESS", "contracts.yield_vault"),
    ("PRIVATE_KEY", "oracle.private_key"),
    ("OPENAI_API_KEY", "analysis.api_key"),
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Remote ledger endpoint (Mantle Sepolia by default)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub explorer_url: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://rpc.sepolia.mantle.xyz".to_string(),
            chain_id: 5003,
            explorer_url: "https://sepolia.mantlescan.xyz".to_string(),
        }
    }
}

/// Deployed contract addresses. `None` means "not deployed yet".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContractsConfig {
    #[serde(deserialize_with = "deserialize_optional_address")]
    pub kyc_manager: Option<Address>,
    #[serde(deserialize_with = "deserialize_optional_address")]
    pub asset_registry: Option<Address>,
    #[serde(deserialize_with = "deserialize_optional_address")]
    pub oracle_updater: Option<Address>,
    #[serde(deserialize_with = "deserialize_optional_address")]
    pub yield_vault: Option<Address>,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Hex secp256k1 key, with or without `0x`
    pub private_key: Option<String>,
    pub interval_secs: u64,
    pub asset_ids: Vec<u64>,
    /// Read ids from the asset registry instead of `asset_ids`
    pub use_registry_ids: bool,
    pub risk_reason: String,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            private_key: None,
            interval_secs: 300,
            asset_ids: vec![0, 1, 2],
            use_registry_ids: false,
            risk_reason: "AI-calculated risk assessment".to_string(),
        }
    }
}

impl fmt::Debug for OracleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OracleConfig")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("interval_secs", &self.interval_secs)
            .field("asset_ids", &self.asset_ids)
            .field("use_registry_ids", &self.use_registry_ids)
            .field("risk_reason", &self.risk_reason)
            .finish()
    }
}

/// Chat-completion provider used for document analysis
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub request_timeout_secs: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            temperature: 0.3,
            request_timeout_secs: None,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Immutable node configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub chain: ChainConfig,
    pub contracts: ContractsConfig,
    pub oracle: OracleConfig,
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Load from `path` (or the default location) plus the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let vars: Map<String, String> = std::env::vars().collect();
        let builder = config::Config::builder();
        let builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_PATH).required(false)),
        };
        Self::finish(builder, vars)
    }

    /// Load from an in-memory YAML document and an explicit environment.
    pub fn from_yaml_str(yaml: &str, vars: Map<String, String>) -> Result<Self, ConfigError> {
        let builder = config::Config::builder().add_source(File::from_str(yaml, FileFormat::Yaml));
        Self::finish(builder, vars)
    }

    fn finish(
        builder: ConfigBuilder<DefaultState>,
        vars: Map<String, String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("oracle.asset_ids")
                .try_parsing(true)
                .source(Some(vars.clone())),
        );
        for (var, key) in LEGACY_ENV_KEYS {
            builder = builder.set_override_option(*key, vars.get(*var).cloned())?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.oracle.interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "oracle.interval_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.chain.rpc_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "chain.rpc_url",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// One-line summary safe to log (no secrets).
    pub fn summary(&self) -> String {
        fn show(addr: &Option<Address>) -> String {
            addr.map(|a| format!("{a:?}"))
                .unwrap_or_else(|| "not configured".to_string())
        }
        format!(
            "rpc={} chain_id={} explorer={} asset_registry={} yield_vault={} oracle_updater={} kyc_manager={} llm={}",
            self.chain.rpc_url,
            self.chain.chain_id,
            self.chain.explorer_url,
            show(&self.contracts.asset_registry),
            show(&self.contracts.yield_vault),
            show(&self.contracts.oracle_updater),
            show(&self.contracts.kyc_manager),
            if self.analysis.api_key.is_some() { "configured" } else { "mock only" },
        )
    }
}

/// Empty strings count as unset, matching how the deployment scripts blank
/// out addresses of contracts that are not deployed yet.
fn deserialize_optional_address<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<Address>()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid address {value}: {e}"))),
    }
}
