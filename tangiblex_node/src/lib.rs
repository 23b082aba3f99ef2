//! TangibleX node: REST API over the RWA contracts, deterministic risk and
//! yield scoring, mock KYC intake and the oracle worker that pushes prices
//! and risk scores on-chain.

pub mod ai_services;
pub mod api;
pub mod config;
pub mod evm;
pub mod identity;
pub mod oracle;
pub mod signal;

pub use config::Config;
