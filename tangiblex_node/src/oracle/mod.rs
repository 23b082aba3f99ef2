//! Periodic oracle job writing synthetic prices and model risk scores on-chain.

pub mod schedule;
pub mod worker;

pub use schedule::delay_until_next_tick;
pub use worker::{OracleWorker, TickReport};
