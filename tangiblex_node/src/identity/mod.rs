//! Identity verification. Only a stateless KYC mock exists today.

pub mod kyc;

pub use kyc::{KycError, KycMockService, KycStatus, KycSubmission};
