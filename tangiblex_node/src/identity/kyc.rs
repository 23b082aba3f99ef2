//! Mock KYC intake
//!
//! Documents are accepted and discarded; nothing is stored, so a status query
//! never reflects an earlier submission.

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const HASH_SUFFIX_LEN: usize = 6;
const MOCK_STATUS_HASH: &str = "QmMockHash123";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KycError {
    #[error("Address and document are required")]
    MissingFields,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KycSubmission {
    pub success: bool,
    pub document_hash: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KycStatus {
    pub status: String,
    /// Unix milliseconds
    pub submitted_at: i64,
    pub document_hash: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KycMockService;

impl KycMockService {
    pub fn new() -> Self {
        Self
    }

    pub fn submit(
        &self,
        address: Option<&str>,
        document: Option<&[u8]>,
    ) -> Result<KycSubmission, KycError> {
        let address = address.map(str::trim).filter(|a| !a.is_empty());
        let document = document.filter(|d| !d.is_empty());
        let (Some(address), Some(document)) = (address, document) else {
            return Err(KycError::MissingFields);
        };

        let document_hash = mock_document_hash();
        log::info!(
            "KYC document received for {} ({} bytes), issued {}",
            address,
            document.len(),
            document_hash
        );

        Ok(KycSubmission {
            success: true,
            document_hash,
            message: "KYC document submitted successfully. Awaiting verification.".to_string(),
        })
    }

    pub fn status(&self, _address: &str) -> KycStatus {
        KycStatus {
            status: "pending".to_string(),
            submitted_at: chrono::Utc::now().timestamp_millis(),
            document_hash: MOCK_STATUS_HASH.to_string(),
        }
    }
}

/// `Qm` followed by a short random base36 suffix.
pub fn mock_document_hash() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..HASH_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("Qm{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_issues_base36_hash() {
        let kyc = KycMockService::new();
        let receipt = kyc.submit(Some("0xabc"), Some(b"passport scan")).unwrap();
        assert!(receipt.success);
        assert!(receipt.document_hash.starts_with("Qm"));
        assert_eq!(receipt.document_hash.len(), 2 + HASH_SUFFIX_LEN);
        assert!(receipt.document_hash[2..]
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
        assert_eq!(
            receipt.message,
            "KYC document submitted successfully. Awaiting verification."
        );
    }

    #[test]
    fn test_submit_requires_both_fields() {
        let kyc = KycMockService::new();
        assert_eq!(kyc.submit(None, Some(b"doc")).unwrap_err(), KycError::MissingFields);
        assert_eq!(kyc.submit(Some("  "), Some(b"doc")).unwrap_err(), KycError::MissingFields);
        assert_eq!(kyc.submit(Some("0xabc"), None).unwrap_err(), KycError::MissingFields);
        assert_eq!(kyc.submit(Some("0xabc"), Some(b"")).unwrap_err(), KycError::MissingFields);
        assert_eq!(
            KycError::MissingFields.to_string(),
            "Address and document are required"
        );
    }

    #[test]
    fn test_status_is_fixed_mock() {
        let kyc = KycMockService::new();
        let issued = kyc.submit(Some("0xabc"), Some(b"doc")).unwrap();
        let status = kyc.status("0xabc");
        assert_eq!(status.status, "pending");
        assert_eq!(status.document_hash, "QmMockHash123");
        assert_ne!(status.document_hash, issued.document_hash);
        assert!(status.submitted_at > 0);
    }
}
