//! Asset document analysis backed by a chat-completion model
//!
//! Any failure, whether the provider is unreachable or its answer cannot be
//! parsed, yields the fixed [`mock_analysis`] so callers always get a result.

use crate::ai_services::llm_client::{CompletionProvider, OpenAiClient};
use crate::config::AnalysisConfig;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub const SYSTEM_PROMPT: &str = "You are an expert financial analyst specializing in real-world asset (RWA) tokenization. \
Analyze asset documents and provide structured insights including risk assessment, yield predictions, \
and valuation estimates. Return JSON format only.";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no completion provider configured")]
    NotConfigured,

    #[error("completion request failed: {0}")]
    Transport(String),

    #[error("completion provider responded with status {status}")]
    Status { status: u16 },

    #[error("malformed completion: {0}")]
    Malformed(String),
}

/// Structured result of a document analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalysis {
    /// 0-100, higher is riskier
    pub risk_score: u8,
    /// Annual percent
    pub expected_yield: f64,
    pub estimated_value: serde_json::Number,
    pub risk_factors: Vec<String>,
    pub recommendation: String,
}

/// The fixed analysis served whenever the model cannot be used.
pub fn mock_analysis() -> DocumentAnalysis {
    DocumentAnalysis {
        risk_score: 35,
        expected_yield: 6.5,
        estimated_value: serde_json::Number::from(500_000u64),
        risk_factors: vec![
            "Market volatility".to_string(),
            "Liquidity concerns".to_string(),
            "Regulatory compliance".to_string(),
        ],
        recommendation: "Moderate risk investment suitable for diversified portfolios".to_string(),
    }
}

pub fn user_prompt(document_text: &str) -> String {
    format!(
        "Analyze this asset document and provide:\n\
         1. Risk score (0-100, where 100 is highest risk)\n\
         2. Expected annual yield percentage\n\
         3. Estimated market value\n\
         4. Key risk factors\n\
         5. Investment recommendation\n\
         \n\
         Respond with a JSON object with exactly these keys: riskScore (integer), \
         expectedYield (number), estimatedValue (number), riskFactors (array of strings), \
         recommendation (string).\n\
         \n\
         Document: {document_text}"
    )
}

/// Parse the model's JSON answer, tolerating a surrounding code fence.
pub fn parse_analysis(content: &str) -> Result<DocumentAnalysis, AnalysisError> {
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let analysis: DocumentAnalysis =
        serde_json::from_str(body).map_err(|e| AnalysisError::Malformed(e.to_string()))?;
    if analysis.risk_score > 100 {
        return Err(AnalysisError::Malformed(format!(
            "riskScore {} out of range",
            analysis.risk_score
        )));
    }
    Ok(analysis)
}

pub struct DocumentAnalyzer {
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl DocumentAnalyzer {
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>) -> Self {
        Self { provider }
    }

    /// Uses the OpenAI-compatible client when an API key is configured.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let provider = OpenAiClient::from_config(config)?
            .map(|client| Arc::new(client) as Arc<dyn CompletionProvider>);
        Ok(Self::new(provider))
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn analyze_asset_document(&self, document_text: &str) -> DocumentAnalysis {
        match self.try_analyze(document_text).await {
            Ok(analysis) => analysis,
            Err(AnalysisError::NotConfigured) => {
                info!("AI analysis: no provider configured, serving mock analysis");
                mock_analysis()
            }
            Err(e @ (AnalysisError::Transport(_) | AnalysisError::Status { .. })) => {
                warn!("AI analysis: provider unreachable ({}), serving mock analysis", e);
                mock_analysis()
            }
            Err(e @ AnalysisError::Malformed(_)) => {
                warn!("AI analysis: unusable provider response ({}), serving mock analysis", e);
                mock_analysis()
            }
        }
    }

    pub async fn try_analyze(&self, document_text: &str) -> Result<DocumentAnalysis, AnalysisError> {
        let provider = self.provider.as_ref().ok_or(AnalysisError::NotConfigured)?;
        let content = provider
            .complete_json(SYSTEM_PROMPT, &user_prompt(document_text))
            .await?;
        parse_analysis(&content)
    }
}
