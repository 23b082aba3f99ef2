// Scoring and document analysis for tokenized real-world assets.
// The risk model is pure; the analyzer degrades to a fixed result when the
// completion provider is missing or misbehaves.

pub mod document_analyzer;
pub mod llm_client;
pub mod risk_model;

pub use document_analyzer::{mock_analysis, AnalysisError, DocumentAnalysis, DocumentAnalyzer};
pub use llm_client::{CompletionProvider, OpenAiClient};
pub use risk_model::{AssetData, MarketConditions, RiskFactors, RiskYieldModel};
