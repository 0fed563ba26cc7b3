//! Research data providers.
//!
//! Specialists reach external sources only through [`ResearchProvider`].
//! The built-in provider is simulated; real integrations register their
//! own [`ProviderFactory`] under a new type name.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use curavyom_core::Candidate;

mod factory;
mod simulated;

pub use factory::{ProviderFactory, ProviderRegistry};
pub use simulated::{SimulatedProvider, SimulatedProviderFactory};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid provider config: {0}")]
    InvalidConfig(String),

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyRef {
    pub id: String,
    pub title: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalTrialSummary {
    pub source: String,
    pub count: u32,
    pub top_studies: Vec<StudyRef>,
    pub biomarker: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatentLandscape {
    pub source: String,
    pub count: u32,
    pub freedom_to_operate: String,
    pub expiry_dates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Percentage such as "12.5%"
    pub cagr: String,
    pub peak_sales: String,
    pub competitors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryGuidance {
    pub pathway: String,
    pub risk_level: String,
    pub precedents: Vec<String>,
}

/// Source of research data for specialists.
#[async_trait]
pub trait ResearchProvider: Send + Sync {
    async fn search_clinical_trials(&self, query: &str)
        -> Result<ClinicalTrialSummary, ProviderError>;

    async fn search_patents(&self, query: &str) -> Result<PatentLandscape, ProviderError>;

    async fn search_market_data(&self, query: &str) -> Result<MarketSnapshot, ProviderError>;

    async fn check_regulatory_guidelines(
        &self,
        query: &str,
    ) -> Result<RegulatoryGuidance, ProviderError>;

    /// Result snippets, most relevant first.
    async fn web_search(&self, query: &str) -> Result<Vec<String>, ProviderError>;

    /// Profiles of known repurposing candidates.
    async fn candidate_profiles(&self, query: &str) -> Result<Vec<Candidate>, ProviderError>;

    /// Provider name for logs.
    fn name(&self) -> &str;
}
