//! Simulated research provider.
//!
//! Returns fixed research data after a configurable latency. The data set
//! is stable so downstream scoring is reproducible.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;

use curavyom_core::{Candidate, PatentStatus};

use super::{
    ClinicalTrialSummary, MarketSnapshot, PatentLandscape, ProviderError, ProviderFactory,
    RegulatoryGuidance, ResearchProvider, StudyRef,
};

const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct SimulatedProvider {
    latency: Duration,
}

impl SimulatedProvider {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Provider that answers immediately.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY)
    }
}

#[async_trait]
impl ResearchProvider for SimulatedProvider {
    async fn search_clinical_trials(
        &self,
        query: &str,
    ) -> Result<ClinicalTrialSummary, ProviderError> {
        self.delay().await;
        Ok(ClinicalTrialSummary {
            source: "ClinicalTrials.gov".to_string(),
            count: 45,
            top_studies: vec![
                StudyRef {
                    id: "NCT01234567".to_string(),
                    title: format!("Efficacy of {} in Alzheimer's", query),
                    status: "Completed".to_string(),
                },
                StudyRef {
                    id: "NCT07654321".to_string(),
                    title: format!("Phase 2 Study of {} for Neuroinflammation", query),
                    status: "Recruiting".to_string(),
                },
            ],
            biomarker: "BDNF".to_string(),
        })
    }

    async fn search_patents(&self, _query: &str) -> Result<PatentLandscape, ProviderError> {
        self.delay().await;
        Ok(PatentLandscape {
            source: "USPTO".to_string(),
            count: 12,
            freedom_to_operate: "High".to_string(),
            expiry_dates: vec!["2028-05-12".to_string(), "2030-11-01".to_string()],
        })
    }

    async fn search_market_data(&self, _query: &str) -> Result<MarketSnapshot, ProviderError> {
        self.delay().await;
        Ok(MarketSnapshot {
            cagr: "12.5%".to_string(),
            peak_sales: "$1.2B".to_string(),
            competitors: vec!["CompetitorA".to_string(), "CompetitorB".to_string()],
        })
    }

    async fn check_regulatory_guidelines(
        &self,
        _query: &str,
    ) -> Result<RegulatoryGuidance, ProviderError> {
        self.delay().await;
        Ok(RegulatoryGuidance {
            pathway: "505(b)(2)".to_string(),
            risk_level: "Low".to_string(),
            precedents: vec!["DrugX".to_string(), "DrugY".to_string()],
        })
    }

    async fn web_search(&self, query: &str) -> Result<Vec<String>, ProviderError> {
        self.delay().await;
        let subject = query.split_whitespace().last().unwrap_or(query);
        Ok(vec![
            format!(
                "Recent Phase 3 clinical trial results published in Nature Medicine demonstrate significant efficacy for {} in target indication.",
                subject
            ),
            "Leading industry analysts project strong market uptake due to unmet medical need."
                .to_string(),
            "Patent landscape analysis suggests clear freedom to operate in major markets."
                .to_string(),
        ])
    }

    async fn candidate_profiles(&self, _query: &str) -> Result<Vec<Candidate>, ProviderError> {
        self.delay().await;
        Ok(vec![
            Candidate::new("Metformin", 85.5)
                .with_clinical_count(45)
                .with_patent_status(PatentStatus::Expired)
                .with_market_potential("$1.2B"),
            Candidate::new("Rapamycin", 72.0)
                .with_clinical_count(12)
                .with_patent_status(PatentStatus::Active)
                .with_market_potential("$0.8B"),
            Candidate::new("Lithium", 64.0)
                .with_clinical_count(20)
                .with_patent_status(PatentStatus::Expired)
                .with_market_potential("$0.5B"),
            Candidate::new("Nilotinib", 58.5)
                .with_clinical_count(8)
                .with_patent_status(PatentStatus::Active)
                .with_market_potential("$2.1B"),
        ])
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

/// Factory for `type: simulated`. Accepts an optional humantime `latency`.
pub struct SimulatedProviderFactory;

impl SimulatedProviderFactory {
    fn latency(config: &JsonValue) -> Result<Duration, ProviderError> {
        match config.get("latency") {
            None | Some(JsonValue::Null) => Ok(DEFAULT_LATENCY),
            Some(JsonValue::String(raw)) => humantime::parse_duration(raw)
                .map_err(|e| ProviderError::InvalidConfig(format!("latency '{}': {}", raw, e))),
            Some(other) => Err(ProviderError::InvalidConfig(format!(
                "latency must be a duration string, got {}",
                other
            ))),
        }
    }
}

impl ProviderFactory for SimulatedProviderFactory {
    fn provider_type(&self) -> &'static str {
        "simulated"
    }

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn ResearchProvider>, ProviderError> {
        Ok(Arc::new(SimulatedProvider::new(Self::latency(config)?)))
    }

    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
        Self::latency(config).map(|_| ())
    }

    fn default_config(&self) -> JsonValue {
        serde_json::json!({ "type": "simulated", "latency": "500ms" })
    }

    fn description(&self) -> &'static str {
        "Fixed research data with simulated latency"
    }
}
