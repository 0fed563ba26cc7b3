//! Built-in specialists backed by a research provider or the document
//! retriever.

use async_trait::async_trait;
use std::sync::Arc;

use curavyom_core::{EvidenceRecord, PatentFreedom};

use super::{AgentError, Specialist, SpecialistKind, SpecialistReport};
use crate::providers::ResearchProvider;
use crate::retrieval::DocumentRetriever;

fn to_metadata<T: serde::Serialize>(data: &T) -> Result<serde_json::Value, AgentError> {
    serde_json::to_value(data).map_err(|e| AgentError::Failure(e.to_string()))
}

pub struct ClinicalSpecialist {
    provider: Arc<dyn ResearchProvider>,
}

impl ClinicalSpecialist {
    pub fn new(provider: Arc<dyn ResearchProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Specialist for ClinicalSpecialist {
    fn kind(&self) -> SpecialistKind {
        SpecialistKind::Clinical
    }

    async fn consult(&self, query: &str) -> Result<SpecialistReport, AgentError> {
        let data = self.provider.search_clinical_trials(query).await?;
        Ok(SpecialistReport {
            kind: self.kind(),
            text: format!(
                "Analyzed clinical data for '{}'. Found {} relevant studies from {}. Key biomarker: {}.",
                query, data.count, data.source, data.biomarker
            ),
            metadata: to_metadata(&data)?,
            evidence: EvidenceRecord {
                clinical_count: Some(data.count),
                ..Default::default()
            },
        })
    }
}

pub struct PatentSpecialist {
    provider: Arc<dyn ResearchProvider>,
}

impl PatentSpecialist {
    pub fn new(provider: Arc<dyn ResearchProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Specialist for PatentSpecialist {
    fn kind(&self) -> SpecialistKind {
        SpecialistKind::Patent
    }

    async fn consult(&self, query: &str) -> Result<SpecialistReport, AgentError> {
        let data = self.provider.search_patents(query).await?;
        let freedom = PatentFreedom::parse(&data.freedom_to_operate);
        if freedom.is_none() {
            tracing::debug!(value = %data.freedom_to_operate, "Unrecognized freedom-to-operate rating");
        }

        Ok(SpecialistReport {
            kind: self.kind(),
            text: format!(
                "Conducted IP landscape analysis. {} active patents found via {}. Freedom to operate: {}.",
                data.count, data.source, data.freedom_to_operate
            ),
            metadata: to_metadata(&data)?,
            evidence: EvidenceRecord {
                patent_freedom: freedom,
                ..Default::default()
            },
        })
    }
}

pub struct MarketSpecialist {
    provider: Arc<dyn ResearchProvider>,
}

impl MarketSpecialist {
    pub fn new(provider: Arc<dyn ResearchProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Specialist for MarketSpecialist {
    fn kind(&self) -> SpecialistKind {
        SpecialistKind::Market
    }

    async fn consult(&self, query: &str) -> Result<SpecialistReport, AgentError> {
        let data = self.provider.search_market_data(query).await?;
        Ok(SpecialistReport {
            kind: self.kind(),
            text: format!(
                "Market analysis: Global CAGR {}. Estimated peak sales: {}. Key competitors: {}.",
                data.cagr,
                data.peak_sales,
                data.competitors.join(", ")
            ),
            metadata: to_metadata(&data)?,
            evidence: EvidenceRecord {
                market_cagr: Some(data.cagr.clone()),
                ..Default::default()
            },
        })
    }
}

pub struct RegulatorySpecialist {
    provider: Arc<dyn ResearchProvider>,
}

impl RegulatorySpecialist {
    pub fn new(provider: Arc<dyn ResearchProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Specialist for RegulatorySpecialist {
    fn kind(&self) -> SpecialistKind {
        SpecialistKind::Regulatory
    }

    async fn consult(&self, query: &str) -> Result<SpecialistReport, AgentError> {
        let data = self.provider.check_regulatory_guidelines(query).await?;
        Ok(SpecialistReport {
            kind: self.kind(),
            text: format!(
                "Regulatory pathway: {}. Risk level: {}. Precedents: {}.",
                data.pathway,
                data.risk_level,
                data.precedents.join(", ")
            ),
            metadata: to_metadata(&data)?,
            evidence: EvidenceRecord::default(),
        })
    }
}

pub struct DocSpecialist {
    retriever: Arc<dyn DocumentRetriever>,
}

impl DocSpecialist {
    pub fn new(retriever: Arc<dyn DocumentRetriever>) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Specialist for DocSpecialist {
    fn kind(&self) -> SpecialistKind {
        SpecialistKind::Doc
    }

    async fn consult(&self, query: &str) -> Result<SpecialistReport, AgentError> {
        let documents = self.retriever.retrieve(query).await;
        let summary = documents
            .iter()
            .map(|d| d.content.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(SpecialistReport {
            kind: self.kind(),
            text: format!(
                "Retrieved {} internal documents. Summary: {}",
                documents.len(),
                summary
            ),
            metadata: serde_json::json!({ "documents": documents }),
            evidence: EvidenceRecord::default(),
        })
    }
}

pub struct SearchSpecialist {
    provider: Arc<dyn ResearchProvider>,
}

impl SearchSpecialist {
    pub fn new(provider: Arc<dyn ResearchProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Specialist for SearchSpecialist {
    fn kind(&self) -> SpecialistKind {
        SpecialistKind::Search
    }

    async fn consult(&self, query: &str) -> Result<SpecialistReport, AgentError> {
        let results = self.provider.web_search(query).await?;
        let top = results
            .first()
            .ok_or_else(|| AgentError::Failure("web search returned no results".to_string()))?;

        Ok(SpecialistReport {
            kind: self.kind(),
            text: format!("Web search results: {}", top),
            metadata: serde_json::json!({ "results": results }),
            evidence: EvidenceRecord::default(),
        })
    }
}

/// Build the built-in specialist for `kind`.
pub fn specialist_for(
    kind: SpecialistKind,
    provider: &Arc<dyn ResearchProvider>,
    retriever: &Arc<dyn DocumentRetriever>,
) -> Arc<dyn Specialist> {
    match kind {
        SpecialistKind::Clinical => Arc::new(ClinicalSpecialist::new(Arc::clone(provider))),
        SpecialistKind::Patent => Arc::new(PatentSpecialist::new(Arc::clone(provider))),
        SpecialistKind::Market => Arc::new(MarketSpecialist::new(Arc::clone(provider))),
        SpecialistKind::Regulatory => Arc::new(RegulatorySpecialist::new(Arc::clone(provider))),
        SpecialistKind::Doc => Arc::new(DocSpecialist::new(Arc::clone(retriever))),
        SpecialistKind::Search => Arc::new(SearchSpecialist::new(Arc::clone(provider))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::SimulatedProvider;
    use crate::retrieval::InMemoryRetriever;

    fn collaborators() -> (Arc<dyn ResearchProvider>, Arc<dyn DocumentRetriever>) {
        (
            Arc::new(SimulatedProvider::instant()),
            Arc::new(InMemoryRetriever::default()),
        )
    }

    #[tokio::test]
    async fn test_clinical_report() {
        let (provider, retriever) = collaborators();
        let report = specialist_for(SpecialistKind::Clinical, &provider, &retriever)
            .consult("Metformin")
            .await
            .unwrap();

        assert_eq!(report.kind, SpecialistKind::Clinical);
        assert_eq!(
            report.text,
            "Analyzed clinical data for 'Metformin'. Found 45 relevant studies from ClinicalTrials.gov. Key biomarker: BDNF."
        );
        assert_eq!(report.evidence.clinical_count, Some(45));
        assert_eq!(report.metadata["count"], 45);
    }

    #[tokio::test]
    async fn test_patent_report_carries_freedom() {
        let (provider, retriever) = collaborators();
        let report = specialist_for(SpecialistKind::Patent, &provider, &retriever)
            .consult("Metformin")
            .await
            .unwrap();
        assert_eq!(report.evidence.patent_freedom, Some(PatentFreedom::High));
        assert!(report.text.contains("Freedom to operate: High."));
    }

    #[tokio::test]
    async fn test_market_report_carries_cagr() {
        let (provider, retriever) = collaborators();
        let report = specialist_for(SpecialistKind::Market, &provider, &retriever)
            .consult("Metformin")
            .await
            .unwrap();
        assert_eq!(report.evidence.market_cagr.as_deref(), Some("12.5%"));
        assert_eq!(
            report.text,
            "Market analysis: Global CAGR 12.5%. Estimated peak sales: $1.2B. Key competitors: CompetitorA, CompetitorB."
        );
    }

    #[tokio::test]
    async fn test_regulatory_report_has_no_evidence() {
        let (provider, retriever) = collaborators();
        let report = specialist_for(SpecialistKind::Regulatory, &provider, &retriever)
            .consult("Metformin")
            .await
            .unwrap();
        assert!(report.evidence.is_empty());
        assert_eq!(
            report.text,
            "Regulatory pathway: 505(b)(2). Risk level: Low. Precedents: DrugX, DrugY."
        );
    }

    #[tokio::test]
    async fn test_doc_report_summarizes_matches() {
        let (provider, retriever) = collaborators();
        let report = specialist_for(SpecialistKind::Doc, &provider, &retriever)
            .consult("intranasal delivery")
            .await
            .unwrap();
        assert!(report.text.starts_with("Retrieved 1 internal documents."));
        assert_eq!(report.metadata["documents"][0]["id"], "doc2");
    }

    #[tokio::test]
    async fn test_search_report_uses_top_result() {
        let (provider, retriever) = collaborators();
        let report = specialist_for(SpecialistKind::Search, &provider, &retriever)
            .consult("latest on Metformin")
            .await
            .unwrap();
        assert!(report.text.starts_with("Web search results: Recent Phase 3"));
        assert_eq!(report.metadata["results"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_every_kind_is_built() {
        let (provider, retriever) = collaborators();
        for kind in SpecialistKind::ALL {
            assert_eq!(specialist_for(kind, &provider, &retriever).kind(), kind);
        }
    }
}
