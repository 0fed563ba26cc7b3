//! Standard analysis: the fallback handler.
//!
//! Fans the query out to the configured specialists, synthesizes whatever
//! came back, and hands the merged evidence to the scoring stage. A
//! specialist that fails or times out is listed as unavailable; the rest
//! of the synthesis still goes ahead.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use super::{unavailable_error, Fragment, HandlerError, TopicHandler};
use crate::agents::{consult_all, FanOut, Specialist, SpecialistKind};
use crate::reasoning::{reasoning_trace, refine_query};

pub struct AnalysisHandler {
    specialists: Vec<Arc<dyn Specialist>>,
    specialist_timeout: Duration,
    refine_short_queries: bool,
}

impl AnalysisHandler {
    pub fn new(specialists: Vec<Arc<dyn Specialist>>, specialist_timeout: Duration) -> Self {
        Self {
            specialists,
            specialist_timeout,
            refine_short_queries: true,
        }
    }

    pub fn refine_short_queries(mut self, enabled: bool) -> Self {
        self.refine_short_queries = enabled;
        self
    }

    fn synthesize(&self, fan_out: &FanOut) -> String {
        let mut text = String::from(
            "**Analysis Complete**\n\nBased on the analysis from the specialist agents, here are the findings:\n\n",
        );

        for (index, specialist) in self.specialists.iter().enumerate() {
            let kind = specialist.kind();
            let finding = match fan_out.report(kind) {
                Some(report) => report.text.clone(),
                None => match fan_out.unavailable.iter().find(|(k, _)| *k == kind) {
                    Some((_, err)) => format!("Unavailable ({})", err),
                    None => "Unavailable".to_string(),
                },
            };
            text.push_str(&format!(
                "{}. **{}**: {}\n",
                index + 1,
                kind.display_name(),
                finding
            ));
        }

        let recommendation = if fan_out.is_complete() {
            "Proceed with the repurposing candidate."
        } else {
            "Findings are partial. Re-run once every specialist responds before committing."
        };
        text.push_str(&format!("\n**Strategic Recommendation**: {}", recommendation));
        text
    }
}

#[async_trait]
impl TopicHandler for AnalysisHandler {
    fn name(&self) -> &str {
        "standard_analysis"
    }

    async fn handle(&self, query: &str, _timestamp: &str) -> Result<Fragment, HandlerError> {
        let fan_query = if self.refine_short_queries {
            refine_query(query)
        } else {
            query.to_string()
        };

        let fan_out = consult_all(&self.specialists, &fan_query, self.specialist_timeout).await;
        tracing::debug!(
            responded = fan_out.reports.len(),
            unavailable = fan_out.unavailable.len(),
            "Standard analysis fan-out finished"
        );

        let consulted: Vec<SpecialistKind> = self.specialists.iter().map(|s| s.kind()).collect();
        let reports: BTreeMap<String, serde_json::Value> = fan_out
            .reports
            .iter()
            .map(|r| (r.kind.as_str().to_string(), r.metadata.clone()))
            .collect();

        let mut fragment = Fragment::new(
            self.synthesize(&fan_out),
            consulted.iter().map(|k| k.as_str()),
        )
        .with_metadata("reasoning_trace", serde_json::json!(reasoning_trace(query, &consulted)))
        .with_metadata("specialist_reports", serde_json::json!(reports))
        .with_evidence(fan_out.evidence());

        if fan_query != query {
            fragment = fragment.with_metadata("refined_query", serde_json::json!(fan_query));
        }

        for (kind, err) in &fan_out.unavailable {
            fragment = fragment.with_error(unavailable_error(kind.as_str(), err));
        }

        Ok(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{specialist_for, AgentError, SpecialistReport};
    use crate::providers::{ResearchProvider, SimulatedProvider};
    use crate::retrieval::{DocumentRetriever, InMemoryRetriever};
    use curavyom_core::{ErrorTag, PatentFreedom};

    struct DownSpecialist(SpecialistKind);

    #[async_trait]
    impl Specialist for DownSpecialist {
        fn kind(&self) -> SpecialistKind {
            self.0
        }

        async fn consult(&self, _query: &str) -> Result<SpecialistReport, AgentError> {
            Err(AgentError::Failure("feed offline".to_string()))
        }
    }

    fn default_specialists() -> Vec<Arc<dyn Specialist>> {
        let provider: Arc<dyn ResearchProvider> = Arc::new(SimulatedProvider::instant());
        let retriever: Arc<dyn DocumentRetriever> = Arc::new(InMemoryRetriever::default());
        [
            SpecialistKind::Clinical,
            SpecialistKind::Patent,
            SpecialistKind::Market,
            SpecialistKind::Regulatory,
        ]
        .into_iter()
        .map(|kind| specialist_for(kind, &provider, &retriever))
        .collect()
    }

    #[tokio::test]
    async fn test_full_fan_out() {
        let handler = AnalysisHandler::new(default_specialists(), Duration::from_secs(5));
        let fragment = handler
            .handle("Evaluate metformin repurposing", "10:00 AM")
            .await
            .unwrap();

        assert_eq!(fragment.workflow, vec!["clinical", "patent", "market", "regulatory"]);
        assert!(fragment.text.starts_with("**Analysis Complete**"));
        assert!(fragment.text.contains("1. **Clinical Specialist**: Analyzed clinical data"));
        assert!(fragment.text.contains("Proceed with the repurposing candidate."));
        assert!(fragment.errors.is_empty());
        assert!(!fragment.metadata.contains_key("refined_query"));

        let evidence = fragment.evidence.unwrap();
        assert_eq!(evidence.clinical_count, Some(45));
        assert_eq!(evidence.patent_freedom, Some(PatentFreedom::High));
        assert_eq!(evidence.market_cagr.as_deref(), Some("12.5%"));
    }

    #[tokio::test]
    async fn test_short_query_is_refined_for_fan_out_only() {
        let handler = AnalysisHandler::new(default_specialists(), Duration::from_secs(5));
        let fragment = handler.handle("Metformin", "10:00 AM").await.unwrap();

        let refined = "Provide a detailed analysis of Metformin focusing on clinical efficacy and safety.";
        assert_eq!(fragment.metadata["refined_query"], refined);
        assert!(fragment.text.contains(&format!("Analyzed clinical data for '{}'", refined)));
        assert!(fragment.metadata["reasoning_trace"]
            .as_str()
            .unwrap()
            .contains("Detected query about 'Metformin'"));
    }

    #[tokio::test]
    async fn test_refinement_can_be_disabled() {
        let handler = AnalysisHandler::new(default_specialists(), Duration::from_secs(5))
            .refine_short_queries(false);
        let fragment = handler.handle("Metformin", "10:00 AM").await.unwrap();
        assert!(fragment.text.contains("Analyzed clinical data for 'Metformin'"));
        assert!(!fragment.metadata.contains_key("refined_query"));
    }

    #[tokio::test]
    async fn test_unavailable_specialist_is_noted() {
        let mut specialists = default_specialists();
        specialists[2] = Arc::new(DownSpecialist(SpecialistKind::Market));

        let handler = AnalysisHandler::new(specialists, Duration::from_secs(5));
        let fragment = handler
            .handle("Evaluate metformin repurposing", "10:00 AM")
            .await
            .unwrap();

        assert!(fragment
            .text
            .contains("3. **Market Specialist**: Unavailable (feed offline)"));
        assert!(fragment.text.contains("Findings are partial."));
        assert_eq!(fragment.errors.len(), 1);
        assert_eq!(fragment.errors[0].tag, ErrorTag::HandlerFailure);
        assert_eq!(fragment.errors[0].source, "market");

        let evidence = fragment.evidence.unwrap();
        assert_eq!(evidence.clinical_count, Some(45));
        assert!(evidence.market_cagr.is_none());
    }
}
