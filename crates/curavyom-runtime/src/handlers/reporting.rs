//! Report generation handler.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use curavyom_core::{EvidenceScorer, ScoreResult};

use super::{unavailable_error, Fragment, HandlerError, TopicHandler};
use crate::agents::{consult_all, Specialist};
use crate::report::{ReportData, ReportRenderer};

const REPORT_SUMMARY: &str = "Automated analysis of drug repurposing candidates.";

/// Gathers specialist findings, scores them and renders a report.
pub struct ReportingHandler {
    specialists: Vec<Arc<dyn Specialist>>,
    specialist_timeout: Duration,
    scorer: EvidenceScorer,
    renderer: Arc<dyn ReportRenderer>,
}

impl ReportingHandler {
    pub fn new(
        specialists: Vec<Arc<dyn Specialist>>,
        specialist_timeout: Duration,
        renderer: Arc<dyn ReportRenderer>,
    ) -> Self {
        Self {
            specialists,
            specialist_timeout,
            scorer: EvidenceScorer::new(),
            renderer,
        }
    }
}

#[async_trait]
impl TopicHandler for ReportingHandler {
    fn name(&self) -> &str {
        "reporting"
    }

    async fn handle(&self, query: &str, timestamp: &str) -> Result<Fragment, HandlerError> {
        let fan_out = consult_all(&self.specialists, query, self.specialist_timeout).await;
        let evidence = fan_out.evidence();

        let score = self.scorer.score(&evidence).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Report evidence could not be scored");
            ScoreResult::unscored()
        });

        let findings: BTreeMap<String, String> = fan_out
            .reports
            .iter()
            .map(|r| (r.kind.display_name().to_string(), r.text.clone()))
            .collect();

        let data = ReportData {
            query: query.to_string(),
            summary: REPORT_SUMMARY.to_string(),
            score,
            findings,
            generated_at: timestamp.to_string(),
        };

        let location = self
            .renderer
            .render(&data)
            .await
            .map_err(|e| HandlerError::Failure(e.to_string()))?;

        let mut workflow: Vec<String> = self
            .specialists
            .iter()
            .map(|s| s.kind().as_str().to_string())
            .collect();
        workflow.push("report_generator".to_string());

        let mut fragment = Fragment::new(
            format!(
                "Report generated successfully. You can download it here: [Download PDF]({})",
                location
            ),
            workflow,
        )
        .with_metadata("report_location", serde_json::json!(location))
        .with_evidence(evidence);

        for (kind, err) in &fan_out.unavailable {
            fragment = fragment.with_error(unavailable_error(kind.as_str(), err));
        }

        Ok(fragment)
    }
}
