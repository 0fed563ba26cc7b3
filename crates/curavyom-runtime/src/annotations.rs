//! Post-response annotation.
//!
//! Annotators may ONLY add metadata. They never rewrite the response text,
//! reorder the workflow, or touch `metadata.score`. The manager restores
//! the text if an annotator changes it.

use curavyom_core::{FactChecker, ResultEnvelope, RiskDetector};

/// Hook run on a finished envelope.
pub trait EnvelopeAnnotator: Send + Sync {
    /// Metadata key this annotator writes.
    fn name(&self) -> &str;

    fn annotate(&self, envelope: &mut ResultEnvelope);
}

/// Writes `metadata.risk_assessment`.
#[derive(Debug, Default)]
pub struct RiskAnnotator {
    detector: RiskDetector,
}

impl RiskAnnotator {
    pub fn new(detector: RiskDetector) -> Self {
        Self { detector }
    }
}

impl EnvelopeAnnotator for RiskAnnotator {
    fn name(&self) -> &str {
        "risk_assessment"
    }

    fn annotate(&self, envelope: &mut ResultEnvelope) {
        let assessment = self.detector.assess(&envelope.text);
        if assessment.has_risks {
            tracing::info!(
                envelope_id = %envelope.id,
                risks = assessment.risks.len(),
                "Risk keywords flagged"
            );
        }
        envelope.set_metadata(self.name(), serde_json::json!(assessment));
    }
}

/// Writes `metadata.fact_check`.
#[derive(Debug, Default)]
pub struct FactCheckAnnotator {
    checker: FactChecker,
}

impl EnvelopeAnnotator for FactCheckAnnotator {
    fn name(&self) -> &str {
        "fact_check"
    }

    fn annotate(&self, envelope: &mut ResultEnvelope) {
        let result = self.checker.verify(&envelope.text);
        if !result.is_valid {
            tracing::warn!(
                envelope_id = %envelope.id,
                issues = ?result.issues,
                "Fact check raised issues"
            );
        }
        envelope.set_metadata(self.name(), serde_json::json!(result));
    }
}

/// Applies annotators in registration order.
pub struct AnnotationManager {
    annotators: Vec<Box<dyn EnvelopeAnnotator>>,
}

impl AnnotationManager {
    pub fn new() -> Self {
        Self {
            annotators: Vec::new(),
        }
    }

    /// Risk detection followed by fact checking.
    pub fn with_defaults() -> Self {
        let mut manager = Self::new();
        manager.add(Box::new(RiskAnnotator::default()));
        manager.add(Box::new(FactCheckAnnotator::default()));
        manager
    }

    pub fn add(&mut self, annotator: Box<dyn EnvelopeAnnotator>) {
        self.annotators.push(annotator);
    }

    pub fn len(&self) -> usize {
        self.annotators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotators.is_empty()
    }

    pub fn apply(&self, envelope: &mut ResultEnvelope) {
        let text = envelope.text.clone();
        let workflow = envelope.workflow.clone();
        let score = envelope.metadata_value("score").cloned();

        for annotator in &self.annotators {
            annotator.annotate(envelope);

            if envelope.text != text || envelope.workflow != workflow {
                tracing::warn!(
                    annotator = annotator.name(),
                    "Annotator changed the response; restoring"
                );
                envelope.text = text.clone();
                envelope.workflow = workflow.clone();
            }
            if envelope.metadata_value("score") != score.as_ref() {
                tracing::warn!(annotator = annotator.name(), "Annotator changed the score; restoring");
                match &score {
                    Some(original) => envelope.set_metadata("score", original.clone()),
                    None => {
                        envelope.metadata_mut().remove("score");
                    }
                }
            }
        }
    }
}

impl Default for AnnotationManager {
    fn default() -> Self {
        Self::new()
    }
}
