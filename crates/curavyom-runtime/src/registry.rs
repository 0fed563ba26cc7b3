//! Intent to handler mapping.

use std::collections::BTreeMap;
use std::sync::Arc;

use curavyom_core::IntentLabel;

use crate::agents::{specialist_for, Specialist, SpecialistKind};
use crate::config::RuntimeConfig;
use crate::handlers::{
    AnalysisHandler, ComparisonHandler, HypothesisHandler, ReportingHandler, TemplateHandler,
    TopicHandler, TOPIC_TEMPLATES,
};
use crate::providers::ResearchProvider;
use crate::report::ReportRenderer;
use crate::retrieval::DocumentRetriever;

/// Specialists gathered for a generated report.
const REPORT_SPECIALISTS: [SpecialistKind; 3] = [
    SpecialistKind::Clinical,
    SpecialistKind::Patent,
    SpecialistKind::Market,
];

/// One handler per intent label.
#[derive(Clone, Default)]
pub struct SpecialistRegistry {
    handlers: BTreeMap<IntentLabel, Arc<dyn TopicHandler>>,
}

impl SpecialistRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full registry: every label has a handler.
    pub fn with_defaults(
        provider: Arc<dyn ResearchProvider>,
        retriever: Arc<dyn DocumentRetriever>,
        renderer: Arc<dyn ReportRenderer>,
        config: &RuntimeConfig,
    ) -> Self {
        let mut registry = Self::new();

        for template in TOPIC_TEMPLATES.iter() {
            registry.register(template.label, Arc::new(TemplateHandler::new(template)));
        }

        registry.register(
            IntentLabel::Comparison,
            Arc::new(ComparisonHandler::new(provider.clone())),
        );
        registry.register(IntentLabel::Hypothesis, Arc::new(HypothesisHandler::default()));

        let build = |kinds: &[SpecialistKind]| -> Vec<Arc<dyn Specialist>> {
            kinds
                .iter()
                .map(|kind| specialist_for(*kind, &provider, &retriever))
                .collect()
        };

        registry.register(
            IntentLabel::Reporting,
            Arc::new(ReportingHandler::new(
                build(&REPORT_SPECIALISTS),
                config.specialist_timeout,
                renderer,
            )),
        );
        registry.register(
            IntentLabel::StandardAnalysis,
            Arc::new(
                AnalysisHandler::new(build(&config.analysis_specialists), config.specialist_timeout)
                    .refine_short_queries(config.refine_short_queries),
            ),
        );

        registry
    }

    /// Register `handler` for `label`, replacing any previous handler.
    pub fn register(&mut self, label: IntentLabel, handler: Arc<dyn TopicHandler>) {
        if self.handlers.insert(label, handler).is_some() {
            tracing::debug!(label = %label, "Replaced handler");
        }
    }

    pub fn get(&self, label: IntentLabel) -> Option<Arc<dyn TopicHandler>> {
        self.handlers.get(&label).cloned()
    }

    pub fn labels(&self) -> Vec<IntentLabel> {
        self.handlers.keys().copied().collect()
    }

    /// Labels with no handler.
    pub fn missing(&self) -> Vec<IntentLabel> {
        IntentLabel::ALL
            .iter()
            .copied()
            .filter(|label| !self.handlers.contains_key(label))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for SpecialistRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecialistRegistry")
            .field("labels", &self.labels())
            .finish()
    }
}
