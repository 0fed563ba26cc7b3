//! Query orchestrator.
//!
//! One query moves through a fixed state machine:
//!
//! ```text
//! Received -> Classified -> Dispatched -> [Scored] -> [Compared] -> [Annotated] -> Returned
//! ```
//!
//! Optional stages run only when the handler's fragment asks for them
//! (evidence for scoring, candidates for comparison) and annotation only
//! when both the config and the handler allow it. Nothing is retried and
//! nothing is fatal: every failure becomes a tagged entry in
//! `metadata.errors` on an otherwise normal envelope.

use std::fmt;
use std::sync::Arc;
use tracing::Instrument;

use curavyom_core::{
    timestamp_now, Candidate, CandidateComparator, EnvelopeError, ErrorTag, EvidenceRecord,
    EvidenceScorer, IntentCatalog, IntentLabel, ResultEnvelope, ScoreResult, DEFAULT_SENDER,
};

use crate::annotations::AnnotationManager;
use crate::config::RuntimeConfig;
use crate::handlers::{render_comparison, Fragment, HandlerError, TopicHandler};
use crate::history::ConversationLog;
use crate::providers::{ProviderRegistry, ResearchProvider};
use crate::registry::SpecialistRegistry;
use crate::report::{ReportRenderer, SimulatedReportRenderer};
use crate::retrieval::{DocumentRetriever, InMemoryRetriever};
use crate::RuntimeError;

const AUDIT_TARGET: &str = "curavyom::audit";

/// Workflow tag for the evidence scoring stage.
pub const SCORER_STAGE: &str = "evidence_scorer";

/// Workflow tag for the candidate comparison stage.
pub const COMPARATOR_STAGE: &str = "comparison_engine";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Classified,
    Dispatched,
    Scored,
    Compared,
    Annotated,
    Returned,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::Classified => "classified",
            Stage::Dispatched => "dispatched",
            Stage::Scored => "scored",
            Stage::Compared => "compared",
            Stage::Annotated => "annotated",
            Stage::Returned => "returned",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routes queries to handlers and post-processes their output.
pub struct Orchestrator {
    catalog: IntentCatalog,
    registry: SpecialistRegistry,
    scorer: EvidenceScorer,
    comparator: CandidateComparator,
    annotations: AnnotationManager,
    log: Arc<ConversationLog>,
    config: RuntimeConfig,
    sender: String,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    pub fn classify(&self, query: &str) -> IntentLabel {
        self.catalog.classify(query)
    }

    /// Classify, dispatch and log one query.
    pub async fn process(&self, query: &str) -> ResultEnvelope {
        let seq = self.log.record_query(query);
        let span = tracing::info_span!("query", seq);

        async {
            tracing::info!(target: AUDIT_TARGET, stage = %Stage::Received, chars = query.chars().count());

            let label = self.classify(query);
            tracing::info!(target: AUDIT_TARGET, stage = %Stage::Classified, intent = %label);

            let envelope = if query.trim().is_empty() {
                self.empty_query()
            } else {
                self.dispatch(label, query).await
            };

            self.log.record_response(seq, label, &envelope);
            tracing::info!(
                target: AUDIT_TARGET,
                stage = %Stage::Returned,
                envelope_id = %envelope.id,
                errors = envelope.errors().len()
            );
            envelope
        }
        .instrument(span)
        .await
    }

    /// Run the handler for `label` and the stages its fragment calls for.
    /// Does not touch the conversation log.
    pub async fn dispatch(&self, label: IntentLabel, query: &str) -> ResultEnvelope {
        let timestamp = timestamp_now();

        let handler = match self.registry.get(label) {
            Some(handler) => handler,
            None => {
                let err = HandlerError::Failure(format!("No handler registered for {}", label));
                return self.degraded(label.as_str(), err, timestamp);
            }
        };

        let fragment = match self.invoke(handler.as_ref(), query, &timestamp).await {
            Ok(fragment) => fragment,
            Err(err) => return self.degraded(handler.name(), err, timestamp),
        };
        tracing::info!(
            target: AUDIT_TARGET,
            stage = %Stage::Dispatched,
            handler = handler.name(),
            workflow = ?fragment.workflow
        );

        let Fragment {
            text,
            workflow,
            metadata,
            evidence,
            candidates,
            errors,
        } = fragment;

        let mut envelope = ResultEnvelope::new(&self.sender, text, timestamp, workflow);
        for (key, value) in metadata {
            envelope.set_metadata(key, value);
        }
        for error in errors {
            envelope.push_error(error);
        }

        if let Some(evidence) = evidence {
            self.score_stage(&mut envelope, &evidence);
            tracing::info!(target: AUDIT_TARGET, stage = %Stage::Scored);
        }

        if let Some(candidates) = candidates {
            self.compare_stage(&mut envelope, &candidates);
            tracing::info!(target: AUDIT_TARGET, stage = %Stage::Compared);
        }

        if self.config.annotate && handler.annotate() {
            self.annotations.apply(&mut envelope);
            tracing::info!(target: AUDIT_TARGET, stage = %Stage::Annotated);
        }

        envelope
    }

    pub fn history(&self) -> &Arc<ConversationLog> {
        &self.log
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn catalog(&self) -> &IntentCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &SpecialistRegistry {
        &self.registry
    }

    async fn invoke(
        &self,
        handler: &dyn TopicHandler,
        query: &str,
        timestamp: &str,
    ) -> Result<Fragment, HandlerError> {
        let bound = handler.timeout().unwrap_or(self.config.handler_timeout);

        match tokio::time::timeout(bound, handler.handle(query, timestamp)).await {
            Ok(Ok(fragment)) => Ok(fragment),
            Ok(Err(e)) => {
                tracing::warn!(handler = handler.name(), error = %e, "Handler failed");
                Err(e)
            }
            Err(_) => {
                tracing::warn!(handler = handler.name(), timeout = ?bound, "Handler timed out");
                Err(HandlerError::Timeout(bound))
            }
        }
    }

    fn score_stage(&self, envelope: &mut ResultEnvelope, evidence: &EvidenceRecord) {
        match self.scorer.score(evidence) {
            Ok(result) => {
                envelope.text.push_str(&format!(
                    "\n\n**Confidence Score**: {:.1}/100 ({})",
                    result.total_score, result.confidence_level
                ));
                envelope.set_metadata("confidence_score", serde_json::json!(result.total_score));
                envelope.set_metadata("score", serde_json::json!(result));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Evidence could not be scored");
                envelope.text.push_str(&format!(
                    "\n\n**Confidence Score**: unavailable ({}). Treat these findings as low confidence.",
                    e
                ));
                envelope.set_metadata("confidence_score", serde_json::json!(0.0));
                envelope.set_metadata("score", serde_json::json!(ScoreResult::unscored()));
                envelope.push_error(EnvelopeError::new(e.tag(), SCORER_STAGE, e.to_string()));
            }
        }
        envelope.workflow.push(SCORER_STAGE.to_string());
    }

    fn compare_stage(&self, envelope: &mut ResultEnvelope, candidates: &[Candidate]) {
        match self.comparator.compare(candidates) {
            Ok(result) => {
                envelope.text.push_str(&render_comparison(&result));
                let confidence = if result.winner.score.is_finite() {
                    result.winner.score.clamp(0.0, 100.0)
                } else {
                    0.0
                };
                envelope.set_metadata("confidence_score", serde_json::json!(confidence));
                envelope.set_metadata("comparison", serde_json::json!(result));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Candidates could not be compared");
                envelope
                    .text
                    .push_str(&format!("\n\nComparison unavailable: {}.", e));
                envelope.set_metadata("confidence_score", serde_json::json!(0.0));
                envelope.set_metadata("score", serde_json::json!(ScoreResult::unscored()));
                envelope.push_error(EnvelopeError::new(e.tag(), COMPARATOR_STAGE, e.to_string()));
            }
        }
        envelope.workflow.push(COMPARATOR_STAGE.to_string());
    }

    /// Envelope for a handler that timed out or failed. Not annotated.
    fn degraded(&self, source: &str, err: HandlerError, timestamp: String) -> ResultEnvelope {
        let text = match &err {
            HandlerError::Timeout(after) => format!(
                "The {} handler did not respond within {}. Please try again shortly.",
                source,
                humantime::format_duration(*after)
            ),
            HandlerError::Failure(msg) => format!(
                "The {} handler could not complete this request: {}",
                source, msg
            ),
        };

        let mut envelope = ResultEnvelope::new(&self.sender, text, timestamp, vec![source.to_string()]);
        envelope.set_metadata("score", serde_json::json!(ScoreResult::unscored()));
        envelope.push_error(EnvelopeError::new(err.tag(), source, err.to_string()));
        envelope
    }

    fn empty_query(&self) -> ResultEnvelope {
        let mut envelope = ResultEnvelope::new(
            &self.sender,
            "Please enter a question about a drug, an indication or a repurposing candidate.",
            timestamp_now(),
            Vec::new(),
        );
        envelope.set_metadata("score", serde_json::json!(ScoreResult::unscored()));
        envelope.push_error(EnvelopeError::new(
            ErrorTag::EmptyInput,
            "orchestrator",
            "Query is empty",
        ));
        envelope
    }
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("registry", &self.registry)
            .field("annotators", &self.annotations.len())
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for [`Orchestrator`].
///
/// Anything not set falls back to what the config describes: the provider
/// is created from `config.provider`, the renderer writes under
/// `config.report_dir`.
pub struct OrchestratorBuilder {
    config: RuntimeConfig,
    provider: Option<Arc<dyn ResearchProvider>>,
    retriever: Option<Arc<dyn DocumentRetriever>>,
    renderer: Option<Arc<dyn ReportRenderer>>,
    annotations: Option<AnnotationManager>,
    log: Option<Arc<ConversationLog>>,
    handlers: Vec<(IntentLabel, Arc<dyn TopicHandler>)>,
    sender: String,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            provider: None,
            retriever: None,
            renderer: None,
            annotations: None,
            log: None,
            handlers: Vec::new(),
            sender: DEFAULT_SENDER.to_string(),
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn provider(mut self, provider: Arc<dyn ResearchProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn retriever(mut self, retriever: Arc<dyn DocumentRetriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn ReportRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn annotations(mut self, annotations: AnnotationManager) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// Share a log with other orchestrators.
    pub fn log(mut self, log: Arc<ConversationLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Replace the built-in handler for `label`.
    pub fn handler(mut self, label: IntentLabel, handler: Arc<dyn TopicHandler>) -> Self {
        self.handlers.push((label, handler));
        self
    }

    pub fn sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    pub fn build(self) -> Result<Orchestrator, RuntimeError> {
        self.config.validate()?;

        let provider = match self.provider {
            Some(provider) => provider,
            None => ProviderRegistry::with_defaults().create(&self.config.provider)?,
        };
        let retriever = self
            .retriever
            .unwrap_or_else(|| Arc::new(InMemoryRetriever::default()));
        let renderer = self
            .renderer
            .unwrap_or_else(|| Arc::new(SimulatedReportRenderer::new(self.config.report_dir.clone())));

        let mut registry =
            SpecialistRegistry::with_defaults(provider, retriever, renderer, &self.config);
        for (label, handler) in self.handlers {
            registry.register(label, handler);
        }
        if let Some(label) = registry.missing().into_iter().next() {
            return Err(RuntimeError::MissingHandler(label));
        }

        let catalog = self.config.intent_catalog();
        let shadowed = catalog.shadowed();
        if !shadowed.is_empty() {
            tracing::info!(count = shadowed.len(), "Intent catalog has unreachable keywords");
            for s in &shadowed {
                tracing::debug!(shadowed = ?s, "Unreachable keyword");
            }
        }

        Ok(Orchestrator {
            catalog,
            registry,
            scorer: EvidenceScorer::new(),
            comparator: CandidateComparator::new(),
            annotations: self.annotations.unwrap_or_else(AnnotationManager::with_defaults),
            log: self.log.unwrap_or_default(),
            config: self.config,
            sender: self.sender,
        })
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::Fragment;
    use crate::history::Role;
    use async_trait::async_trait;
    use curavyom_core::{validate_envelope, ConfidenceLevel, PatentFreedom};
    use std::time::Duration;

    use crate::providers::{
        ClinicalTrialSummary, MarketSnapshot, PatentLandscape, ProviderError, RegulatoryGuidance,
        SimulatedProvider,
    };

    fn orchestrator() -> Orchestrator {
        Orchestrator::builder()
            .provider(Arc::new(SimulatedProvider::instant()))
            .build()
            .unwrap()
    }

    struct SlowHandler;

    #[async_trait]
    impl TopicHandler for SlowHandler {
        fn name(&self) -> &str {
            "slow"
        }

        async fn handle(&self, _query: &str, _timestamp: &str) -> Result<Fragment, HandlerError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Fragment::new("never", ["slow"]))
        }
    }

    struct FixedHandler(Fragment);

    #[async_trait]
    impl TopicHandler for FixedHandler {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn handle(&self, _query: &str, _timestamp: &str) -> Result<Fragment, HandlerError> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_compare_end_to_end() {
        let orchestrator = orchestrator();
        let envelope = orchestrator.process("Compare Metformin and Rapamycin").await;

        assert_eq!(envelope.sender, "master");
        assert!(envelope.workflow.contains(&"comparison_engine".to_string()));
        assert!(envelope.text.starts_with("**Comparison Analysis**"));
        assert!(envelope.text.contains("Top candidate is Metformin with a score of 85.5."));
        assert!(envelope
            .text
            .contains("Metformin outperforms Rapamycin by 13.5 points, primarily due to stronger clinical evidence."));

        let confidence = envelope.metadata_value("confidence_score").unwrap().as_f64().unwrap();
        assert!((0.0..=100.0).contains(&confidence));
        assert_eq!(confidence, 85.5);
        assert!(envelope.metadata_value("risk_assessment").is_some());
        assert!(validate_envelope(&envelope).is_ok());
    }

    #[tokio::test]
    async fn test_standard_analysis_is_scored() {
        let orchestrator = orchestrator();
        let envelope = orchestrator.process("Evaluate metformin repurposing").await;

        assert_eq!(
            envelope.workflow,
            vec!["clinical", "patent", "market", "regulatory", "evidence_scorer"]
        );
        let score = envelope.score().unwrap();
        assert_eq!(score.total_score, 85.6);
        assert_eq!(score.confidence_level, ConfidenceLevel::High);
        assert!(envelope.text.ends_with("**Confidence Score**: 85.6/100 (High)"));
        assert!(!envelope.has_errors());
        assert!(validate_envelope(&envelope).is_ok());
    }

    #[tokio::test]
    async fn test_greeting_skips_annotation() {
        let orchestrator = orchestrator();
        let envelope = orchestrator.process("Hello").await;

        assert_eq!(envelope.workflow, vec!["general"]);
        assert!(envelope.text.starts_with("**Hello! I am the CuraVyom Master Orchestrator.**"));
        assert!(envelope.metadata_value("risk_assessment").is_none());
        assert!(envelope.metadata_value("fact_check").is_none());
        assert_eq!(envelope.metadata_value("confidence_score").unwrap(), 100);
    }

    #[tokio::test]
    async fn test_annotation_can_be_disabled() {
        let config = RuntimeConfig {
            annotate: false,
            ..Default::default()
        };
        let orchestrator = Orchestrator::builder()
            .config(config)
            .provider(Arc::new(SimulatedProvider::instant()))
            .build()
            .unwrap();

        let envelope = orchestrator.process("Compare Metformin and Rapamycin").await;
        assert!(envelope.metadata_value("risk_assessment").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_handler_timeout_degrades() {
        let orchestrator = Orchestrator::builder()
            .provider(Arc::new(SimulatedProvider::instant()))
            .handler(IntentLabel::Oncology, Arc::new(SlowHandler))
            .build()
            .unwrap();

        let envelope = orchestrator.process("Any oncology angle?").await;

        assert_eq!(envelope.workflow, vec!["slow"]);
        assert_eq!(
            envelope.text,
            "The slow handler did not respond within 10s. Please try again shortly."
        );
        let errors = envelope.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].tag, ErrorTag::HandlerTimeout);
        assert_eq!(errors[0].source, "slow");
        assert_eq!(envelope.score().unwrap().confidence_level, ConfidenceLevel::Low);
        assert!(envelope.metadata_value("risk_assessment").is_none());
        assert!(validate_envelope(&envelope).is_ok());
    }

    /// Simulated data, except market data never arrives.
    struct StalledMarketProvider(SimulatedProvider);

    #[async_trait]
    impl ResearchProvider for StalledMarketProvider {
        async fn search_clinical_trials(
            &self,
            query: &str,
        ) -> Result<ClinicalTrialSummary, ProviderError> {
            self.0.search_clinical_trials(query).await
        }

        async fn search_patents(&self, query: &str) -> Result<PatentLandscape, ProviderError> {
            self.0.search_patents(query).await
        }

        async fn search_market_data(&self, _query: &str) -> Result<MarketSnapshot, ProviderError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(ProviderError::Unavailable("market feed".to_string()))
        }

        async fn check_regulatory_guidelines(
            &self,
            query: &str,
        ) -> Result<RegulatoryGuidance, ProviderError> {
            self.0.check_regulatory_guidelines(query).await
        }

        async fn web_search(&self, query: &str) -> Result<Vec<String>, ProviderError> {
            self.0.web_search(query).await
        }

        async fn candidate_profiles(&self, query: &str) -> Result<Vec<Candidate>, ProviderError> {
            self.0.candidate_profiles(query).await
        }

        fn name(&self) -> &str {
            "stalled_market"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_specialist_keeps_other_findings() {
        let config = RuntimeConfig {
            handler_timeout: Duration::from_secs(3),
            specialist_timeout: Duration::from_secs(1),
            ..Default::default()
        };
        let orchestrator = Orchestrator::builder()
            .config(config)
            .provider(Arc::new(StalledMarketProvider(SimulatedProvider::instant())))
            .build()
            .unwrap();

        let envelope = orchestrator.process("Evaluate metformin repurposing").await;

        assert_eq!(
            envelope.workflow,
            vec!["clinical", "patent", "market", "regulatory", "evidence_scorer"]
        );
        assert!(envelope
            .text
            .contains("1. **Clinical Specialist**: Analyzed clinical data"));
        assert!(envelope
            .text
            .contains("2. **Patent Specialist**: Conducted IP landscape analysis."));
        assert!(envelope
            .text
            .contains("3. **Market Specialist**: Unavailable (Timeout after 1s)"));
        assert!(envelope.text.contains("4. **Regulatory Specialist**: Regulatory pathway"));

        let errors = envelope.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].tag, ErrorTag::HandlerTimeout);
        assert_eq!(errors[0].source, "market");

        // clinical 27 + credibility 18 + patent 25, no market contribution
        assert_eq!(envelope.score().unwrap().total_score, 70.0);
        assert!(validate_envelope(&envelope).is_ok());
    }

    #[tokio::test]
    async fn test_malformed_evidence_degrades_score() {
        let fragment = Fragment::new("Findings", ["clinical"]).with_evidence(EvidenceRecord {
            clinical_count: Some(10),
            patent_freedom: Some(PatentFreedom::High),
            market_cagr: Some("fast".to_string()),
        });
        let orchestrator = Orchestrator::builder()
            .provider(Arc::new(SimulatedProvider::instant()))
            .handler(IntentLabel::StandardAnalysis, Arc::new(FixedHandler(fragment)))
            .build()
            .unwrap();

        let envelope = orchestrator.dispatch(IntentLabel::StandardAnalysis, "anything").await;

        assert_eq!(envelope.workflow, vec!["clinical", "evidence_scorer"]);
        assert_eq!(envelope.score().unwrap(), ScoreResult::unscored());
        let errors = envelope.errors();
        assert_eq!(errors[0].tag, ErrorTag::MalformedInput);
        assert_eq!(errors[0].source, "evidence_scorer");
        assert!(envelope.text.contains("**Confidence Score**: unavailable"));
    }

    #[tokio::test]
    async fn test_empty_candidates_degrade_comparison() {
        let fragment = Fragment::new("**Comparison Analysis**", Vec::<String>::new())
            .with_candidates(Vec::new());
        let orchestrator = Orchestrator::builder()
            .provider(Arc::new(SimulatedProvider::instant()))
            .handler(IntentLabel::Comparison, Arc::new(FixedHandler(fragment)))
            .build()
            .unwrap();

        let envelope = orchestrator.process("compare nothing").await;

        assert_eq!(envelope.workflow, vec!["comparison_engine"]);
        assert_eq!(envelope.metadata_value("confidence_score").unwrap(), 0.0);
        assert_eq!(envelope.errors()[0].tag, ErrorTag::EmptyInput);
        assert!(envelope
            .text
            .ends_with("Comparison unavailable: No candidates provided for comparison."));
    }

    #[tokio::test]
    async fn test_empty_query() {
        let orchestrator = orchestrator();
        let envelope = orchestrator.process("   ").await;

        assert!(envelope.workflow.is_empty());
        assert_eq!(envelope.errors()[0].tag, ErrorTag::EmptyInput);
        assert_eq!(orchestrator.history().len(), 2);
        assert!(validate_envelope(&envelope).is_ok());
    }

    #[tokio::test]
    async fn test_process_logs_query_and_response() {
        let orchestrator = orchestrator();
        let envelope = orchestrator.process("Hello").await;

        let entries = orchestrator.history().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].role, Role::User);
        assert_eq!(entries[0].content, "Hello");
        assert_eq!(entries[1].reply_to, Some(0));
        assert_eq!(entries[1].envelope_id.as_deref(), Some(envelope.id.as_str()));
        assert_eq!(entries[1].intent, Some(IntentLabel::Greeting));
    }

    #[tokio::test]
    async fn test_dispatch_does_not_log() {
        let orchestrator = orchestrator();
        orchestrator.dispatch(IntentLabel::Safety, "toxicity?").await;
        assert!(orchestrator.history().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_queries_keep_log_consistent() {
        let orchestrator = Arc::new(orchestrator());
        let queries = ["Hello", "Compare Metformin and Rapamycin", "Market size?", "Propose uses"];

        let handles: Vec<_> = queries
            .iter()
            .map(|q| {
                let orchestrator = orchestrator.clone();
                let q = q.to_string();
                tokio::spawn(async move { orchestrator.process(&q).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let entries = orchestrator.history().entries();
        assert_eq!(entries.len(), 8);
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.seq, i as u64);
            if entry.role == Role::Assistant {
                let query = &entries[entry.reply_to.unwrap() as usize];
                assert_eq!(query.role, Role::User);
                assert!(query.seq < entry.seq);
            }
        }
    }

    #[tokio::test]
    async fn test_every_template_envelope_is_schema_valid() {
        let orchestrator = orchestrator();
        for label in IntentLabel::ALL {
            let envelope = orchestrator.dispatch(label, "Metformin repurposing outlook").await;
            assert!(
                validate_envelope(&envelope).is_ok(),
                "{} produced an invalid envelope",
                label
            );
        }
    }

    #[test]
    fn test_unknown_provider_type_fails_build() {
        let config = RuntimeConfig {
            provider: serde_json::json!({ "type": "ouija" }),
            ..Default::default()
        };
        let result = Orchestrator::builder().config(config).build();
        assert!(matches!(result, Err(RuntimeError::Provider(_))));
    }

    #[test]
    fn test_custom_catalog() {
        let config = RuntimeConfig::from_yaml(
            r#"
intents:
  - label: oncology
    keywords: ["tumour"]
"#,
        )
        .unwrap();
        let orchestrator = Orchestrator::builder()
            .config(config)
            .provider(Arc::new(SimulatedProvider::instant()))
            .build()
            .unwrap();

        assert_eq!(orchestrator.classify("tumour growth"), IntentLabel::Oncology);
        assert_eq!(orchestrator.classify("Compare A and B"), IntentLabel::StandardAnalysis);
    }
}
