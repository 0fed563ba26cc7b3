//! Topic handlers.
//!
//! Each intent label maps to exactly one [`TopicHandler`]. A handler turns
//! a query into a [`Fragment`]; the orchestrator wraps the fragment in an
//! envelope and runs the scoring, comparison and annotation stages the
//! fragment asks for.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use curavyom_core::{Candidate, EnvelopeError, ErrorTag, EvidenceRecord, Metadata};

use crate::agents::AgentError;

mod analysis;
mod comparison;
mod hypothesis;
mod reporting;
mod topics;

pub use analysis::AnalysisHandler;
pub use comparison::{render_comparison, ComparisonHandler};
pub use hypothesis::{Hypothesis, HypothesisEngine, HypothesisHandler};
pub use reporting::ReportingHandler;
pub use topics::{TemplateHandler, TopicTemplate, TOPIC_TEMPLATES};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Failure(String),
}

impl HandlerError {
    pub fn tag(&self) -> ErrorTag {
        match self {
            HandlerError::Timeout(_) => ErrorTag::HandlerTimeout,
            HandlerError::Failure(_) => ErrorTag::HandlerFailure,
        }
    }
}

impl From<AgentError> for HandlerError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Timeout(after) => HandlerError::Timeout(after),
            AgentError::Failure(msg) => HandlerError::Failure(msg),
        }
    }
}

/// Envelope error for a specialist that could not contribute.
pub(crate) fn unavailable_error(source: &str, err: &AgentError) -> EnvelopeError {
    let tag = match err {
        AgentError::Timeout(_) => ErrorTag::HandlerTimeout,
        AgentError::Failure(_) => ErrorTag::HandlerFailure,
    };
    EnvelopeError::new(tag, source, err.to_string())
}

/// Handler output before the orchestrator's post-processing stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub text: String,

    /// Handler and specialist names, in invocation order
    pub workflow: Vec<String>,

    pub metadata: Metadata,

    /// Evidence for the scoring stage
    pub evidence: Option<EvidenceRecord>,

    /// Candidates for the comparison stage
    pub candidates: Option<Vec<Candidate>>,

    /// Partial failures to surface on the envelope
    pub errors: Vec<EnvelopeError>,
}

impl Fragment {
    pub fn new<I, S>(text: impl Into<String>, workflow: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: text.into(),
            workflow: workflow.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn with_evidence(mut self, evidence: EvidenceRecord) -> Self {
        self.evidence = Some(evidence);
        self
    }

    pub fn with_candidates(mut self, candidates: Vec<Candidate>) -> Self {
        self.candidates = Some(candidates);
        self
    }

    pub fn with_error(mut self, error: EnvelopeError) -> Self {
        self.errors.push(error);
        self
    }
}

/// Produces a response fragment for one intent.
///
/// Handlers hold no cross-call state. The orchestrator bounds each call
/// with [`TopicHandler::timeout`] and drops the future when it expires.
#[async_trait]
pub trait TopicHandler: Send + Sync {
    /// Name used in logs and error sources.
    fn name(&self) -> &str;

    async fn handle(&self, query: &str, timestamp: &str) -> Result<Fragment, HandlerError>;

    /// Per-handler bound; `None` uses the configured default.
    fn timeout(&self) -> Option<Duration> {
        None
    }

    /// Whether risk and fact-check annotation applies to this handler's
    /// output.
    fn annotate(&self) -> bool {
        true
    }
}
