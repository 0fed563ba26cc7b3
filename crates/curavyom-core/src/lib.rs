//! # curavyom-core
//!
//! Deterministic building blocks of the CuraVyom query router.
//!
//! Everything in this crate is a pure function of its input:
//! - Intent classification over an ordered keyword catalog
//! - Weighted evidence scoring with a confidence band
//! - Candidate ranking with pairwise insights
//! - Advisory risk and fact checks over generated text
//! - The result envelope and its JSON Schema
//!
//! Dispatch, timeouts and concurrency live in `curavyom-runtime`.
//!
//! ## Example
//!
//! ```rust
//! use curavyom_core::{classify, score, EvidenceRecord, IntentLabel, PatentFreedom};
//!
//! assert_eq!(classify("Compare Metformin and Rapamycin"), IntentLabel::Comparison);
//!
//! let evidence = EvidenceRecord {
//!     clinical_count: Some(45),
//!     patent_freedom: Some(PatentFreedom::High),
//!     market_cagr: Some("12.5%".to_string()),
//! };
//! let result = score(&evidence).unwrap();
//! assert_eq!(result.total_score, 85.6);
//! ```

pub mod comparison;
pub mod envelope;
pub mod intent;
pub mod safety;
pub mod schema;
pub mod scoring;
pub mod types;

// Re-export main types at crate root
pub use comparison::{compare, Advantage, CandidateComparator};
pub use envelope::{
    timestamp_now, EnvelopeError, ErrorTag, Metadata, ResultEnvelope, DEFAULT_SENDER,
    TIMESTAMP_FORMAT,
};
pub use intent::{classify, IntentCatalog, IntentRule, ShadowedKeyword};
pub use safety::{assess_risk, verify, FactChecker, RiskDetector};
pub use schema::{validate_envelope, SchemaError};
pub use scoring::{score, EvidenceScorer, ScoringWeights};
pub use types::{
    Candidate, ComparisonResult, ConfidenceLevel, EvidenceRecord, FactCheckResult, IntentLabel,
    PatentFreedom, PatentStatus, RiskAssessment, RiskCategory, RiskFinding, ScoreResult,
    Severity,
};

use thiserror::Error;

/// Errors raised by the scoring and comparison engines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("{0}")]
    EmptyInput(String),

    #[error("Malformed {field}: {value:?}")]
    MalformedInput { field: String, value: String },
}

impl CoreError {
    pub fn malformed(field: impl Into<String>, value: impl Into<String>) -> Self {
        CoreError::MalformedInput {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Envelope error tag for this failure.
    pub fn tag(&self) -> ErrorTag {
        ErrorTag::from(self)
    }
}
