//! Specialist trait and common types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use curavyom_core::EvidenceRecord;

use crate::providers::ProviderError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Failure(String),
}

impl From<ProviderError> for AgentError {
    fn from(err: ProviderError) -> Self {
        AgentError::Failure(err.to_string())
    }
}

/// The specialist roles a query can be fanned out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialistKind {
    Clinical,
    Patent,
    Market,
    Regulatory,
    Doc,
    Search,
}

impl SpecialistKind {
    pub const ALL: [SpecialistKind; 6] = [
        SpecialistKind::Clinical,
        SpecialistKind::Patent,
        SpecialistKind::Market,
        SpecialistKind::Regulatory,
        SpecialistKind::Doc,
        SpecialistKind::Search,
    ];

    /// Workflow tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialistKind::Clinical => "clinical",
            SpecialistKind::Patent => "patent",
            SpecialistKind::Market => "market",
            SpecialistKind::Regulatory => "regulatory",
            SpecialistKind::Doc => "doc",
            SpecialistKind::Search => "search",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SpecialistKind::Clinical => "Clinical Specialist",
            SpecialistKind::Patent => "Patent Specialist",
            SpecialistKind::Market => "Market Specialist",
            SpecialistKind::Regulatory => "Regulatory Specialist",
            SpecialistKind::Doc => "Internal Documents Specialist",
            SpecialistKind::Search => "Web Search Specialist",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for SpecialistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a specialist found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialistReport {
    pub kind: SpecialistKind,
    pub text: String,

    /// Raw source data
    pub metadata: serde_json::Value,

    /// Scorer-relevant fields this specialist can vouch for
    #[serde(default)]
    pub evidence: EvidenceRecord,
}

/// A specialist consulted during fan-out.
///
/// Specialists are independent: they see only the query and never each
/// other's reports, and hold no state across calls.
#[async_trait]
pub trait Specialist: Send + Sync {
    fn kind(&self) -> SpecialistKind;

    async fn consult(&self, query: &str) -> Result<SpecialistReport, AgentError>;

    /// Per-specialist bound; `None` uses the configured default.
    fn timeout(&self) -> Option<Duration> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in SpecialistKind::ALL {
            assert_eq!(SpecialistKind::parse(kind.as_str()), Some(kind));
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json.as_str(), Some(kind.as_str()));
        }
        assert_eq!(SpecialistKind::parse("Market"), Some(SpecialistKind::Market));
        assert_eq!(SpecialistKind::parse("finance"), None);
    }

    #[test]
    fn test_provider_error_becomes_failure() {
        let err: AgentError = ProviderError::Unavailable("USPTO".into()).into();
        assert_eq!(err, AgentError::Failure("Source unavailable: USPTO".into()));
    }
}
