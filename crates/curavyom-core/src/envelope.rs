//! Result envelope returned at the system boundary.
//!
//! The envelope is the one wire contract consumers depend on:
//! `{id, sender, text, timestamp, workflow, metadata?}`. When
//! `metadata.score` is present it has the [`ScoreResult`] shape.

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::types::ScoreResult;
use crate::CoreError;

/// Wall-clock format used for envelope timestamps, e.g. "03:42 PM".
pub const TIMESTAMP_FORMAT: &str = "%I:%M %p";

/// Sender name the orchestrator signs envelopes with.
pub const DEFAULT_SENDER: &str = "master";

/// Nested metadata, ordered by key.
pub type Metadata = BTreeMap<String, Value>;

/// Current local time in [`TIMESTAMP_FORMAT`].
pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Machine-readable failure category attached to an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorTag {
    EmptyInput,
    MalformedInput,
    HandlerTimeout,
    HandlerFailure,
}

impl From<&CoreError> for ErrorTag {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::EmptyInput(_) => ErrorTag::EmptyInput,
            CoreError::MalformedInput { .. } => ErrorTag::MalformedInput,
        }
    }
}

/// One failure noted on an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub tag: ErrorTag,

    /// Component that failed, e.g. "market" or "evidence_scorer"
    pub source: String,

    pub message: String,
}

impl EnvelopeError {
    pub fn new(tag: ErrorTag, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            tag,
            source: source.into(),
            message: message.into(),
        }
    }
}

/// Orchestrator output for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub id: String,
    pub sender: String,
    pub text: String,
    pub timestamp: String,
    pub workflow: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl ResultEnvelope {
    /// New envelope with a fresh v4 id.
    pub fn new(
        sender: impl Into<String>,
        text: impl Into<String>,
        timestamp: impl Into<String>,
        workflow: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender: sender.into(),
            text: text.into(),
            timestamp: timestamp.into(),
            workflow,
            metadata: None,
        }
    }

    /// Metadata map, created on first use.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        self.metadata.get_or_insert_with(Metadata::new)
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: Value) {
        self.metadata_mut().insert(key.into(), value);
    }

    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.metadata.as_ref().and_then(|m| m.get(key))
    }

    /// Typed view of `metadata.score`.
    pub fn score(&self) -> Option<ScoreResult> {
        self.metadata_value("score")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Typed view of `metadata.errors`.
    pub fn errors(&self) -> Vec<EnvelopeError> {
        self.metadata_value("errors")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    /// Append to `metadata.errors`.
    pub fn push_error(&mut self, error: EnvelopeError) {
        let mut errors = self.errors();
        errors.push(error);
        self.set_metadata("errors", serde_json::json!(errors));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }
}
