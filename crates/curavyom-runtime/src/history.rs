//! Conversation log.
//!
//! Append-only record of queries and the envelopes answering them. Shared
//! between concurrent `process` calls; each append takes the lock once, so
//! sequence numbers are dense and every response follows its query.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use curavyom_core::{IntentLabel, ResultEnvelope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub seq: u64,
    pub role: Role,
    pub content: String,

    /// Set on assistant entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentLabel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope_id: Option<String>,

    /// Sequence number of the query this entry answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<u64>,

    pub at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct ConversationLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a user query. Returns its sequence number.
    pub fn record_query(&self, query: &str) -> u64 {
        let mut entries = self.entries.lock();
        let seq = entries.len() as u64;
        entries.push(LogEntry {
            seq,
            role: Role::User,
            content: query.to_string(),
            intent: None,
            envelope_id: None,
            reply_to: None,
            at: Utc::now(),
        });
        seq
    }

    /// Record the envelope answering query `reply_to`.
    pub fn record_response(
        &self,
        reply_to: u64,
        intent: IntentLabel,
        envelope: &ResultEnvelope,
    ) -> u64 {
        let mut entries = self.entries.lock();
        let seq = entries.len() as u64;
        entries.push(LogEntry {
            seq,
            role: Role::Assistant,
            content: envelope.text.clone(),
            intent: Some(intent),
            envelope_id: Some(envelope.id.clone()),
            reply_to: Some(reply_to),
            at: Utc::now(),
        });
        seq
    }

    /// Snapshot in append order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
