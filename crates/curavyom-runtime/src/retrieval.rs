//! Internal document retrieval.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

/// Source of internal documents for the document specialist.
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    /// Matching documents in corpus order. May be empty.
    async fn retrieve(&self, query: &str) -> Vec<Document>;
}

/// Keyword retriever over a fixed in-memory corpus.
///
/// A document matches when any lower-cased query word occurs in its
/// lower-cased content. When nothing matches the first document is
/// returned so the caller always has context to summarize.
#[derive(Debug, Clone)]
pub struct InMemoryRetriever {
    documents: Vec<Document>,
}

impl InMemoryRetriever {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }
}

impl Default for InMemoryRetriever {
    fn default() -> Self {
        Self::new(vec![
            Document::new(
                "doc1",
                "Internal Lab Note 101: Metformin reduces tau phosphorylation in murine models.",
            ),
            Document::new(
                "doc2",
                "Confidential Memo: Intranasal delivery bypasses BBB effectively.",
            ),
            Document::new(
                "doc3",
                "Clinical Strategy 2025: Focus on neuroinflammation targets.",
            ),
        ])
    }
}

#[async_trait]
impl DocumentRetriever for InMemoryRetriever {
    async fn retrieve(&self, query: &str) -> Vec<Document> {
        let lower = query.to_lowercase();
        let words: Vec<&str> = lower.split_whitespace().collect();

        let matches: Vec<Document> = self
            .documents
            .iter()
            .filter(|doc| {
                let content = doc.content.to_lowercase();
                words.iter().any(|word| content.contains(word))
            })
            .cloned()
            .collect();

        if matches.is_empty() {
            self.documents.first().cloned().into_iter().collect()
        } else {
            matches
        }
    }
}
