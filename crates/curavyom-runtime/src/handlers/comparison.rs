//! Candidate comparison handler.

use async_trait::async_trait;
use std::sync::Arc;

use curavyom_core::{Candidate, ComparisonResult};

use super::{Fragment, HandlerError, TopicHandler};
use crate::providers::ResearchProvider;

/// Fewest candidates a comparison runs with.
const DEFAULT_PAIR: usize = 2;

/// Looks up the candidates a query names and hands them to the
/// orchestrator's comparison stage.
pub struct ComparisonHandler {
    provider: Arc<dyn ResearchProvider>,
}

impl ComparisonHandler {
    pub fn new(provider: Arc<dyn ResearchProvider>) -> Self {
        Self { provider }
    }

    /// Profiles named in the query, in profile order. Fewer than two names
    /// are topped up with the leading unnamed profiles.
    fn select(query: &str, profiles: Vec<Candidate>) -> Vec<Candidate> {
        let lower = query.to_lowercase();
        let (mut named, unnamed): (Vec<Candidate>, Vec<Candidate>) = profiles
            .into_iter()
            .partition(|c| lower.contains(&c.name.to_lowercase()));

        if named.len() < DEFAULT_PAIR {
            let missing = DEFAULT_PAIR - named.len();
            named.extend(unnamed.into_iter().take(missing));
        }
        named
    }
}

#[async_trait]
impl TopicHandler for ComparisonHandler {
    fn name(&self) -> &str {
        "comparison"
    }

    async fn handle(&self, query: &str, _timestamp: &str) -> Result<Fragment, HandlerError> {
        let profiles = self
            .provider
            .candidate_profiles(query)
            .await
            .map_err(|e| HandlerError::Failure(e.to_string()))?;

        let candidates = Self::select(query, profiles);
        tracing::debug!(
            candidates = ?candidates.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            "Candidates selected for comparison"
        );

        Ok(Fragment::new("**Comparison Analysis**", Vec::<String>::new())
            .with_candidates(candidates))
    }
}

/// Summary and insights block appended after the comparison stage.
pub fn render_comparison(result: &ComparisonResult) -> String {
    let mut text = format!("\n\n{}\n\n**Insights:**\n", result.summary);
    for insight in &result.insights {
        text.push_str("- ");
        text.push_str(insight);
        text.push('\n');
    }
    text
}
