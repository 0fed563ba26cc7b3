//! Repurposing hypothesis generation.
//!
//! Hypotheses combine a known drug, a target indication and a mechanism.
//! Selection is a pure function of the query so repeated questions get
//! repeated answers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Fragment, HandlerError, TopicHandler};

const DRUGS: [&str; 4] = ["Rapamycin", "Metformin", "Lithium", "Nilotinib"];

const TARGETS: [&str; 4] = [
    "Alzheimer's Disease",
    "Parkinson's Disease",
    "ALS",
    "Huntington's Disease",
];

const MECHANISMS: [&str; 4] = [
    "inhibition of mTOR pathway",
    "reduction of neuroinflammation via NLRP3",
    "enhancement of autophagy",
    "modulation of GABAergic transmission",
];

const MIN_CONFIDENCE: u64 = 60;
const MAX_CONFIDENCE: u64 = 95;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub drug: String,
    pub target: String,
    pub mechanism: String,
    pub rationale: String,

    /// Percent, 60 to 95
    pub confidence: u8,
}

#[derive(Debug, Clone)]
pub struct HypothesisEngine {
    count: usize,
}

impl HypothesisEngine {
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    pub fn generate(&self, context: &str) -> Vec<Hypothesis> {
        let seed = fingerprint(context);

        (0..self.count)
            .map(|i| {
                let bits = seed.rotate_left((i as u32) * 17);
                let drug = DRUGS[(bits % 4) as usize];
                let target = TARGETS[((bits >> 8) % 4) as usize];
                let mechanism = MECHANISMS[((bits >> 16) % 4) as usize];
                let span = MAX_CONFIDENCE - MIN_CONFIDENCE + 1;
                let confidence = (MIN_CONFIDENCE + (bits >> 24) % span) as u8;

                Hypothesis {
                    drug: drug.to_string(),
                    target: target.to_string(),
                    mechanism: mechanism.to_string(),
                    rationale: format!(
                        "{} is known for {}, which is a key pathological feature in {}. Repurposing could slow disease progression.",
                        drug, mechanism, target
                    ),
                    confidence,
                }
            })
            .collect()
    }
}

impl Default for HypothesisEngine {
    fn default() -> Self {
        Self::new(3)
    }
}

// FNV-1a over the normalized query
fn fingerprint(context: &str) -> u64 {
    context
        .trim()
        .to_lowercase()
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
        })
}

#[derive(Debug, Default)]
pub struct HypothesisHandler {
    engine: HypothesisEngine,
}

impl HypothesisHandler {
    pub fn new(engine: HypothesisEngine) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl TopicHandler for HypothesisHandler {
    fn name(&self) -> &str {
        "hypothesis"
    }

    async fn handle(&self, query: &str, _timestamp: &str) -> Result<Fragment, HandlerError> {
        let hypotheses = self.engine.generate(query);

        let mut text = String::from("**Generated Hypotheses**\n\n");
        for h in &hypotheses {
            text.push_str(&format!(
                "- **{} for {}**: {} (Confidence: {}%)\n",
                h.drug, h.target, h.rationale, h.confidence
            ));
        }

        let mut fragment = Fragment::new(text, ["hypothesis_engine"]).with_metadata(
            "hypotheses",
            serde_json::to_value(&hypotheses).map_err(|e| HandlerError::Failure(e.to_string()))?,
        );

        if !hypotheses.is_empty() {
            let mean = hypotheses.iter().map(|h| u32::from(h.confidence)).sum::<u32>()
                / hypotheses.len() as u32;
            fragment = fragment.with_metadata("confidence_score", serde_json::json!(mean));
        }

        Ok(fragment)
    }
}
