//! Weighted evidence scoring.
//!
//! Four factors are scored on 0-100 and weighted into a total:
//!
//! | factor               | weight | factor score                         |
//! |----------------------|--------|--------------------------------------|
//! | `clinical_relevance` | 0.30   | `min(clinical_count * 2, 100)`       |
//! | `source_credibility` | 0.20   | `90` if any clinical study else `0`  |
//! | `patent_freedom`     | 0.25   | High `100`, Medium `50`, else `10`   |
//! | `market_viability`   | 0.25   | `min(cagr_percent * 5, 100)`         |

use std::collections::BTreeMap;

use crate::types::{ConfidenceLevel, EvidenceRecord, PatentFreedom, ScoreResult};
use crate::CoreError;

pub const CLINICAL_RELEVANCE: &str = "clinical_relevance";
pub const SOURCE_CREDIBILITY: &str = "source_credibility";
pub const PATENT_FREEDOM: &str = "patent_freedom";
pub const MARKET_VIABILITY: &str = "market_viability";

/// Factor weights. The defaults sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub clinical_relevance: f64,
    pub source_credibility: f64,
    pub patent_freedom: f64,
    pub market_viability: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            clinical_relevance: 0.30,
            source_credibility: 0.20,
            patent_freedom: 0.25,
            market_viability: 0.25,
        }
    }
}

/// Computes a 0-100 confidence score from an [`EvidenceRecord`].
#[derive(Debug, Clone, Default)]
pub struct EvidenceScorer {
    weights: ScoringWeights,
}

impl EvidenceScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a record.
    ///
    /// # Errors
    ///
    /// `CoreError::MalformedInput` when `market_cagr` is present but is not
    /// a finite number once a trailing `%` is removed.
    pub fn score(&self, evidence: &EvidenceRecord) -> Result<ScoreResult, CoreError> {
        let clinical_count = evidence.clinical_count.unwrap_or(0);

        let cagr = match evidence.market_cagr.as_deref() {
            Some(raw) => parse_percentage(raw)?,
            None => 0.0,
        };

        let factors = [
            (
                CLINICAL_RELEVANCE,
                clinical_factor(clinical_count),
                self.weights.clinical_relevance,
            ),
            (
                SOURCE_CREDIBILITY,
                if clinical_count > 0 { 90.0 } else { 0.0 },
                self.weights.source_credibility,
            ),
            (
                PATENT_FREEDOM,
                patent_factor(evidence.patent_freedom),
                self.weights.patent_freedom,
            ),
            (
                MARKET_VIABILITY,
                (cagr * 5.0).clamp(0.0, 100.0),
                self.weights.market_viability,
            ),
        ];

        let mut breakdown = BTreeMap::new();
        let mut total = 0.0;
        for (name, factor_score, weight) in factors {
            let contribution = factor_score * weight;
            total += contribution;
            breakdown.insert(name.to_string(), contribution);
        }

        let total = total.clamp(0.0, 100.0);

        tracing::debug!(total, clinical_count, cagr, "Evidence scored");

        Ok(ScoreResult {
            total_score: round1(total),
            confidence_level: ConfidenceLevel::from_score(total),
            breakdown,
        })
    }
}

/// Score with default weights.
pub fn score(evidence: &EvidenceRecord) -> Result<ScoreResult, CoreError> {
    EvidenceScorer::new().score(evidence)
}

fn clinical_factor(count: u32) -> f64 {
    (f64::from(count) * 2.0).min(100.0)
}

fn patent_factor(freedom: Option<PatentFreedom>) -> f64 {
    match freedom {
        Some(PatentFreedom::High) => 100.0,
        Some(PatentFreedom::Medium) => 50.0,
        Some(PatentFreedom::Low) | None => 10.0,
    }
}

/// Parse "12.5%" or "12.5" into 12.5.
pub fn parse_percentage(raw: &str) -> Result<f64, CoreError> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

    match number.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CoreError::MalformedInput {
            field: "market_cagr".to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(count: u32, freedom: PatentFreedom, cagr: &str) -> EvidenceRecord {
        EvidenceRecord {
            clinical_count: Some(count),
            patent_freedom: Some(freedom),
            market_cagr: Some(cagr.to_string()),
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        let w = ScoringWeights::default();
        let sum = w.clinical_relevance + w.source_credibility + w.patent_freedom + w.market_viability;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_evidence_scores_patent_floor() {
        let result = score(&record(0, PatentFreedom::Low, "0%")).unwrap();
        assert_eq!(result.total_score, 2.5);
        assert_eq!(result.confidence_level, ConfidenceLevel::Low);
    }

    #[test]
    fn test_saturated_evidence() {
        // Credibility tops out at 90, so the ceiling is 30 + 18 + 25 + 25.
        let result = score(&record(50, PatentFreedom::High, "20%")).unwrap();
        assert_eq!(result.total_score, 98.0);
        assert_eq!(result.confidence_level, ConfidenceLevel::High);
    }

    #[test]
    fn test_simulated_specialist_evidence() {
        let result = score(&record(45, PatentFreedom::High, "12.5%")).unwrap();
        assert_eq!(result.total_score, 85.6);
        assert_eq!(result.confidence_level, ConfidenceLevel::High);
    }

    #[test]
    fn test_empty_record_uses_lowest_assumptions() {
        let result = score(&EvidenceRecord::default()).unwrap();
        assert_eq!(result.total_score, 2.5);
        assert_eq!(result.confidence_level, ConfidenceLevel::Low);
    }

    #[test]
    fn test_breakdown_keys_match_weight_table() {
        let result = score(&record(10, PatentFreedom::Medium, "10%")).unwrap();
        let keys: Vec<&str> = result.breakdown.keys().map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![CLINICAL_RELEVANCE, MARKET_VIABILITY, PATENT_FREEDOM, SOURCE_CREDIBILITY]
        );
        assert!((result.breakdown[CLINICAL_RELEVANCE] - 6.0).abs() < 1e-9);
        assert!((result.breakdown[PATENT_FREEDOM] - 12.5).abs() < 1e-9);
        assert!((result.breakdown[MARKET_VIABILITY] - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_medium_band() {
        // 18 + 18 + 12.5 + 12.5 = 61
        let result = score(&record(30, PatentFreedom::Medium, "10%")).unwrap();
        assert_eq!(result.total_score, 61.0);
        assert_eq!(result.confidence_level, ConfidenceLevel::Medium);
    }

    #[test]
    fn test_cagr_without_percent_sign() {
        assert_eq!(parse_percentage("12.5").unwrap(), 12.5);
        assert_eq!(parse_percentage(" 6.2% ").unwrap(), 6.2);
    }

    #[test]
    fn test_malformed_cagr_is_reported() {
        let err = score(&record(10, PatentFreedom::High, "fast")).unwrap_err();
        assert!(matches!(err, CoreError::MalformedInput { ref field, .. } if field == "market_cagr"));

        assert!(parse_percentage("NaN%").is_err());
        assert!(parse_percentage("").is_err());
    }

    #[test]
    fn test_negative_cagr_stays_in_bounds() {
        let result = score(&record(0, PatentFreedom::Low, "-40%")).unwrap();
        assert_eq!(result.total_score, 2.5);
    }

    fn freedom_strategy() -> impl Strategy<Value = PatentFreedom> {
        prop_oneof![
            Just(PatentFreedom::Low),
            Just(PatentFreedom::Medium),
            Just(PatentFreedom::High),
        ]
    }

    proptest! {
        #[test]
        fn prop_total_within_bounds(
            count in 0u32..10_000,
            freedom in freedom_strategy(),
            cagr in -1_000.0f64..1_000.0,
        ) {
            let result = score(&record(count, freedom, &format!("{}%", cagr))).unwrap();
            prop_assert!(result.total_score >= 0.0 && result.total_score <= 100.0);
        }

        #[test]
        fn prop_monotone_in_clinical_count(
            count in 0u32..200,
            extra in 0u32..200,
            freedom in freedom_strategy(),
            cagr in 0.0f64..40.0,
        ) {
            let cagr = format!("{}%", cagr);
            let low = score(&record(count, freedom, &cagr)).unwrap();
            let high = score(&record(count + extra, freedom, &cagr)).unwrap();
            prop_assert!(high.total_score >= low.total_score);
        }

        #[test]
        fn prop_monotone_in_cagr(
            count in 0u32..100,
            freedom in freedom_strategy(),
            cagr in -10.0f64..40.0,
            extra in 0.0f64..40.0,
        ) {
            let low = score(&record(count, freedom, &format!("{}%", cagr))).unwrap();
            let high = score(&record(count, freedom, &format!("{}%", cagr + extra))).unwrap();
            prop_assert!(high.total_score >= low.total_score);
        }

        #[test]
        fn prop_monotone_in_patent_freedom(
            count in 0u32..100,
            cagr in 0.0f64..40.0,
            a in freedom_strategy(),
            b in freedom_strategy(),
        ) {
            let (worse, better) = if a <= b { (a, b) } else { (b, a) };
            let cagr = format!("{}%", cagr);
            let low = score(&record(count, worse, &cagr)).unwrap();
            let high = score(&record(count, better, &cagr)).unwrap();
            prop_assert!(high.total_score >= low.total_score);
        }
    }
}
