//! Candidate ranking and pairwise advantage explanations.

use std::cmp::Ordering;

use crate::scoring::round1;
use crate::types::{Candidate, ComparisonResult};
use crate::CoreError;

/// Primary reason one candidate outranks its neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advantage {
    ClinicalEvidence,
    PatentFreedom,
    MarketPotential,
    BalancedProfile,
}

impl Advantage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Advantage::ClinicalEvidence => "stronger clinical evidence",
            Advantage::PatentFreedom => "better patent freedom",
            Advantage::MarketPotential => "higher market potential",
            Advantage::BalancedProfile => "overall balanced profile",
        }
    }

    /// Pick the first rule that favours `left` over `right`.
    pub fn between(left: &Candidate, right: &Candidate) -> Self {
        if left.clinical_count > right.clinical_count {
            return Advantage::ClinicalEvidence;
        }

        if left.is_patent_expired() && !right.is_patent_expired() {
            return Advantage::PatentFreedom;
        }

        match (market_magnitude(left), market_magnitude(right)) {
            (Ok(l), Ok(r)) if l > r => Advantage::MarketPotential,
            (Ok(_), Ok(_)) => Advantage::BalancedProfile,
            (l, r) => {
                tracing::debug!(
                    left = %left.name,
                    right = %right.name,
                    left_ok = l.is_ok(),
                    right_ok = r.is_ok(),
                    "Unparseable market potential, skipping market rule"
                );
                Advantage::BalancedProfile
            }
        }
    }
}

/// Ranks candidates and explains adjacent gaps.
#[derive(Debug, Clone, Default)]
pub struct CandidateComparator;

impl CandidateComparator {
    pub fn new() -> Self {
        Self
    }

    /// Rank `candidates` by score, highest first.
    ///
    /// # Errors
    ///
    /// `CoreError::EmptyInput` when `candidates` is empty.
    pub fn compare(&self, candidates: &[Candidate]) -> Result<ComparisonResult, CoreError> {
        if candidates.is_empty() {
            return Err(CoreError::EmptyInput(
                "No candidates provided for comparison".to_string(),
            ));
        }

        let mut ranked = candidates.to_vec();
        // slice::sort_by is stable, ties keep input order
        ranked.sort_by(|a, b| rank_score(b).partial_cmp(&rank_score(a)).unwrap_or(Ordering::Equal));

        let insights = ranked
            .windows(2)
            .map(|pair| {
                let (left, right) = (&pair[0], &pair[1]);
                let diff = round1(rank_score(left) - rank_score(right));
                format!(
                    "{} outperforms {} by {:.1} points, primarily due to {}.",
                    left.name,
                    right.name,
                    diff,
                    Advantage::between(left, right).as_str()
                )
            })
            .collect();

        let winner = ranked[0].clone();
        let summary = format!(
            "Top candidate is {} with a score of {:.1}.",
            winner.name,
            rank_score(&winner)
        );

        Ok(ComparisonResult {
            ranked_list: ranked,
            winner,
            summary,
            insights,
        })
    }
}

/// Compare with a default comparator.
pub fn compare(candidates: &[Candidate]) -> Result<ComparisonResult, CoreError> {
    CandidateComparator::new().compare(candidates)
}

/// Parse "$1.2B" into 1.2 (billions). Absent values are zero.
pub fn parse_market_potential(raw: &str) -> Result<f64, CoreError> {
    let trimmed = raw.trim();
    let without_currency = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let number = without_currency
        .strip_suffix('B')
        .unwrap_or(without_currency)
        .trim();

    match number.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CoreError::MalformedInput {
            field: "market_potential".to_string(),
            value: raw.to_string(),
        }),
    }
}

fn market_magnitude(candidate: &Candidate) -> Result<f64, CoreError> {
    candidate
        .market_potential
        .as_deref()
        .map(parse_market_potential)
        .unwrap_or(Ok(0.0))
}

fn rank_score(candidate: &Candidate) -> f64 {
    if candidate.score.is_finite() {
        candidate.score
    } else {
        0.0
    }
}
