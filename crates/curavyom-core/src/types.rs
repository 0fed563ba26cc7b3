//! Shared types for routing, scoring, comparison and safety checks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Symbolic intent a query is routed to.
///
/// Variants are listed in default catalog order. `StandardAnalysis` is the
/// fallback and never appears in the catalog itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentLabel {
    Comparison,
    Hypothesis,
    Reporting,
    Safety,
    Mechanism,
    Clinical,
    Market,
    Regulatory,
    Dosage,
    IntellectualProperty,
    Manufacturing,
    Reimbursement,
    Combination,
    Competitor,
    Demographics,
    SupplyChain,
    GlobalMarket,
    RegionalRegulatory,
    GlobalClinical,
    RareDisease,
    Oncology,
    Infectious,
    Chronic,
    Tropical,
    Autoimmune,
    MentalHealth,
    Geriatric,
    Pediatric,
    WomensHealth,
    PrecisionMedicine,
    DigitalTherapeutics,
    Greeting,
    StandardAnalysis,
}

impl IntentLabel {
    /// Every label, fallback last.
    pub const ALL: [IntentLabel; 33] = [
        IntentLabel::Comparison,
        IntentLabel::Hypothesis,
        IntentLabel::Reporting,
        IntentLabel::Safety,
        IntentLabel::Mechanism,
        IntentLabel::Clinical,
        IntentLabel::Market,
        IntentLabel::Regulatory,
        IntentLabel::Dosage,
        IntentLabel::IntellectualProperty,
        IntentLabel::Manufacturing,
        IntentLabel::Reimbursement,
        IntentLabel::Combination,
        IntentLabel::Competitor,
        IntentLabel::Demographics,
        IntentLabel::SupplyChain,
        IntentLabel::GlobalMarket,
        IntentLabel::RegionalRegulatory,
        IntentLabel::GlobalClinical,
        IntentLabel::RareDisease,
        IntentLabel::Oncology,
        IntentLabel::Infectious,
        IntentLabel::Chronic,
        IntentLabel::Tropical,
        IntentLabel::Autoimmune,
        IntentLabel::MentalHealth,
        IntentLabel::Geriatric,
        IntentLabel::Pediatric,
        IntentLabel::WomensHealth,
        IntentLabel::PrecisionMedicine,
        IntentLabel::DigitalTherapeutics,
        IntentLabel::Greeting,
        IntentLabel::StandardAnalysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentLabel::Comparison => "comparison",
            IntentLabel::Hypothesis => "hypothesis",
            IntentLabel::Reporting => "reporting",
            IntentLabel::Safety => "safety",
            IntentLabel::Mechanism => "mechanism",
            IntentLabel::Clinical => "clinical",
            IntentLabel::Market => "market",
            IntentLabel::Regulatory => "regulatory",
            IntentLabel::Dosage => "dosage",
            IntentLabel::IntellectualProperty => "intellectual_property",
            IntentLabel::Manufacturing => "manufacturing",
            IntentLabel::Reimbursement => "reimbursement",
            IntentLabel::Combination => "combination",
            IntentLabel::Competitor => "competitor",
            IntentLabel::Demographics => "demographics",
            IntentLabel::SupplyChain => "supply_chain",
            IntentLabel::GlobalMarket => "global_market",
            IntentLabel::RegionalRegulatory => "regional_regulatory",
            IntentLabel::GlobalClinical => "global_clinical",
            IntentLabel::RareDisease => "rare_disease",
            IntentLabel::Oncology => "oncology",
            IntentLabel::Infectious => "infectious",
            IntentLabel::Chronic => "chronic",
            IntentLabel::Tropical => "tropical",
            IntentLabel::Autoimmune => "autoimmune",
            IntentLabel::MentalHealth => "mental_health",
            IntentLabel::Geriatric => "geriatric",
            IntentLabel::Pediatric => "pediatric",
            IntentLabel::WomensHealth => "womens_health",
            IntentLabel::PrecisionMedicine => "precision_medicine",
            IntentLabel::DigitalTherapeutics => "digital_therapeutics",
            IntentLabel::Greeting => "greeting",
            IntentLabel::StandardAnalysis => "standard_analysis",
        }
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Candidates
// ============================================================================

/// Patent status of a candidate. Anything other than `Expired`/`Active`
/// is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PatentStatus {
    Expired,
    Active,
    Other(String),
}

impl From<String> for PatentStatus {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("expired") {
            PatentStatus::Expired
        } else if value.eq_ignore_ascii_case("active") {
            PatentStatus::Active
        } else {
            PatentStatus::Other(value)
        }
    }
}

impl From<PatentStatus> for String {
    fn from(value: PatentStatus) -> Self {
        match value {
            PatentStatus::Expired => "Expired".to_string(),
            PatentStatus::Active => "Active".to_string(),
            PatentStatus::Other(other) => other,
        }
    }
}

/// A named entity under comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,

    #[serde(default)]
    pub score: f64,

    #[serde(default)]
    pub clinical_count: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patent_status: Option<PatentStatus>,

    /// Monetary magnitude such as "$1.2B"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_potential: Option<String>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            score,
            clinical_count: 0,
            patent_status: None,
            market_potential: None,
        }
    }

    pub fn with_clinical_count(mut self, count: u32) -> Self {
        self.clinical_count = count;
        self
    }

    pub fn with_patent_status(mut self, status: PatentStatus) -> Self {
        self.patent_status = Some(status);
        self
    }

    pub fn with_market_potential(mut self, potential: impl Into<String>) -> Self {
        self.market_potential = Some(potential.into());
        self
    }

    pub fn is_patent_expired(&self) -> bool {
        matches!(self.patent_status, Some(PatentStatus::Expired))
    }
}

/// Outcome of ranking a set of candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Candidates by score, highest first; ties keep input order
    pub ranked_list: Vec<Candidate>,

    pub winner: Candidate,

    pub summary: String,

    /// One statement per adjacent pair of `ranked_list`
    pub insights: Vec<String>,
}

// ============================================================================
// Evidence scoring
// ============================================================================

/// Freedom-to-operate rating, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PatentFreedom {
    Low,
    Medium,
    High,
}

impl PatentFreedom {
    /// Parse a free-form rating; unknown values are `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(PatentFreedom::High),
            "medium" => Some(PatentFreedom::Medium),
            "low" => Some(PatentFreedom::Low),
            _ => None,
        }
    }
}

/// Flat evidence consumed by the scorer. Absent fields score lowest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patent_freedom: Option<PatentFreedom>,

    /// Percentage such as "12.5%"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cagr: Option<String>,
}

impl EvidenceRecord {
    /// Fill fields missing here from `other`.
    pub fn merge(mut self, other: EvidenceRecord) -> Self {
        self.clinical_count = self.clinical_count.or(other.clinical_count);
        self.patent_freedom = self.patent_freedom.or(other.patent_freedom);
        self.market_cagr = self.market_cagr.or(other.market_cagr);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clinical_count.is_none() && self.patent_freedom.is_none() && self.market_cagr.is_none()
    }
}

/// Confidence band derived from a total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// `> 75` is High, `> 50` is Medium, everything else Low.
    pub fn from_score(score: f64) -> Self {
        if score > 75.0 {
            ConfidenceLevel::High
        } else if score > 50.0 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLevel::High => write!(f, "High"),
            ConfidenceLevel::Medium => write!(f, "Medium"),
            ConfidenceLevel::Low => write!(f, "Low"),
        }
    }
}

/// Weighted confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// 0-100, one decimal
    pub total_score: f64,

    pub confidence_level: ConfidenceLevel,

    /// Weighted contribution per factor, keyed like the weight table
    pub breakdown: BTreeMap<String, f64>,
}

impl ScoreResult {
    /// Zero-confidence result used when scoring could not run.
    pub fn unscored() -> Self {
        Self {
            total_score: 0.0,
            confidence_level: ConfidenceLevel::Low,
            breakdown: BTreeMap::new(),
        }
    }
}

// ============================================================================
// Safety findings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Safety,
    Legal,
    Market,
}

impl RiskCategory {
    pub fn severity(&self) -> Severity {
        match self {
            RiskCategory::Safety => Severity::High,
            RiskCategory::Legal | RiskCategory::Market => Severity::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Medium,
    High,
}

/// A risk keyword found in generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFinding {
    pub category: RiskCategory,
    pub keyword: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub has_risks: bool,
    pub risks: Vec<RiskFinding>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCheckResult {
    /// True iff `issues` is empty
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub verified_facts: Vec<String>,
}
