//! Keyword intent classification.
//!
//! Classification walks an ordered table of `(label, keywords)` rules and
//! returns the first label with a keyword contained in the lower-cased
//! query. Declaration order is the tie-breaker: a query mentioning both
//! "compare" and "safety" resolves to `Comparison`.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::types::IntentLabel;

/// Default catalog, in match priority order.
const DEFAULT_RULES: &[(IntentLabel, &[&str])] = &[
    (IntentLabel::Comparison, &["compare"]),
    (IntentLabel::Hypothesis, &["hypothesis", "propose"]),
    (IntentLabel::Reporting, &["report"]),
    (IntentLabel::Safety, &["safety", "toxicity", "side effect", "adverse"]),
    (IntentLabel::Mechanism, &["mechanism", "how it works", "moa", "pathway"]),
    (IntentLabel::Clinical, &["clinical", "trial", "phase"]),
    (IntentLabel::Market, &["market", "sales", "revenue", "competition"]),
    (IntentLabel::Regulatory, &["regulatory", "approval", "fda", "ema", "orphan"]),
    (IntentLabel::Dosage, &["dosage", "dose", "formulation", "route", "pill"]),
    (IntentLabel::IntellectualProperty, &["patent", "expiry", "litigation", "ip"]),
    (
        IntentLabel::Manufacturing,
        &["manufacturing", "cmc", "synthesis", "impurity", "stability"],
    ),
    (
        IntentLabel::Reimbursement,
        &["reimbursement", "insurance", "pricing", "payer", "coverage"],
    ),
    (
        IntentLabel::Combination,
        &["combination", "synergy", "drug-drug", "interaction"],
    ),
    (
        IntentLabel::Competitor,
        &["competitor", "rival", "landscape", "market share"],
    ),
    (
        IntentLabel::Demographics,
        &["demographics", "patient", "population", "epidemiology"],
    ),
    (
        IntentLabel::SupplyChain,
        &["supply chain", "logistics", "sourcing", "vendor"],
    ),
    (
        IntentLabel::GlobalMarket,
        &["global market", "worldwide sales", "international trends"],
    ),
    (
        IntentLabel::RegionalRegulatory,
        &["china", "japan", "eu", "nmpa", "pmda", "tga", "regional"],
    ),
    (
        IntentLabel::GlobalClinical,
        &["global trials", "multi-regional", "diversity", "global sites"],
    ),
    (
        IntentLabel::RareDisease,
        &["rare disease", "orphan", "genetic", "mutation"],
    ),
    (
        IntentLabel::Oncology,
        &["cancer", "oncology", "tumor", "biomarker", "metastasis"],
    ),
    (
        IntentLabel::Infectious,
        &["infectious", "virus", "bacteria", "pandemic", "antimicrobial"],
    ),
    (
        IntentLabel::Chronic,
        &["chronic", "diabetes", "cardiovascular", "alzheimer", "neurodegenerative"],
    ),
    (
        IntentLabel::Tropical,
        &["tropical", "malaria", "dengue", "neglected", "parasitic"],
    ),
    (
        IntentLabel::Autoimmune,
        &["autoimmune", "rheumatoid", "lupus", "inflammation", "immunology"],
    ),
    (
        IntentLabel::MentalHealth,
        &["mental health", "depression", "anxiety", "schizophrenia", "psychiatry"],
    ),
    (
        IntentLabel::Geriatric,
        &["geriatric", "aging", "elderly", "sarcopenia", "frailty"],
    ),
    (IntentLabel::Pediatric, &["pediatric", "child", "infant", "juvenile"]),
    (
        IntentLabel::WomensHealth,
        &["women's health", "fertility", "maternal", "menopause", "pcos"],
    ),
    (
        IntentLabel::PrecisionMedicine,
        &["precision medicine", "genomics", "pgx", "personalized", "sequencing"],
    ),
    (
        IntentLabel::DigitalTherapeutics,
        &[
            "digital therapeutic",
            "dtx",
            "software as a medical device",
            "samd",
            "app",
        ],
    ),
    (IntentLabel::Greeting, &["hello", "hi", "help", "hey"]),
];

lazy_static! {
    static ref DEFAULT_CATALOG: IntentCatalog = IntentCatalog::default();
}

/// Classify a query against the default catalog.
pub fn classify(query: &str) -> IntentLabel {
    DEFAULT_CATALOG.classify(query)
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRule {
    pub label: IntentLabel,
    pub keywords: Vec<String>,
}

/// A keyword that can never select its own label because an earlier
/// rule's keyword is contained in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShadowedKeyword {
    pub label: IntentLabel,
    pub keyword: String,
    pub shadowed_by: IntentLabel,
    pub shadowing_keyword: String,
}

/// Ordered table of intent rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentCatalog {
    rules: Vec<IntentRule>,
}

impl IntentCatalog {
    /// Build a catalog from rules in priority order. Keywords are
    /// lower-cased; empty keywords are dropped since they would match
    /// every query.
    pub fn new(rules: Vec<IntentRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| IntentRule {
                label: rule.label,
                keywords: rule
                    .keywords
                    .into_iter()
                    .map(|k| k.to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .collect();

        Self { rules }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// Label for a query; `StandardAnalysis` when nothing matches.
    pub fn classify(&self, query: &str) -> IntentLabel {
        self.matched(query)
            .map(|(label, _)| label)
            .unwrap_or(IntentLabel::StandardAnalysis)
    }

    /// The winning rule label and the keyword that triggered it.
    pub fn matched(&self, query: &str) -> Option<(IntentLabel, &str)> {
        let lower = query.to_lowercase();

        self.rules.iter().find_map(|rule| {
            rule.keywords
                .iter()
                .find(|kw| lower.contains(kw.as_str()))
                .map(|kw| (rule.label, kw.as_str()))
        })
    }

    /// Keywords that lose to an earlier rule even when queried alone.
    pub fn shadowed(&self) -> Vec<ShadowedKeyword> {
        let mut shadowed = Vec::new();

        for (index, rule) in self.rules.iter().enumerate() {
            for keyword in &rule.keywords {
                let earlier = self.rules[..index]
                    .iter()
                    .filter(|earlier| earlier.label != rule.label)
                    .find_map(|earlier| {
                        earlier
                            .keywords
                            .iter()
                            .find(|other| keyword.contains(other.as_str()))
                            .map(|other| (earlier.label, other))
                    });

                if let Some((label, other)) = earlier {
                    shadowed.push(ShadowedKeyword {
                        label: rule.label,
                        keyword: keyword.clone(),
                        shadowed_by: label,
                        shadowing_keyword: other.clone(),
                    });
                }
            }
        }

        shadowed
    }
}

impl Default for IntentCatalog {
    fn default() -> Self {
        Self::new(
            DEFAULT_RULES
                .iter()
                .map(|(label, keywords)| IntentRule {
                    label: *label,
                    keywords: keywords.iter().map(|k| k.to_string()).collect(),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_falls_back() {
        assert_eq!(classify(""), IntentLabel::StandardAnalysis);
        assert_eq!(classify("   "), IntentLabel::StandardAnalysis);
    }

    #[test]
    fn test_keyword_free_query_falls_back() {
        assert_eq!(classify("Metformin"), IntentLabel::StandardAnalysis);
        assert_eq!(classify("Evaluate Rapamycin for longevity"), IntentLabel::StandardAnalysis);
    }

    #[test]
    fn test_every_keyword_routes_to_first_matching_rule() {
        let catalog = IntentCatalog::default();

        for rule in catalog.rules() {
            for keyword in &rule.keywords {
                let expected = catalog
                    .rules()
                    .iter()
                    .find(|r| r.keywords.iter().any(|k| keyword.contains(k.as_str())))
                    .map(|r| r.label)
                    .unwrap();

                assert_eq!(
                    catalog.classify(keyword),
                    expected,
                    "keyword {:?} declared under {:?}",
                    keyword,
                    rule.label
                );
            }
        }
    }

    #[test]
    fn test_unshadowed_keywords_route_to_declared_label() {
        let catalog = IntentCatalog::default();
        let shadowed = catalog.shadowed();

        for rule in catalog.rules() {
            for keyword in &rule.keywords {
                if shadowed.iter().any(|s| &s.keyword == keyword && s.label == rule.label) {
                    continue;
                }
                assert_eq!(catalog.classify(keyword), rule.label, "keyword {:?}", keyword);
            }
        }
    }

    #[test]
    fn test_declaration_order_breaks_ties() {
        assert_eq!(
            classify("Compare the safety of Metformin and Rapamycin"),
            IntentLabel::Comparison
        );
        assert_eq!(classify("safety data from the phase 3 trial"), IntentLabel::Safety);
        assert_eq!(classify("clinical market outlook"), IntentLabel::Clinical);
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        assert_eq!(classify("COMPARE Metformin"), IntentLabel::Comparison);
        assert_eq!(classify("FDA approval timeline"), IntentLabel::Regulatory);
    }

    #[test]
    fn test_substring_semantics() {
        // "report" is a substring of "reporting"
        assert_eq!(classify("reporting please"), IntentLabel::Reporting);
        // "hi" hides inside longer words
        assert_eq!(classify("which one"), IntentLabel::Greeting);
    }

    #[test]
    fn test_end_to_end_comparison_query() {
        let catalog = IntentCatalog::default();
        let (label, keyword) = catalog.matched("Compare Metformin and Rapamycin").unwrap();
        assert_eq!(label, IntentLabel::Comparison);
        assert_eq!(keyword, "compare");
    }

    #[test]
    fn test_default_catalog_shadowing() {
        let shadowed = IntentCatalog::default().shadowed();
        let keywords: Vec<&str> = shadowed.iter().map(|s| s.keyword.as_str()).collect();

        assert!(keywords.contains(&"market share"));
        assert!(keywords.contains(&"global market"));
        assert!(keywords.contains(&"worldwide sales"));
        assert!(keywords.contains(&"global trials"));
        assert!(keywords.contains(&"multi-regional"));
        assert!(keywords.contains(&"neurodegenerative"));
        assert!(keywords.contains(&"rheumatoid"));

        let orphan = shadowed
            .iter()
            .find(|s| s.keyword == "orphan")
            .unwrap();
        assert_eq!(orphan.label, IntentLabel::RareDisease);
        assert_eq!(orphan.shadowed_by, IntentLabel::Regulatory);

        assert!(!keywords.contains(&"compare"));
        assert!(!keywords.contains(&"hello"));
    }

    #[test]
    fn test_custom_catalog_order() {
        let catalog = IntentCatalog::new(vec![
            IntentRule {
                label: IntentLabel::Safety,
                keywords: vec!["Safety".to_string()],
            },
            IntentRule {
                label: IntentLabel::Comparison,
                keywords: vec!["compare".to_string(), String::new()],
            },
        ]);

        assert_eq!(
            catalog.classify("compare safety profiles"),
            IntentLabel::Safety
        );
        assert_eq!(catalog.classify("compare"), IntentLabel::Comparison);
        assert_eq!(catalog.classify("nothing"), IntentLabel::StandardAnalysis);
        assert_eq!(catalog.rules()[1].keywords.len(), 1);
    }
}
