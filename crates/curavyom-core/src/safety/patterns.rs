//! Entity and keyword patterns shared by the safety checks.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::RiskCategory;

/// Trial identifier known to be invalid.
pub const SENTINEL_TRIAL_ID: &str = "NCT00000000";

lazy_static! {
    /// ClinicalTrials.gov identifier: "NCT" and exactly eight digits
    pub static ref TRIAL_ID_PATTERN: Regex = Regex::new(r"NCT\d{8}").unwrap();

    /// US patent number: "US" and 7 to 11 digits
    pub static ref PATENT_NUMBER_PATTERN: Regex = Regex::new(r"US\d{7,11}").unwrap();
}

/// Risk keywords per category, scanned case-insensitively.
pub const RISK_KEYWORDS: &[(RiskCategory, &[&str])] = &[
    (
        RiskCategory::Safety,
        &["toxic", "adverse event", "side effect", "death", "fatal"],
    ),
    (
        RiskCategory::Legal,
        &["litigation", "lawsuit", "infringement", "patent dispute"],
    ),
    (
        RiskCategory::Market,
        &["recall", "withdrawn", "saturation", "competitor dominance"],
    ),
];

pub fn contains_trial_id(content: &str) -> bool {
    TRIAL_ID_PATTERN.is_match(content)
}

pub fn contains_patent_number(content: &str) -> bool {
    PATENT_NUMBER_PATTERN.is_match(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trial_id_detection() {
        assert!(contains_trial_id("See NCT01234567 for details"));
        assert!(!contains_trial_id("NCT1234567 is too short"));
        assert!(!contains_trial_id("nct01234567 is lower case"));
    }

    #[test]
    fn test_patent_number_detection() {
        assert!(contains_patent_number("Granted as US1234567"));
        assert!(contains_patent_number("US12345678901"));
        assert!(!contains_patent_number("US123456 is too short"));
    }

    #[test]
    fn test_risk_keywords_are_lower_case() {
        for (_, keywords) in RISK_KEYWORDS {
            for keyword in *keywords {
                assert_eq!(*keyword, keyword.to_lowercase());
            }
        }
    }
}
