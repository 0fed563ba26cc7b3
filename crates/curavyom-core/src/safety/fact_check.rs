//! Entity fact checking for trial identifiers and patent numbers.

use crate::types::FactCheckResult;

use super::patterns::{PATENT_NUMBER_PATTERN, SENTINEL_TRIAL_ID, TRIAL_ID_PATTERN};

/// Scans text for trial IDs and patent numbers and sorts them into
/// verified facts and issues.
///
/// Checks are format-only; nothing is looked up externally. Every match is
/// reported, repeated mentions included.
#[derive(Debug, Clone, Default)]
pub struct FactChecker;

impl FactChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn verify(&self, text: &str) -> FactCheckResult {
        let mut issues = Vec::new();
        let mut verified_facts = Vec::new();

        for m in TRIAL_ID_PATTERN.find_iter(text) {
            let id = m.as_str();
            if id == SENTINEL_TRIAL_ID {
                issues.push(format!("Invalid Clinical Trial ID detected: {}", id));
            } else {
                verified_facts.push(format!("Verified Clinical Trial ID: {}", id));
            }
        }

        for m in PATENT_NUMBER_PATTERN.find_iter(text) {
            verified_facts.push(format!("Verified Patent Number: {}", m.as_str()));
        }

        FactCheckResult {
            is_valid: issues.is_empty(),
            issues,
            verified_facts,
        }
    }
}

/// Verify with the default checker.
pub fn verify(text: &str) -> FactCheckResult {
    FactChecker::new().verify(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_trial_id() {
        let result = verify("Key Phase 3 Trial (NCT01234567) met its endpoint.");
        assert!(result.is_valid);
        assert!(result.issues.is_empty());
        assert_eq!(result.verified_facts, vec!["Verified Clinical Trial ID: NCT01234567"]);
    }

    #[test]
    fn test_sentinel_trial_id() {
        let result = verify("Registered as NCT00000000.");
        assert!(!result.is_valid);
        assert!(result.verified_facts.is_empty());
        assert_eq!(result.issues, vec!["Invalid Clinical Trial ID detected: NCT00000000"]);
    }

    #[test]
    fn test_patent_number() {
        let result = verify("Covered by US12345678.");
        assert!(result.is_valid);
        assert_eq!(result.verified_facts, vec!["Verified Patent Number: US12345678"]);
    }

    #[test]
    fn test_mixed_entities() {
        let result = verify("NCT00000000, NCT07654321 and US1234567");
        assert!(!result.is_valid);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.verified_facts.len(), 2);
    }

    #[test]
    fn test_no_entities() {
        let result = verify("No identifiers here.");
        assert!(result.is_valid);
        assert!(result.issues.is_empty());
        assert!(result.verified_facts.is_empty());
    }
}
