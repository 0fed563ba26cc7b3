//! Risk keyword detection.

use crate::types::{RiskAssessment, RiskCategory, RiskFinding};

use super::patterns::RISK_KEYWORDS;

/// Flags risk keywords in generated text.
///
/// One finding is produced per keyword present in the text, in table order.
/// Findings are advisory and never change the text.
#[derive(Debug, Clone)]
pub struct RiskDetector {
    table: Vec<(RiskCategory, Vec<String>)>,
}

impl RiskDetector {
    pub fn new() -> Self {
        Self {
            table: RISK_KEYWORDS
                .iter()
                .map(|(category, keywords)| {
                    (*category, keywords.iter().map(|k| k.to_string()).collect())
                })
                .collect(),
        }
    }

    pub fn assess(&self, text: &str) -> RiskAssessment {
        let lower = text.to_lowercase();

        let risks: Vec<RiskFinding> = self
            .table
            .iter()
            .flat_map(|(category, keywords)| {
                keywords
                    .iter()
                    .filter(|keyword| lower.contains(keyword.as_str()))
                    .map(move |keyword| RiskFinding {
                        category: *category,
                        keyword: keyword.clone(),
                        severity: category.severity(),
                    })
            })
            .collect();

        let summary = if risks.is_empty() {
            "No significant risks detected.".to_string()
        } else {
            format!("Detected {} potential risk factors.", risks.len())
        };

        RiskAssessment {
            has_risks: !risks.is_empty(),
            risks,
            summary,
        }
    }
}

impl Default for RiskDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Assess with the default keyword table.
pub fn assess_risk(text: &str) -> RiskAssessment {
    RiskDetector::new().assess(text)
}
