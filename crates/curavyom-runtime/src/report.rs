//! Report rendering collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

use curavyom_core::ScoreResult;

pub const REPORT_FILE_NAME: &str = "analysis_report.pdf";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Report rendering failed: {0}")]
    Failed(String),
}

/// Content handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    pub query: String,
    pub summary: String,
    pub score: ScoreResult,

    /// Specialist name to its finding
    pub findings: BTreeMap<String, String>,

    pub generated_at: String,
}

#[async_trait]
pub trait ReportRenderer: Send + Sync {
    /// Render and return a location identifier for the result.
    async fn render(&self, report: &ReportData) -> Result<String, RenderError>;
}

/// Renderer that reports where a document would be written without
/// touching the filesystem.
#[derive(Debug, Clone)]
pub struct SimulatedReportRenderer {
    report_dir: PathBuf,
}

impl SimulatedReportRenderer {
    pub fn new(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            report_dir: report_dir.into(),
        }
    }
}

impl Default for SimulatedReportRenderer {
    fn default() -> Self {
        Self::new("reports")
    }
}

#[async_trait]
impl ReportRenderer for SimulatedReportRenderer {
    async fn render(&self, report: &ReportData) -> Result<String, RenderError> {
        let location = self.report_dir.join(REPORT_FILE_NAME);
        tracing::debug!(
            query = %report.query,
            findings = report.findings.len(),
            location = %location.display(),
            "Report rendered"
        );
        Ok(location.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ReportData {
        ReportData {
            query: "Generate report".to_string(),
            summary: "Automated analysis of drug repurposing candidates.".to_string(),
            score: ScoreResult::unscored(),
            findings: BTreeMap::new(),
            generated_at: "10:00 AM".to_string(),
        }
    }

    #[tokio::test]
    async fn test_location_uses_report_dir() {
        let renderer = SimulatedReportRenderer::new("out/reports");
        let location = renderer.render(&report()).await.unwrap();
        assert_eq!(location, "out/reports/analysis_report.pdf");
    }

    #[tokio::test]
    async fn test_default_dir() {
        let location = SimulatedReportRenderer::default()
            .render(&report())
            .await
            .unwrap();
        assert_eq!(location, "reports/analysis_report.pdf");
    }
}
