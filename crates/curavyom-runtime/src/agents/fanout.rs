//! Concurrent specialist fan-out.
//!
//! Every specialist runs concurrently under its own timeout. The fan-out
//! waits for all of them; failures and timeouts are collected beside the
//! successful reports instead of aborting the batch.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

use curavyom_core::EvidenceRecord;

use super::{AgentError, Specialist, SpecialistKind, SpecialistReport};

/// Reports and failures from one fan-out, each in consultation order.
#[derive(Debug, Clone, Default)]
pub struct FanOut {
    pub reports: Vec<SpecialistReport>,
    pub unavailable: Vec<(SpecialistKind, AgentError)>,
}

impl FanOut {
    pub fn is_complete(&self) -> bool {
        self.unavailable.is_empty()
    }

    /// Evidence merged across reports, earlier reports first.
    pub fn evidence(&self) -> EvidenceRecord {
        self.reports
            .iter()
            .fold(EvidenceRecord::default(), |acc, report| {
                acc.merge(report.evidence.clone())
            })
    }

    pub fn report(&self, kind: SpecialistKind) -> Option<&SpecialistReport> {
        self.reports.iter().find(|r| r.kind == kind)
    }
}

/// Consult one specialist with its timeout applied.
pub async fn consult_one(
    specialist: &dyn Specialist,
    query: &str,
    default_timeout: Duration,
) -> Result<SpecialistReport, AgentError> {
    let kind = specialist.kind();
    let timeout = specialist.timeout().unwrap_or(default_timeout);

    match tokio::time::timeout(timeout, specialist.consult(query)).await {
        Ok(Ok(report)) => {
            tracing::debug!(specialist = %kind, "Specialist responded");
            Ok(report)
        }
        Ok(Err(e)) => {
            tracing::warn!(specialist = %kind, error = %e, "Specialist failed");
            Err(e)
        }
        Err(_) => {
            tracing::warn!(specialist = %kind, timeout = ?timeout, "Specialist timed out");
            Err(AgentError::Timeout(timeout))
        }
    }
}

/// Consult every specialist concurrently and wait for all of them.
pub async fn consult_all(
    specialists: &[Arc<dyn Specialist>],
    query: &str,
    default_timeout: Duration,
) -> FanOut {
    let outcomes = join_all(
        specialists
            .iter()
            .map(|s| consult_one(s.as_ref(), query, default_timeout)),
    )
    .await;

    let mut fan_out = FanOut::default();
    for (specialist, outcome) in specialists.iter().zip(outcomes) {
        match outcome {
            Ok(report) => fan_out.reports.push(report),
            Err(e) => fan_out.unavailable.push((specialist.kind(), e)),
        }
    }
    fan_out
}
