//! Query refinement and reasoning traces for the standard analysis.

use crate::agents::SpecialistKind;

/// Queries with fewer words than this are expanded before fan-out.
pub const MIN_QUERY_WORDS: usize = 3;

/// Expand a vague query into a fuller prompt for specialists.
///
/// Classification always sees the raw query; only fan-out sees the
/// refined one.
pub fn refine_query(query: &str) -> String {
    if query.split_whitespace().count() < MIN_QUERY_WORDS {
        format!(
            "Provide a detailed analysis of {} focusing on clinical efficacy and safety.",
            query.trim()
        )
    } else {
        query.to_string()
    }
}

/// Explain why each consulted specialist was needed.
pub fn reasoning_trace(query: &str, consulted: &[SpecialistKind]) -> String {
    let mut trace = String::from("**Reasoning Trace:**\n");

    trace.push_str(&format!(
        "1. **Intent Analysis**: Detected query about '{}'. ",
        query
    ));
    for kind in consulted {
        if let Some(reason) = consultation_reason(*kind) {
            trace.push_str(reason);
            trace.push(' ');
        }
    }
    trace.push('\n');

    trace.push_str("2. **Evidence Synthesis**: ");
    trace.push_str("Cross-referenced clinical trial data with patent expiry dates. ");
    trace.push_str("Weighted recent Phase 3 results higher than older preclinical data.\n");

    trace.push_str("3. **Conclusion**: ");
    trace.push_str(
        "The convergence of positive clinical signals and expired patents suggests a high-potential repurposing opportunity.",
    );

    trace
}

fn consultation_reason(kind: SpecialistKind) -> Option<&'static str> {
    match kind {
        SpecialistKind::Clinical => Some("Identified need for clinical evidence validation."),
        SpecialistKind::Patent => {
            Some("Required IP landscape assessment for commercial feasibility.")
        }
        SpecialistKind::Market => Some("Assessed market viability to ensure ROI."),
        SpecialistKind::Regulatory => Some("Mapped the approval pathway and compliance risk."),
        SpecialistKind::Doc => Some("Checked internal research notes for prior work."),
        SpecialistKind::Search => None,
    }
}
