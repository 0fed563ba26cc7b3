//! Plain-text renderings for `--format text`.

use std::fmt::Write;

use curavyom_core::{
    ComparisonResult, FactCheckResult, IntentRule, ResultEnvelope, RiskAssessment, ScoreResult,
    ShadowedKeyword,
};

pub fn envelope(envelope: &ResultEnvelope) -> String {
    let mut out = envelope.text.clone();
    out.push_str("\n\n---\n");
    let _ = writeln!(out, "id:        {}", envelope.id);
    let _ = writeln!(out, "time:      {}", envelope.timestamp);
    let _ = writeln!(out, "workflow:  {}", envelope.workflow.join(" -> "));

    if let Some(score) = envelope.score() {
        let _ = writeln!(
            out,
            "score:     {:.1} ({})",
            score.total_score, score.confidence_level
        );
    } else if let Some(confidence) = envelope
        .metadata_value("confidence_score")
        .and_then(|v| v.as_f64())
    {
        let _ = writeln!(out, "score:     {:.1}", confidence);
    }

    if let Some(risk) = envelope.metadata_value("risk_assessment") {
        if let Some(summary) = risk.get("summary").and_then(|s| s.as_str()) {
            let _ = writeln!(out, "risk:      {}", summary);
        }
    }

    for error in envelope.errors() {
        let _ = writeln!(out, "error:     [{:?}] {}: {}", error.tag, error.source, error.message);
    }

    out.trim_end().to_string()
}

pub fn score(result: &ScoreResult) -> String {
    let mut out = format!(
        "Total: {:.1}/100 ({})\n",
        result.total_score, result.confidence_level
    );
    for (factor, contribution) in &result.breakdown {
        let _ = writeln!(out, "  {:<20} {:>6.2}", factor, contribution);
    }
    out.trim_end().to_string()
}

pub fn comparison(result: &ComparisonResult) -> String {
    let mut out = String::new();
    for (rank, candidate) in result.ranked_list.iter().enumerate() {
        let _ = writeln!(out, "{}. {} ({:.1})", rank + 1, candidate.name, candidate.score);
    }
    let _ = writeln!(out, "\n{}", result.summary);
    for insight in &result.insights {
        let _ = writeln!(out, "- {}", insight);
    }
    out.trim_end().to_string()
}

pub fn check(risk: &RiskAssessment, facts: &FactCheckResult) -> String {
    let mut out = format!("Risk: {}\n", risk.summary);
    for finding in &risk.risks {
        let _ = writeln!(
            out,
            "  {:?} / {:?}: {}",
            finding.category, finding.severity, finding.keyword
        );
    }

    let _ = writeln!(
        out,
        "Facts: {}",
        if facts.is_valid { "valid" } else { "issues found" }
    );
    for fact in &facts.verified_facts {
        let _ = writeln!(out, "  ok    {}", fact);
    }
    for issue in &facts.issues {
        let _ = writeln!(out, "  issue {}", issue);
    }
    out.trim_end().to_string()
}

pub fn catalog(rules: &[IntentRule]) -> String {
    let mut out = String::new();
    for (index, rule) in rules.iter().enumerate() {
        let _ = writeln!(out, "{:>2}. {:<22} {}", index + 1, rule.label.as_str(), rule.keywords.join(", "));
    }
    let _ = writeln!(out, "    {:<22} (fallback)", "standard_analysis");
    out.trim_end().to_string()
}

pub fn shadowed(shadowed: &[ShadowedKeyword]) -> String {
    if shadowed.is_empty() {
        return "No shadowed keywords.".to_string();
    }
    shadowed
        .iter()
        .map(|s| {
            format!(
                "{} \"{}\" is always won by {} \"{}\"",
                s.label, s.keyword, s.shadowed_by, s.shadowing_keyword
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
