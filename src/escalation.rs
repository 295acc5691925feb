//! Escalation rules deciding when a lead must go to a human.
//!
//! The triggers are independent and accumulate: every trigger that fires
//! appends its own reason, so a reviewer sees all of them rather than
//! the first.

use crate::models::{Confidence, Decision, ScoreBreakdown};
use crate::policy::DecisionPolicy;

/// Result of the escalation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalationOutcome {
    /// True iff at least one trigger fired.
    pub needs_human_review: bool,
    /// One reason per fired trigger, in trigger order.
    pub reasons: Vec<String>,
}

/// Facts about the raw lead the triggers need beyond the scores.
#[derive(Debug, Clone, Copy)]
pub struct CriticalFields {
    /// Budget absent, or present but unparsable.
    pub budget_missing: bool,
    /// Source absent or not a recognized channel.
    pub source_unknown: bool,
}

/// Evaluates the escalation triggers.
///
/// `scoring_concerns` is the list recorded during scoring, before any
/// review reasons are appended.
pub fn evaluate(
    scores: &ScoreBreakdown,
    decision: Decision,
    confidence: Confidence,
    scoring_concerns: &[String],
    critical: CriticalFields,
    policy: &DecisionPolicy,
) -> EscalationOutcome {
    let mut reasons = Vec::new();

    if decision == Decision::NeedsReview {
        reasons.push("borderline qualification score".to_string());
    }

    if scores.total >= policy.review_band_low && scores.total <= policy.review_band_high {
        reasons.push(format!(
            "total score {} falls in the {}-{} review band",
            scores.total, policy.review_band_low, policy.review_band_high
        ));
    }

    if confidence == Confidence::Low {
        reasons.push("low confidence due to insufficient data".to_string());
    }

    if scoring_concerns.len() >= 2 {
        reasons.push("multiple concerns identified".to_string());
    }

    if critical.budget_missing || critical.source_unknown {
        reasons.push("critical lead data missing (budget or source)".to_string());
    }

    EscalationOutcome {
        needs_human_review: !reasons.is_empty(),
        reasons,
    }
}
