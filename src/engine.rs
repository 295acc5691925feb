//! The qualification engine: one infallible pass from enriched lead to
//! qualification result.

use crate::decision::{classify, derive_confidence};
use crate::escalation::{self, CriticalFields};
use crate::models::{EnrichedLead, LeadSource, QualificationResult, ScoreBreakdown};
use crate::policy::QualificationPolicy;
use crate::scoring::{self, parse_budget};

/// Total at or above which a lead is worth active nurturing even when it
/// falls short of qualification.
const NURTURE_FLOOR: u8 = 50;

/// Stateless qualification engine over an injected policy table.
///
/// Each call to [`qualify`](Self::qualify) is an independent, pure
/// transformation; the engine holds no cross-call state, so one instance
/// can serve any number of concurrent passes.
#[derive(Debug, Clone)]
pub struct QualificationEngine {
    policy: QualificationPolicy,
}

impl QualificationEngine {
    /// Builds an engine around a policy table. The table is taken as-is;
    /// out-of-range point values are neutralized by score clamping, and
    /// ordering problems are caught by `QualificationPolicy::validate`
    /// at startup.
    pub fn new(policy: QualificationPolicy) -> Self {
        Self { policy }
    }

    /// Engine with the default policy, used by tests and local runs.
    #[allow(dead_code)]
    pub fn with_defaults() -> Self {
        Self::new(QualificationPolicy::default())
    }

    /// The active policy table.
    pub fn policy(&self) -> &QualificationPolicy {
        &self.policy
    }

    /// Runs one qualification pass.
    ///
    /// Never fails and never panics: missing or malformed data degrades
    /// the affected sub-scores and surfaces as concerns, a low
    /// confidence, and escalation instead of an error.
    pub fn qualify(&self, enriched: &EnrichedLead) -> QualificationResult {
        let (scores, concerns) = scoring::compute_scores(enriched, &self.policy);

        let confidence = derive_confidence(&concerns);
        let decision = classify(scores.total, confidence, &self.policy.decision);

        let critical = CriticalFields {
            budget_missing: enriched.lead.budget.as_ref().and_then(parse_budget).is_none(),
            source_unknown: matches!(enriched.lead.source, Some(LeadSource::Unknown) | None),
        };
        let outcome = escalation::evaluate(
            &scores,
            decision,
            confidence,
            &concerns,
            critical,
            &self.policy.decision,
        );

        let strengths = self.strengths(&scores, enriched);
        let recommendations = self.recommendations(scores.total, outcome.needs_human_review);

        QualificationResult {
            lead_id: enriched.lead.lead_id.clone(),
            scores,
            decision,
            confidence,
            needs_human_review: outcome.needs_human_review,
            concerns,
            review_reasons: outcome.reasons,
            strengths,
            recommendations,
        }
    }

    /// Positive signals the sales team can lead with.
    fn strengths(&self, scores: &ScoreBreakdown, enriched: &EnrichedLead) -> Vec<String> {
        let mut strengths = Vec::new();
        if scores.budget_score >= 20 {
            strengths.push("strong budget alignment".to_string());
        }
        if scores.intent_score >= 18 {
            strengths.push("high purchase intent from quality source".to_string());
        }
        if scores.readiness_score >= 15 {
            strengths.push("stable and ready to move forward".to_string());
        }
        if scores.engagement_score >= 15 {
            strengths.push("fast response to first contact".to_string());
        }
        if enriched.is_corporate_email() == Some(true) {
            strengths.push("corporate email domain".to_string());
        }
        strengths
    }

    /// Suggested next steps, tiered by total score. A review flag always
    /// puts the human queue entry first.
    fn recommendations(&self, total: u8, needs_human_review: bool) -> Vec<String> {
        let mut recommendations = if total >= self.policy.decision.qualify_threshold {
            vec![
                "fast-track to sales team".to_string(),
                "schedule property viewing within 48 hours".to_string(),
                "assign senior sales agent".to_string(),
            ]
        } else if total >= NURTURE_FLOOR {
            vec![
                "nurture with targeted content".to_string(),
                "schedule discovery call".to_string(),
                "send market analysis report".to_string(),
            ]
        } else {
            vec![
                "add to long-term nurture campaign".to_string(),
                "send educational content series".to_string(),
                "re-evaluate in 3 months".to_string(),
            ]
        };

        if needs_human_review {
            recommendations.insert(0, "queue for human review within 4 hours".to_string());
        }
        recommendations
    }
}

impl QualificationResult {
    /// Compact JSON form for reporting sinks.
    #[allow(dead_code)]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "lead_id": self.lead_id,
            "total_score": self.scores.total,
            "decision": self.decision,
            "confidence": self.confidence,
            "needs_human_review": self.needs_human_review,
            "concerns": self.concerns,
            "review_reasons": self.review_reasons,
        })
    }
}
