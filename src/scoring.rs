//! Component score calculation.
//!
//! Each sub-score is a pure function of its own slice of the lead plus the
//! policy table; no sub-score reads another's value. Missing or malformed
//! data never aborts scoring: the affected component falls to its minimum
//! branch and a concern code is recorded for the confidence and
//! escalation passes.

use crate::models::{
    BudgetField, EmploymentStatus, EnrichedLead, LeadSource, ScoreBreakdown, BUDGET_SCORE_MAX,
    ENGAGEMENT_SCORE_MAX, INTENT_SCORE_MAX, READINESS_SCORE_MAX,
};
use crate::policy::QualificationPolicy;

/// Concern recorded when the budget is absent or unparsable.
pub const CONCERN_BUDGET_UNKNOWN: &str = "budget_unknown";
/// Concern recorded when the acquisition channel is absent or unrecognized.
pub const CONCERN_SOURCE_UNKNOWN: &str = "source_unknown";
/// Concern recorded when tenure or employment data is missing.
pub const CONCERN_READINESS_INCOMPLETE: &str = "readiness_data_incomplete";
/// Concern recorded when the response time is missing.
pub const CONCERN_ENGAGEMENT_UNKNOWN: &str = "engagement_unknown";

/// The concern codes scoring can emit, in a fixed reference order.
#[allow(dead_code)]
pub const SCORING_CONCERNS: [&str; 4] = [
    CONCERN_BUDGET_UNKNOWN,
    CONCERN_SOURCE_UNKNOWN,
    CONCERN_READINESS_INCOMPLETE,
    CONCERN_ENGAGEMENT_UNKNOWN,
];

/// Extracts a positive budget amount from the stated budget.
///
/// Free text is reduced to its digits, the way CRM exports like
/// "$450,000" or "R$ 450.000" are usually salvaged. A budget that parses
/// to zero is treated the same as an unparsable one: no stated amount.
pub fn parse_budget(budget: &BudgetField) -> Option<u64> {
    match budget {
        BudgetField::Amount(n) if n.is_finite() && *n >= 1.0 => Some(*n as u64),
        BudgetField::Amount(_) => None,
        BudgetField::Text(text) => {
            let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
            match digits.parse::<u64>() {
                Ok(0) | Err(_) => None,
                Ok(amount) => Some(amount),
            }
        }
    }
}

/// Budget component (0-30): tier ladder over the parsed amount.
pub fn budget_score(
    budget: Option<&BudgetField>,
    policy: &QualificationPolicy,
    concerns: &mut Vec<String>,
) -> u8 {
    let amount = budget.and_then(parse_budget);
    let points = match amount {
        Some(amount) => policy
            .budget
            .tiers
            .iter()
            .find(|tier| amount >= tier.min_amount)
            .map(|tier| tier.points)
            // a stated budget below every tier still earns minimal credit
            .unwrap_or(policy.budget.stated_floor),
        None => {
            concerns.push(CONCERN_BUDGET_UNKNOWN.to_string());
            0
        }
    };
    points.min(BUDGET_SCORE_MAX)
}

/// Intent component (0-25): fixed points per acquisition channel.
pub fn intent_score(
    source: Option<LeadSource>,
    policy: &QualificationPolicy,
    concerns: &mut Vec<String>,
) -> u8 {
    let points = match source {
        Some(LeadSource::Unknown) | None => {
            concerns.push(CONCERN_SOURCE_UNKNOWN.to_string());
            policy.intent.unknown
        }
        Some(source) => policy.intent.points_for(source),
    };
    points.min(INTENT_SCORE_MAX)
}

/// Readiness component (0-25): tenure half plus employment half.
///
/// A missing half falls to its minimum non-zero credit; the concern is
/// recorded once even when both halves are missing.
pub fn readiness_score(
    years_in_city: Option<u32>,
    employment: Option<EmploymentStatus>,
    policy: &QualificationPolicy,
    concerns: &mut Vec<String>,
) -> u8 {
    let mut incomplete = false;

    let tenure_points = match years_in_city {
        Some(years) => policy
            .readiness
            .tenure_tiers
            .iter()
            .find(|tier| years >= tier.min_years)
            .map(|tier| tier.points)
            .unwrap_or(policy.readiness.tenure_floor),
        None => {
            incomplete = true;
            policy.readiness.tenure_floor
        }
    };

    let employment_points = match employment {
        Some(EmploymentStatus::Unknown) | None => {
            incomplete = true;
            policy.readiness.employment_floor
        }
        Some(status) => policy.readiness.employment_points(status),
    };

    if incomplete {
        concerns.push(CONCERN_READINESS_INCOMPLETE.to_string());
    }

    tenure_points
        .saturating_add(employment_points)
        .min(READINESS_SCORE_MAX)
}

/// Engagement component (0-20): inverse response-time buckets.
pub fn engagement_score(
    response_time_minutes: Option<u32>,
    policy: &QualificationPolicy,
    concerns: &mut Vec<String>,
) -> u8 {
    let points = match response_time_minutes {
        Some(minutes) => policy
            .engagement
            .buckets
            .iter()
            .find(|bucket| minutes <= bucket.max_minutes)
            .map(|bucket| bucket.points)
            .unwrap_or(policy.engagement.slowest),
        None => {
            concerns.push(CONCERN_ENGAGEMENT_UNKNOWN.to_string());
            policy.engagement.missing
        }
    };
    points.min(ENGAGEMENT_SCORE_MAX)
}

/// Runs the four sub-scores over one enriched lead and returns the
/// breakdown with the concerns recorded along the way, in scoring order.
pub fn compute_scores(
    enriched: &EnrichedLead,
    policy: &QualificationPolicy,
) -> (ScoreBreakdown, Vec<String>) {
    let mut concerns = Vec::new();

    let budget = budget_score(enriched.lead.budget.as_ref(), policy, &mut concerns);
    let intent = intent_score(enriched.lead.source, policy, &mut concerns);
    let readiness = readiness_score(
        enriched.years_in_city(),
        enriched.employment_status(),
        policy,
        &mut concerns,
    );
    let engagement = engagement_score(enriched.lead.response_time_minutes, policy, &mut concerns);

    (
        ScoreBreakdown::new(budget, intent, readiness, engagement),
        concerns,
    )
}
