/// Unit tests for the component score calculators
/// Covers the tier tables, missing-data branches, and clamping
use rust_leadqual_api::models::*;
use rust_leadqual_api::policy::QualificationPolicy;
use rust_leadqual_api::scoring::{
    budget_score, compute_scores, engagement_score, intent_score, parse_budget, readiness_score,
    CONCERN_BUDGET_UNKNOWN, CONCERN_ENGAGEMENT_UNKNOWN, CONCERN_READINESS_INCOMPLETE,
    CONCERN_SOURCE_UNKNOWN,
};

fn lead(id: &str) -> Lead {
    Lead {
        lead_id: id.to_string(),
        name: "Test Lead".to_string(),
        email: None,
        phone: None,
        company: None,
        budget: None,
        source: None,
        response_time_minutes: None,
        years_in_city: None,
        employment_status: None,
        created_at: None,
    }
}

#[cfg(test)]
mod budget_parsing_tests {
    use super::*;

    #[test]
    fn numeric_amounts_parse_directly() {
        assert_eq!(parse_budget(&BudgetField::Amount(450_000.0)), Some(450_000));
        assert_eq!(parse_budget(&BudgetField::Amount(1.0)), Some(1));
    }

    #[test]
    fn formatted_text_reduces_to_digits() {
        assert_eq!(
            parse_budget(&BudgetField::Text("$450,000".to_string())),
            Some(450_000)
        );
        assert_eq!(
            parse_budget(&BudgetField::Text("around 300000 or so".to_string())),
            Some(300_000)
        );
    }

    #[test]
    fn unparsable_text_is_none() {
        assert_eq!(parse_budget(&BudgetField::Text("call me".to_string())), None);
        assert_eq!(parse_budget(&BudgetField::Text(String::new())), None);
    }

    #[test]
    fn zero_counts_as_unstated() {
        assert_eq!(parse_budget(&BudgetField::Amount(0.0)), None);
        assert_eq!(parse_budget(&BudgetField::Text("$0".to_string())), None);
    }

    #[test]
    fn non_finite_amounts_are_none() {
        assert_eq!(parse_budget(&BudgetField::Amount(f64::NAN)), None);
        assert_eq!(parse_budget(&BudgetField::Amount(f64::INFINITY)), None);
        assert_eq!(parse_budget(&BudgetField::Amount(-5000.0)), None);
    }

    #[test]
    fn absurdly_long_digit_strings_are_none() {
        let text = "9".repeat(40);
        assert_eq!(parse_budget(&BudgetField::Text(text)), None);
    }
}

#[cfg(test)]
mod budget_score_tests {
    use super::*;

    fn score(budget: Option<BudgetField>) -> (u8, Vec<String>) {
        let policy = QualificationPolicy::default();
        let mut concerns = Vec::new();
        let points = budget_score(budget.as_ref(), &policy, &mut concerns);
        (points, concerns)
    }

    #[test]
    fn tier_ladder() {
        assert_eq!(score(Some(BudgetField::Amount(600_000.0))).0, 30);
        assert_eq!(score(Some(BudgetField::Amount(500_000.0))).0, 30);
        assert_eq!(score(Some(BudgetField::Amount(499_999.0))).0, 22);
        assert_eq!(score(Some(BudgetField::Amount(250_000.0))).0, 22);
        assert_eq!(score(Some(BudgetField::Amount(100_000.0))).0, 15);
        assert_eq!(score(Some(BudgetField::Amount(25_000.0))).0, 8);
    }

    #[test]
    fn stated_budget_below_tiers_earns_floor() {
        let (points, concerns) = score(Some(BudgetField::Amount(10_000.0)));
        assert_eq!(points, 2);
        assert!(concerns.is_empty());
    }

    #[test]
    fn missing_budget_scores_zero_with_concern() {
        let (points, concerns) = score(None);
        assert_eq!(points, 0);
        assert_eq!(concerns, vec![CONCERN_BUDGET_UNKNOWN.to_string()]);
    }

    #[test]
    fn malformed_budget_treated_as_missing() {
        let (points, concerns) = score(Some(BudgetField::Text("whatever fits".to_string())));
        assert_eq!(points, 0);
        assert_eq!(concerns, vec![CONCERN_BUDGET_UNKNOWN.to_string()]);
    }

    #[test]
    fn misconfigured_tier_points_clamp_to_ceiling() {
        let mut policy = QualificationPolicy::default();
        policy.budget.tiers[0].points = 90;
        let mut concerns = Vec::new();
        let points = budget_score(
            Some(&BudgetField::Amount(900_000.0)),
            &policy,
            &mut concerns,
        );
        assert_eq!(points, BUDGET_SCORE_MAX);
    }
}

#[cfg(test)]
mod intent_score_tests {
    use super::*;

    fn score(source: Option<LeadSource>) -> (u8, Vec<String>) {
        let policy = QualificationPolicy::default();
        let mut concerns = Vec::new();
        let points = intent_score(source, &policy, &mut concerns);
        (points, concerns)
    }

    #[test]
    fn channel_points() {
        assert_eq!(score(Some(LeadSource::Referral)).0, 25);
        assert_eq!(score(Some(LeadSource::Direct)).0, 22);
        assert_eq!(score(Some(LeadSource::PropertyListing)).0, 20);
        assert_eq!(score(Some(LeadSource::PaidAd)).0, 18);
        assert_eq!(score(Some(LeadSource::Organic)).0, 12);
    }

    #[test]
    fn unknown_channel_scores_lowest_with_concern() {
        let (points, concerns) = score(Some(LeadSource::Unknown));
        assert_eq!(points, 5);
        assert_eq!(concerns, vec![CONCERN_SOURCE_UNKNOWN.to_string()]);
    }

    #[test]
    fn missing_channel_scores_lowest_with_concern() {
        let (points, concerns) = score(None);
        assert_eq!(points, 5);
        assert_eq!(concerns, vec![CONCERN_SOURCE_UNKNOWN.to_string()]);
    }

    #[test]
    fn unrecognized_channel_strings_deserialize_to_unknown() {
        let source: LeadSource = serde_json::from_str("\"billboard\"").unwrap();
        assert_eq!(source, LeadSource::Unknown);

        let source: LeadSource = serde_json::from_str("\"paid-ad\"").unwrap();
        assert_eq!(source, LeadSource::PaidAd);
    }
}

#[cfg(test)]
mod readiness_score_tests {
    use super::*;

    fn score(
        years: Option<u32>,
        employment: Option<EmploymentStatus>,
    ) -> (u8, Vec<String>) {
        let policy = QualificationPolicy::default();
        let mut concerns = Vec::new();
        let points = readiness_score(years, employment, &policy, &mut concerns);
        (points, concerns)
    }

    #[test]
    fn long_tenure_and_employment_hit_ceiling() {
        let (points, concerns) = score(Some(5), Some(EmploymentStatus::Employed));
        assert_eq!(points, 25);
        assert!(concerns.is_empty());
    }

    #[test]
    fn mid_tenure_self_employed() {
        // 2 years -> 9, self-employed -> 10
        let (points, concerns) = score(Some(2), Some(EmploymentStatus::SelfEmployed));
        assert_eq!(points, 19);
        assert!(concerns.is_empty());
    }

    #[test]
    fn stated_zero_tenure_earns_floor_without_concern() {
        let (points, concerns) = score(Some(0), Some(EmploymentStatus::Unemployed));
        assert_eq!(points, 4);
        assert!(concerns.is_empty());
    }

    #[test]
    fn missing_tenure_caps_that_half() {
        let (points, concerns) = score(None, Some(EmploymentStatus::Employed));
        assert_eq!(points, 14);
        assert_eq!(concerns, vec![CONCERN_READINESS_INCOMPLETE.to_string()]);
    }

    #[test]
    fn missing_employment_caps_that_half() {
        let (points, concerns) = score(Some(5), None);
        assert_eq!(points, 15);
        assert_eq!(concerns, vec![CONCERN_READINESS_INCOMPLETE.to_string()]);
    }

    #[test]
    fn unknown_employment_counts_as_missing() {
        let (points, concerns) = score(Some(5), Some(EmploymentStatus::Unknown));
        assert_eq!(points, 15);
        assert_eq!(concerns, vec![CONCERN_READINESS_INCOMPLETE.to_string()]);
    }

    #[test]
    fn both_halves_missing_records_one_concern() {
        let (points, concerns) = score(None, None);
        assert_eq!(points, 4);
        assert_eq!(concerns.len(), 1);
    }
}

#[cfg(test)]
mod engagement_score_tests {
    use super::*;

    fn score(minutes: Option<u32>) -> (u8, Vec<String>) {
        let policy = QualificationPolicy::default();
        let mut concerns = Vec::new();
        let points = engagement_score(minutes, &policy, &mut concerns);
        (points, concerns)
    }

    #[test]
    fn faster_replies_score_higher() {
        assert_eq!(score(Some(5)).0, 20);
        assert_eq!(score(Some(60)).0, 20);
        assert_eq!(score(Some(61)).0, 15);
        assert_eq!(score(Some(240)).0, 15);
        assert_eq!(score(Some(1_000)).0, 10);
        assert_eq!(score(Some(2_000)).0, 6);
        assert_eq!(score(Some(10_000)).0, 3);
    }

    #[test]
    fn missing_response_time_scores_lowest_nonzero_with_concern() {
        let (points, concerns) = score(None);
        assert_eq!(points, 3);
        assert_eq!(concerns, vec![CONCERN_ENGAGEMENT_UNKNOWN.to_string()]);
    }
}

#[cfg(test)]
mod breakdown_tests {
    use super::*;

    #[test]
    fn components_clamp_to_ceilings() {
        let scores = ScoreBreakdown::new(200, 200, 200, 200);
        assert_eq!(scores.budget_score, BUDGET_SCORE_MAX);
        assert_eq!(scores.intent_score, INTENT_SCORE_MAX);
        assert_eq!(scores.readiness_score, READINESS_SCORE_MAX);
        assert_eq!(scores.engagement_score, ENGAGEMENT_SCORE_MAX);
        assert_eq!(scores.total, 100);
    }

    #[test]
    fn total_is_exact_sum() {
        let scores = ScoreBreakdown::new(8, 12, 19, 6);
        assert_eq!(scores.total, 45);
    }

    #[test]
    fn empty_lead_records_all_four_concerns_in_order() {
        let enriched = EnrichedLead::from_raw(lead("lead-1"));
        let (scores, concerns) = compute_scores(&enriched, &QualificationPolicy::default());

        assert_eq!(scores.total, 12); // 0 + 5 + 4 + 3
        assert_eq!(
            concerns,
            vec![
                CONCERN_BUDGET_UNKNOWN.to_string(),
                CONCERN_SOURCE_UNKNOWN.to_string(),
                CONCERN_READINESS_INCOMPLETE.to_string(),
                CONCERN_ENGAGEMENT_UNKNOWN.to_string(),
            ]
        );
    }

    #[test]
    fn enrichment_fills_missing_demographics() {
        let mut raw = lead("lead-2");
        raw.budget = Some(BudgetField::Amount(300_000.0));
        raw.source = Some(LeadSource::Referral);
        raw.response_time_minutes = Some(30);

        let enrichment = EnrichmentData {
            years_in_city: Some(6),
            employment_status: Some(EmploymentStatus::Employed),
            ..Default::default()
        };
        let enriched = EnrichedLead::new(raw, enrichment);

        let (scores, concerns) = compute_scores(&enriched, &QualificationPolicy::default());
        assert_eq!(scores.readiness_score, 25);
        assert!(concerns.is_empty());
    }

    #[test]
    fn lead_reported_demographics_win_over_enrichment() {
        let mut raw = lead("lead-3");
        raw.years_in_city = Some(0);
        raw.employment_status = Some(EmploymentStatus::Unemployed);

        let enrichment = EnrichmentData {
            years_in_city: Some(10),
            employment_status: Some(EmploymentStatus::Employed),
            ..Default::default()
        };
        let enriched = EnrichedLead::new(raw, enrichment);

        assert_eq!(enriched.years_in_city(), Some(0));
        assert_eq!(
            enriched.employment_status(),
            Some(EmploymentStatus::Unemployed)
        );
    }
}
