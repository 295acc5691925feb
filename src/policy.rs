//! Threshold and weight tables driving the qualification engine.
//!
//! Everything the engine compares a lead against lives here, injected at
//! construction instead of read from ambient state. Operators can override
//! the defaults with a JSON file named in `QUALIFICATION_POLICY_PATH`;
//! omitted sections fall back to their defaults.

use crate::models::{
    EmploymentStatus, LeadSource, BUDGET_SCORE_MAX, ENGAGEMENT_SCORE_MAX, INTENT_SCORE_MAX,
    READINESS_SCORE_MAX,
};
use serde::{Deserialize, Serialize};

/// One budget tier: a stated budget of at least `min_amount` earns `points`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetTier {
    pub min_amount: u64,
    pub points: u8,
}

/// Budget scoring table. Tiers are ordered highest `min_amount` first and
/// the first matching tier wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetPolicy {
    pub tiers: Vec<BudgetTier>,
    /// Points for a stated budget below every tier.
    pub stated_floor: u8,
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        Self {
            tiers: vec![
                BudgetTier {
                    min_amount: 500_000,
                    points: 30,
                },
                BudgetTier {
                    min_amount: 250_000,
                    points: 22,
                },
                BudgetTier {
                    min_amount: 100_000,
                    points: 15,
                },
                BudgetTier {
                    min_amount: 25_000,
                    points: 8,
                },
            ],
            stated_floor: 2,
        }
    }
}

/// Points per acquisition channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentPolicy {
    pub referral: u8,
    pub direct: u8,
    pub property_listing: u8,
    pub paid_ad: u8,
    pub organic: u8,
    /// Also used when the source field is absent.
    pub unknown: u8,
}

impl IntentPolicy {
    /// Point value for a channel.
    pub fn points_for(&self, source: LeadSource) -> u8 {
        match source {
            LeadSource::Referral => self.referral,
            LeadSource::Direct => self.direct,
            LeadSource::PropertyListing => self.property_listing,
            LeadSource::PaidAd => self.paid_ad,
            LeadSource::Organic => self.organic,
            LeadSource::Unknown => self.unknown,
        }
    }
}

impl Default for IntentPolicy {
    fn default() -> Self {
        Self {
            referral: 25,
            direct: 22,
            property_listing: 20,
            paid_ad: 18,
            organic: 12,
            unknown: 5,
        }
    }
}

/// One tenure tier: at least `min_years` in the city earns `points`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenureTier {
    pub min_years: u32,
    pub points: u8,
}

/// Readiness scoring table. Tenure contributes up to half the ceiling,
/// employment the other half.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessPolicy {
    /// Ordered highest `min_years` first; first matching tier wins.
    pub tenure_tiers: Vec<TenureTier>,
    /// Points for a stated tenure below every tier, and the minimum
    /// non-zero credit when tenure is missing.
    pub tenure_floor: u8,
    pub employed: u8,
    pub self_employed: u8,
    pub retired: u8,
    pub student: u8,
    pub unemployed: u8,
    /// Points when employment is unknown or missing.
    pub employment_floor: u8,
}

impl ReadinessPolicy {
    /// Point value for an employment status.
    pub fn employment_points(&self, status: EmploymentStatus) -> u8 {
        match status {
            EmploymentStatus::Employed => self.employed,
            EmploymentStatus::SelfEmployed => self.self_employed,
            EmploymentStatus::Retired => self.retired,
            EmploymentStatus::Student => self.student,
            EmploymentStatus::Unemployed => self.unemployed,
            EmploymentStatus::Unknown => self.employment_floor,
        }
    }
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            tenure_tiers: vec![
                TenureTier {
                    min_years: 5,
                    points: 13,
                },
                TenureTier {
                    min_years: 2,
                    points: 9,
                },
                TenureTier {
                    min_years: 1,
                    points: 5,
                },
            ],
            tenure_floor: 2,
            employed: 12,
            self_employed: 10,
            retired: 6,
            student: 4,
            unemployed: 2,
            employment_floor: 2,
        }
    }
}

/// One engagement bucket: a reply within `max_minutes` earns `points`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementBucket {
    pub max_minutes: u32,
    pub points: u8,
}

/// Engagement scoring table: faster replies earn more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementPolicy {
    /// Ordered lowest `max_minutes` first; first matching bucket wins.
    pub buckets: Vec<EngagementBucket>,
    /// Points for a reply slower than every bucket.
    pub slowest: u8,
    /// Minimum non-zero credit when response time is missing.
    pub missing: u8,
}

impl Default for EngagementPolicy {
    fn default() -> Self {
        Self {
            buckets: vec![
                EngagementBucket {
                    max_minutes: 60,
                    points: 20,
                },
                EngagementBucket {
                    max_minutes: 240,
                    points: 15,
                },
                EngagementBucket {
                    max_minutes: 1_440,
                    points: 10,
                },
                EngagementBucket {
                    max_minutes: 4_320,
                    points: 6,
                },
            ],
            slowest: 3,
            missing: 3,
        }
    }
}

/// Decision cutoffs and the edge band that always forces manual review.
///
/// `qualify_threshold` is inclusive, `disqualify_below` is exclusive
/// (a total of exactly `disqualify_below` lands in the review band), and
/// the edge band is closed on both ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionPolicy {
    pub qualify_threshold: u8,
    pub disqualify_below: u8,
    pub review_band_low: u8,
    pub review_band_high: u8,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            qualify_threshold: 70,
            disqualify_below: 40,
            review_band_low: 60,
            review_band_high: 70,
        }
    }
}

/// The complete policy table injected into the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QualificationPolicy {
    pub budget: BudgetPolicy,
    pub intent: IntentPolicy,
    pub readiness: ReadinessPolicy,
    pub engagement: EngagementPolicy,
    pub decision: DecisionPolicy,
}

impl QualificationPolicy {
    /// Loads a policy override file and validates it.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read policy file {}: {}", path, e))?;
        let policy: Self = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("failed to parse policy file {}: {}", path, e))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Sanity-checks the tables at startup. Out-of-range point values are
    /// survivable at runtime (sub-scores clamp), but ordering mistakes
    /// silently change tier selection, so they are rejected here.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self
            .budget
            .tiers
            .windows(2)
            .all(|w| w[0].min_amount > w[1].min_amount)
        {
            anyhow::bail!("budget tiers must be ordered by descending min_amount");
        }
        if !self
            .readiness
            .tenure_tiers
            .windows(2)
            .all(|w| w[0].min_years > w[1].min_years)
        {
            anyhow::bail!("tenure tiers must be ordered by descending min_years");
        }
        if !self
            .engagement
            .buckets
            .windows(2)
            .all(|w| w[0].max_minutes < w[1].max_minutes)
        {
            anyhow::bail!("engagement buckets must be ordered by ascending max_minutes");
        }
        if self.decision.disqualify_below >= self.decision.qualify_threshold {
            anyhow::bail!("disqualify_below must be lower than qualify_threshold");
        }
        if self.decision.review_band_low > self.decision.review_band_high {
            anyhow::bail!("review band bounds are inverted");
        }
        let ceiling_sum = BUDGET_SCORE_MAX + INTENT_SCORE_MAX + READINESS_SCORE_MAX
            + ENGAGEMENT_SCORE_MAX;
        if self.decision.qualify_threshold > ceiling_sum {
            anyhow::bail!("qualify_threshold exceeds the maximum possible total");
        }
        Ok(())
    }
}
