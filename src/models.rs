use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============ Score Ceilings ============

/// Maximum budget component score.
pub const BUDGET_SCORE_MAX: u8 = 30;
/// Maximum intent component score.
pub const INTENT_SCORE_MAX: u8 = 25;
/// Maximum readiness component score.
pub const READINESS_SCORE_MAX: u8 = 25;
/// Maximum engagement component score.
pub const ENGAGEMENT_SCORE_MAX: u8 = 20;

// ============ Lead Input Models ============

/// Acquisition channel the lead came in through.
///
/// Unrecognized channel strings deserialize to `Unknown` rather than
/// failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeadSource {
    /// Referred by an existing customer or partner.
    Referral,
    /// Contacted the sales team directly.
    Direct,
    /// Inquired about a specific property listing.
    PropertyListing,
    /// Arrived from a paid ad campaign.
    PaidAd,
    /// Found us organically (search, social, content).
    Organic,
    /// Channel not recognized or not reported.
    #[serde(other)]
    Unknown,
}

/// Self-reported or inferred employment situation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    Retired,
    Student,
    Unemployed,
    /// Reported but not one of the recognized categories.
    #[serde(other)]
    Unknown,
}

/// Budget as submitted by the lead: either a plain number or free text
/// like "$450,000". Parsing happens at scoring time, not intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BudgetField {
    /// Numeric budget.
    Amount(f64),
    /// Free-text budget, e.g. "$250,000" or "around 300k".
    Text(String),
}

/// Raw inbound lead, immutable once received.
///
/// Only `lead_id` and `name` are required; every qualifying field is
/// optional and absence is meaningful (missing data, not zero).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    /// ID of the lead in the source CRM.
    pub lead_id: String,
    /// Full name of the prospect.
    pub name: String,
    /// Email address, if provided.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone number, if provided.
    #[serde(default)]
    pub phone: Option<String>,
    /// Company the prospect works for, if provided.
    #[serde(default)]
    pub company: Option<String>,
    /// Stated budget (numeric or free text).
    #[serde(default)]
    pub budget: Option<BudgetField>,
    /// Acquisition channel.
    #[serde(default)]
    pub source: Option<LeadSource>,
    /// Minutes between our first outreach and the lead's first reply.
    #[serde(default)]
    pub response_time_minutes: Option<u32>,
    /// Years the prospect has lived in the target city.
    #[serde(default)]
    pub years_in_city: Option<u32>,
    /// Employment situation, if reported on the intake form.
    #[serde(default)]
    pub employment_status: Option<EmploymentStatus>,
    /// When the lead was created in the source system.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ============ Enrichment Models ============

/// Attributes supplied by the enrichment provider (or local inference).
/// Any field may be absent; partial responses are normal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentData {
    /// Whether the lead's email is on a corporate (non-freemail) domain.
    #[serde(default)]
    pub is_corporate_email: Option<bool>,
    /// Inferred employment situation.
    #[serde(default)]
    pub employment_status: Option<EmploymentStatus>,
    /// Inferred tenure in the target city.
    #[serde(default)]
    pub years_in_city: Option<u32>,
    /// Size bracket of the employer, e.g. "100-500".
    #[serde(default)]
    pub company_size: Option<String>,
    /// Estimated household income bracket.
    #[serde(default)]
    pub estimated_income_range: Option<String>,
}

/// A lead plus whatever the enrichment adapter could add.
///
/// Owned by the caller for one qualification pass and never mutated
/// after creation; scoring only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedLead {
    /// The raw lead as received.
    pub lead: Lead,
    /// Enrichment payload; `None` when the adapter failed or was skipped.
    pub enrichment: Option<EnrichmentData>,
}

impl EnrichedLead {
    /// Wraps a raw lead with enrichment data.
    pub fn new(lead: Lead, enrichment: EnrichmentData) -> Self {
        Self {
            lead,
            enrichment: Some(enrichment),
        }
    }

    /// Degraded form used when the enrichment adapter failed entirely:
    /// every enrichment-derived field reads as absent.
    pub fn from_raw(lead: Lead) -> Self {
        Self {
            lead,
            enrichment: None,
        }
    }

    /// Effective tenure: the lead's own answer wins over inference.
    pub fn years_in_city(&self) -> Option<u32> {
        self.lead
            .years_in_city
            .or_else(|| self.enrichment.as_ref().and_then(|e| e.years_in_city))
    }

    /// Effective employment status, lead-reported first.
    pub fn employment_status(&self) -> Option<EmploymentStatus> {
        self.lead
            .employment_status
            .or_else(|| self.enrichment.as_ref().and_then(|e| e.employment_status))
    }

    /// Whether the email was judged corporate by enrichment.
    pub fn is_corporate_email(&self) -> Option<bool> {
        self.enrichment.as_ref().and_then(|e| e.is_corporate_email)
    }
}

// ============ Qualification Output Models ============

/// The four component scores and their sum.
///
/// `total` always equals the exact sum of the components; each component
/// is clamped to its declared ceiling at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Budget component, 0-30.
    pub budget_score: u8,
    /// Intent component, 0-25.
    pub intent_score: u8,
    /// Readiness component, 0-25.
    pub readiness_score: u8,
    /// Engagement component, 0-20.
    pub engagement_score: u8,
    /// Sum of the four components, 0-100.
    pub total: u8,
}

impl ScoreBreakdown {
    /// Builds a breakdown, clamping each component to its ceiling so a
    /// misconfigured policy table can never produce an out-of-range score.
    pub fn new(budget: u8, intent: u8, readiness: u8, engagement: u8) -> Self {
        let budget_score = budget.min(BUDGET_SCORE_MAX);
        let intent_score = intent.min(INTENT_SCORE_MAX);
        let readiness_score = readiness.min(READINESS_SCORE_MAX);
        let engagement_score = engagement.min(ENGAGEMENT_SCORE_MAX);
        Self {
            budget_score,
            intent_score,
            readiness_score,
            engagement_score,
            total: budget_score + intent_score + readiness_score + engagement_score,
        }
    }
}

/// Final qualification category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Qualified,
    NotQualified,
    NeedsReview,
}

/// How complete the input data was for this decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Low,
}

/// Outcome of one qualification pass.
///
/// Deliberately free of timestamps and generated ids: equal inputs must
/// serialize to identical bytes. Request-scoped metadata lives in
/// [`ResponseMetadata`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualificationResult {
    /// ID of the lead this result belongs to.
    pub lead_id: String,
    /// Component scores and total.
    pub scores: ScoreBreakdown,
    /// Qualification category.
    pub decision: Decision,
    /// Data-completeness confidence.
    pub confidence: Confidence,
    /// Whether any escalation trigger fired.
    pub needs_human_review: bool,
    /// Data-quality concerns recorded while scoring, in scoring order.
    /// Empty exactly when confidence is `High`.
    pub concerns: Vec<String>,
    /// One reason per escalation trigger that fired, in trigger order.
    pub review_reasons: Vec<String>,
    /// Positive signals derived from the breakdown.
    pub strengths: Vec<String>,
    /// Suggested next steps for the sales team.
    pub recommendations: Vec<String>,
}

// ============ API Request/Response Models ============

/// Response envelope for the qualify endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct QualifyResponse {
    /// The qualification outcome.
    pub result: QualificationResult,
    /// Request-scoped metadata.
    pub metadata: ResponseMetadata,
}

/// Response for the score-only endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResponse {
    /// Component scores over the raw fields only.
    pub scores: ScoreBreakdown,
    /// Data-quality concerns recorded while scoring.
    pub concerns: Vec<String>,
}

/// Metadata about how a response was produced.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Server-assigned id for this request.
    pub request_id: Uuid,
    /// Whether enrichment data was applied.
    pub enriched: bool,
    /// Data sources consulted, e.g. "enrichment_api".
    pub sources: Vec<String>,
    /// RFC 3339 timestamp of the response.
    pub timestamp: String,
}
