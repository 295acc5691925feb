//! Lead intake validation and the enrichment adapter.
//!
//! The adapter is the one fallible step in a qualification pass. It is
//! called exactly once per lead (no retries here; retry policy belongs to
//! the caller) and a failure is survivable: the handler degrades to
//! scoring the raw lead, which forces escalation downstream.
use crate::cache_validator::SealedEntry;
use crate::circuit_breaker::{new_enrichment_breaker, EnrichmentBreaker};
use crate::config::Config;
use crate::errors::{AppError, ResultExt};
use crate::models::{EmploymentStatus, EnrichmentData, Lead};
use failsafe::futures::CircuitBreaker;
use moka::future::Cache;
use phonenumber::country::Id as CountryId;
use phonenumber::Mode;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;

/// Freemail domains that rule out a corporate-email inference.
const FREEMAIL_DOMAINS: [&str; 6] = [
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "icloud.com",
    "aol.com",
];

/// Validate email address
///
/// Checks for:
/// - Basic email format (contains @ and .)
/// - Fake/placeholder patterns (repeated digits like 9999, 1111)
/// - Minimum length requirements
/// - Valid domain structure
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 5 || !email.contains('@') || !email.contains('.') {
        return false;
    }

    // Placeholder addresses web forms ship when the visitor refused to
    // give a real one
    let fake_patterns = ["999999", "111111", "000000", "123456789"];

    for pattern in &fake_patterns {
        if email.contains(pattern) {
            tracing::warn!("invalid email (placeholder pattern '{}'): {}", pattern, email);
            return false;
        }
    }

    // RFC 5322 simplified email regex, local@domain.tld
    let email_regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();

    if !email_regex.is_match(email) {
        tracing::warn!("invalid email format: {}", email);
        return false;
    }

    true
}

/// Validate and normalize a phone number.
///
/// Parses with a US default region, checks validity, and returns the
/// E.164 form (+14155552671).
///
/// Returns: (is_valid, normalized_phone_or_error_msg)
pub fn validate_phone(raw: &str) -> (bool, String) {
    if raw.trim().is_empty() || raw.len() < 8 {
        return (false, "Phone too short".to_string());
    }

    match phonenumber::parse(Some(CountryId::US), raw) {
        Ok(number) => {
            if phonenumber::is_valid(&number) {
                let formatted = number.format().mode(Mode::E164).to_string();
                tracing::debug!("valid phone: {} -> {}", raw, formatted);
                (true, formatted)
            } else {
                tracing::warn!("invalid phone number: {}", raw);
                (false, "Invalid phone number".to_string())
            }
        }
        Err(e) => {
            tracing::warn!("failed to parse phone '{}': {:?}", raw, e);
            (false, format!("Parse error: {:?}", e))
        }
    }
}

/// Local inference used when no enrichment provider is configured.
///
/// Mirrors what the real providers report, derived from the email domain
/// alone: a corporate domain suggests stable employment and an employer
/// size bracket. Tenure cannot be inferred locally and stays absent.
pub fn infer_from_lead(lead: &Lead) -> EnrichmentData {
    let domain = lead
        .email
        .as_deref()
        .and_then(|email| email.rsplit('@').next())
        .map(|d| d.to_ascii_lowercase());

    let is_corporate = domain
        .as_deref()
        .map(|d| !FREEMAIL_DOMAINS.contains(&d));

    match is_corporate {
        Some(true) => EnrichmentData {
            is_corporate_email: Some(true),
            employment_status: Some(EmploymentStatus::Employed),
            years_in_city: None,
            company_size: Some("100-500".to_string()),
            estimated_income_range: Some("$75,000-$125,000".to_string()),
        },
        Some(false) => EnrichmentData {
            is_corporate_email: Some(false),
            employment_status: None,
            years_in_city: None,
            company_size: None,
            estimated_income_range: Some("$50,000-$100,000".to_string()),
        },
        None => EnrichmentData::default(),
    }
}

/// Client for the enrichment boundary: `enrich(lead) -> data | failure`.
///
/// With a provider URL configured, remote responses are cached for 24
/// hours behind integrity-checked entries and calls run through a
/// circuit breaker so a flapping provider fails fast. Without one, the
/// local domain heuristic answers and never fails.
#[derive(Clone)]
pub struct EnrichmentService {
    client: reqwest::Client,
    base_url: Option<String>,
    api_key: Option<String>,
    cache: Cache<String, String>,
    // Shared across clones so every handler sees the same breaker state.
    breaker: Arc<EnrichmentBreaker>,
}

impl EnrichmentService {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.enrichment_base_url.clone(),
            api_key: config.enrichment_api_key.clone(),
            // Contact details change rarely; 24h matches how long we
            // trust a provider answer for the same email/phone.
            cache: Cache::builder()
                .time_to_live(Duration::from_secs(86_400))
                .max_capacity(50_000)
                .build(),
            breaker: Arc::new(new_enrichment_breaker()),
        }
    }

    /// Label for response metadata.
    pub fn source_name(&self) -> &'static str {
        if self.base_url.is_some() {
            "enrichment_api"
        } else {
            "local_inference"
        }
    }

    /// Enriches one lead. Called once per qualification pass; the caller
    /// tolerates `Err` by scoring the raw lead.
    pub async fn enrich(&self, lead: &Lead) -> Result<EnrichmentData, AppError> {
        let Some(base_url) = self.base_url.clone() else {
            tracing::debug!("no enrichment provider configured, using local inference");
            return Ok(infer_from_lead(lead));
        };

        let cache_key = match Self::cache_key(lead) {
            Some(key) => key,
            None => {
                return Err(AppError::BadRequest(
                    "lead has no contact identifier to enrich by".to_string(),
                ))
            }
        };

        if let Some(stored) = self.cache.get(&cache_key).await {
            if let Some(data) = SealedEntry::open::<EnrichmentData>(&stored) {
                tracing::debug!("enrichment cache HIT for {}", cache_key);
                return Ok(data);
            }
            // Failed integrity check reads as a miss and refetches
        }

        let data = self
            .breaker
            .call(self.fetch_remote(&base_url, lead))
            .await
            .map_err(|e| match e {
                failsafe::Error::Inner(err) => err,
                failsafe::Error::Rejected => AppError::ExternalApiError(
                    "enrichment circuit open, provider failing".to_string(),
                ),
            })?;

        if let Some(entry) = SealedEntry::seal(&data) {
            self.cache.insert(cache_key, entry.encode()).await;
        }

        Ok(data)
    }

    /// Cache key from the most stable contact identifier available.
    fn cache_key(lead: &Lead) -> Option<String> {
        if let Some(email) = lead.email.as_deref().filter(|e| !e.is_empty()) {
            return Some(format!("email:{}", email.to_ascii_lowercase()));
        }
        if let Some(phone) = lead.phone.as_deref().filter(|p| !p.is_empty()) {
            let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
            return Some(format!("phone:{}", digits));
        }
        None
    }

    async fn fetch_remote(&self, base_url: &str, lead: &Lead) -> Result<EnrichmentData, AppError> {
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(email) = lead.email.as_deref() {
            params.push(("email", email));
        }
        if let Some(phone) = lead.phone.as_deref() {
            params.push(("phone", phone));
        }

        // Build URL with proper parameter encoding
        let url = reqwest::Url::parse_with_params(&format!("{}/v1/enrich", base_url), &params)
            .map_err(|e| AppError::ExternalApiError(format!("Failed to build URL: {}", e)))?;

        tracing::info!("fetching enrichment for lead: {}", lead.lead_id);

        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.context("enrichment request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("enrichment provider returned {}: {}", status, error_text);
            return Err(AppError::ExternalApiError(format!(
                "enrichment provider returned status {}: {}",
                status, error_text
            )));
        }

        let data: EnrichmentData = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("failed to parse enrichment response: {}", e))
        })?;

        tracing::info!("enrichment succeeded for lead: {}", lead.lead_id);
        Ok(data)
    }
}
