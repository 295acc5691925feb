use crate::config::Config;
use crate::engine::QualificationEngine;
use crate::enrichment::{is_valid_email, validate_phone, EnrichmentService};
use crate::errors::AppError;
use crate::models::*;
use crate::policy::QualificationPolicy;
use crate::scoring;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use moka::future::Cache;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// The qualification engine with its injected policy.
    pub engine: QualificationEngine,
    /// Client for the enrichment boundary.
    pub enrichment: EnrichmentService,
    /// Short-TTL cache flagging duplicate submissions of the same lead_id.
    pub recent_leads_cache: Cache<String, i64>,
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-leadqual-api",
            "version": "0.1.0"
        })),
    )
}

/// POST /api/v1/leads/qualify
///
/// Full qualification pass: validate contact fields, enrich, score,
/// classify, and escalate. An enrichment failure is tolerated: the lead
/// is scored on its raw fields, which drives the affected sub-scores to
/// their missing branches and forces human review downstream.
pub async fn qualify_lead(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(lead): Json<Lead>,
) -> Result<Json<QualifyResponse>, AppError> {
    authorize(&state.config, &headers)?;

    if lead.lead_id.trim().is_empty() {
        return Err(AppError::BadRequest("lead_id must not be empty".to_string()));
    }
    if lead.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }

    tracing::info!("qualifying lead: {}", lead.lead_id);

    let lead = sanitize_contact_fields(lead);

    // Flag duplicate submissions; qualification is idempotent so the
    // request still proceeds.
    if state.recent_leads_cache.get(&lead.lead_id).await.is_some() {
        tracing::warn!("duplicate submission of lead {} within TTL", lead.lead_id);
    } else {
        state
            .recent_leads_cache
            .insert(lead.lead_id.clone(), Utc::now().timestamp())
            .await;
    }

    let (enriched, applied, sources) = match state.enrichment.enrich(&lead).await {
        Ok(data) => (
            EnrichedLead::new(lead, data),
            true,
            vec![state.enrichment.source_name().to_string()],
        ),
        Err(e) => {
            tracing::warn!(
                "enrichment failed, scoring raw lead fields only: {}",
                e
            );
            (EnrichedLead::from_raw(lead), false, vec![])
        }
    };

    let result = state.engine.qualify(&enriched);

    tracing::info!(
        "lead {} scored {} -> {:?} (review: {})",
        result.lead_id,
        result.scores.total,
        result.decision,
        result.needs_human_review
    );

    Ok(Json(QualifyResponse {
        result,
        metadata: ResponseMetadata {
            request_id: Uuid::new_v4(),
            enriched: applied,
            sources,
            timestamp: Utc::now().to_rfc3339(),
        },
    }))
}

/// POST /api/v1/leads/score
///
/// Scores the submitted fields as-is, without calling the enrichment
/// adapter. Useful for previewing how a CRM record would score.
pub async fn score_lead(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(lead): Json<Lead>,
) -> Result<Json<ScoreResponse>, AppError> {
    authorize(&state.config, &headers)?;

    let enriched = EnrichedLead::from_raw(sanitize_contact_fields(lead));
    let (scores, concerns) = scoring::compute_scores(&enriched, state.engine.policy());

    Ok(Json(ScoreResponse { scores, concerns }))
}

/// GET /api/v1/policy
///
/// Returns the active threshold tables, mainly for operator inspection.
pub async fn get_policy(
    State(state): State<Arc<AppState>>,
) -> Json<QualificationPolicy> {
    Json(state.engine.policy().clone())
}

/// Checks the `x-api-key` header when the service is key-protected.
fn authorize(config: &Config, headers: &HeaderMap) -> Result<(), AppError> {
    let Some(expected) = &config.service_api_key else {
        return Ok(());
    };
    match headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
        Some(key) if key == expected => Ok(()),
        _ => Err(AppError::Unauthorized(
            "missing or invalid x-api-key".to_string(),
        )),
    }
}

/// Drops invalid contact fields instead of rejecting the lead: a junk
/// email or phone means "no usable contact data", and qualification
/// handles absence on its own.
fn sanitize_contact_fields(mut lead: Lead) -> Lead {
    if let Some(email) = lead.email.as_deref() {
        let trimmed = email.trim().to_ascii_lowercase();
        if is_valid_email(&trimmed) {
            lead.email = Some(trimmed);
        } else {
            tracing::warn!("dropping invalid email on lead {}", lead.lead_id);
            lead.email = None;
        }
    }

    if let Some(phone) = lead.phone.as_deref() {
        let (valid, normalized) = validate_phone(phone);
        if valid {
            lead.phone = Some(normalized);
        } else {
            tracing::warn!("dropping invalid phone on lead {}", lead.lead_id);
            lead.phone = None;
        }
    }

    lead
}
