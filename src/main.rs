mod cache_validator;
mod circuit_breaker;
mod config;
mod decision;
mod engine;
mod enrichment;
mod errors;
mod escalation;
mod handlers;
mod models;
mod policy;
mod scoring;

use axum::{
    routing::{get, post},
    Router,
};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::engine::QualificationEngine;
use crate::enrichment::EnrichmentService;
use crate::policy::QualificationPolicy;

/// Main entry point for the application.
///
/// Initializes logging, configuration, the qualification policy, the
/// enrichment client, and the HTTP routes with their middleware, then
/// starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_leadqual_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Load and validate the qualification policy; ordering mistakes in
    // the tables are a startup failure, not a runtime surprise.
    let policy = match &config.policy_path {
        Some(path) => QualificationPolicy::from_file(path)?,
        None => QualificationPolicy::default(),
    };
    policy.validate()?;
    let engine = QualificationEngine::new(policy);
    tracing::info!("Qualification engine initialized");

    // Enrichment client (provider-backed or local inference)
    let enrichment = EnrichmentService::new(&config);
    tracing::info!("Enrichment source: {}", enrichment.source_name());

    // Duplicate-submission flagging cache; 5 minutes covers typical
    // webhook retry storms from upstream CRMs.
    let recent_leads_cache = Cache::builder()
        .time_to_live(Duration::from_secs(300))
        .max_capacity(10_000)
        .build();
    tracing::info!("Lead deduplication cache initialized");

    let app_state = Arc::new(handlers::AppState {
        config: config.clone(),
        engine,
        enrichment,
        recent_leads_cache,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        .route("/api/v1/leads/qualify", post(handlers::qualify_lead))
        .route("/api/v1/leads/score", post(handlers::score_lead))
        .route("/api/v1/policy", get(handlers::get_policy))
        .layer(
            ServiceBuilder::new()
                // Request size limit: lead payloads are small; 1MB is generous
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check (bypasses rate limiting)
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
