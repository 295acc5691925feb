use serde::Deserialize;

/// Service configuration read from the environment at startup.
///
/// Qualification thresholds do not live here; they are a
/// `QualificationPolicy` loaded separately and injected into the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Base URL of the external enrichment provider. When unset, the
    /// service falls back to local email-domain inference.
    pub enrichment_base_url: Option<String>,
    /// Bearer token for the enrichment provider.
    pub enrichment_api_key: Option<String>,
    /// When set, requests must present this value in `x-api-key`.
    pub service_api_key: Option<String>,
    /// Path to a JSON policy override file.
    pub policy_path: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            enrichment_base_url: match std::env::var("ENRICHMENT_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
            {
                Some(raw) => {
                    let parsed = url::Url::parse(&raw).map_err(|e| {
                        anyhow::anyhow!("ENRICHMENT_BASE_URL is not a valid URL: {}", e)
                    })?;
                    if parsed.scheme() != "http" && parsed.scheme() != "https" {
                        anyhow::bail!("ENRICHMENT_BASE_URL must start with http:// or https://");
                    }
                    Some(raw.trim_end_matches('/').to_string())
                }
                None => None,
            },
            enrichment_api_key: std::env::var("ENRICHMENT_API_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            service_api_key: std::env::var("SERVICE_API_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            policy_path: std::env::var("QUALIFICATION_POLICY_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Server Port: {}", config.port);
        match &config.enrichment_base_url {
            Some(url) => tracing::info!("Enrichment provider configured: {}", url),
            None => tracing::info!("No enrichment provider, using local inference"),
        }
        if let Some(path) = &config.policy_path {
            tracing::info!("Qualification policy override: {}", path);
        }

        Ok(config)
    }
}
