use axum::http::{HeaderValue, Method};
use serde::Deserialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::catalog::{Catalog, CatalogEntry};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cors: CorsConfig,
    /// Replaces the built-in catalog when non-empty.
    #[serde(default)]
    pub models: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// `["*"]` allows any origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        // Empty or comment-only documents are null
        let config: Option<Config> = serde_yaml::from_str(content)?;
        Ok(config.unwrap_or_default())
    }

    pub fn build_catalog(&self) -> anyhow::Result<Catalog> {
        let catalog = Catalog::from_entries(self.models.iter().cloned())?;
        if catalog.is_empty() {
            info!("No models configured, using built-in catalog");
            return Ok(Catalog::builtin());
        }
        Ok(catalog)
    }
}

impl CorsConfig {
    pub fn layer(&self) -> CorsLayer {
        let allow_origin = if self.allowed_origins.iter().any(|o| o == "*") {
            warn!("CORS: allowing any origin");
            AllowOrigin::any()
        } else {
            let origins: Vec<HeaderValue> = self
                .allowed_origins
                .iter()
                .filter_map(|origin| {
                    origin.parse().ok().or_else(|| {
                        warn!("Invalid CORS origin '{}', skipping", origin);
                        None
                    })
                })
                .collect();
            if origins.is_empty() {
                warn!("CORS: no valid origins configured, cross-origin requests will be rejected");
            } else {
                info!("CORS: allowing origins {:?}", self.allowed_origins);
            }
            AllowOrigin::list(origins)
        };

        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST])
    }
}
