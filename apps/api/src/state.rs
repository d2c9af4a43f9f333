use std::sync::Arc;

use sqlx::PgPool;

use crate::analysis::extract::TechDetector;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    pub config: Config,
    /// Static role and template catalogs, parsed once at startup.
    pub catalog: Arc<Catalog>,
    /// Pluggable technology detector. Default: LlmTechDetector.
    pub tech_detector: Arc<dyn TechDetector>,
}
