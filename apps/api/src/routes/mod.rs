pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog API
        .route("/api/v1/roles", get(handlers::handle_list_roles))
        .route("/api/v1/templates", get(handlers::handle_list_templates))
        // Analysis API
        .route(
            "/api/v1/analysis/skill-gaps",
            post(handlers::handle_skill_gaps),
        )
        .route(
            "/api/v1/analysis/recommendations",
            post(handlers::handle_recommendations),
        )
        .route(
            "/api/v1/analysis/portfolio-score",
            post(handlers::handle_portfolio_score),
        )
        // Jobs API
        .route("/api/v1/jobs/match", post(handlers::handle_job_match))
        .with_state(state)
}
