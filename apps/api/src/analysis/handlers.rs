use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::analysis::extract::{extract_skills_from_projects, ManifestSource};
use crate::analysis::gaps::{calculate_skill_gaps, skill_gap_summary};
use crate::analysis::job_match::{calculate_job_match, JobMatchResult};
use crate::analysis::matcher::{match_projects_to_gaps, top_recommendations, ProjectMatch};
use crate::analysis::portfolio::{calculate_portfolio_score, PortfolioScoreResult};
use crate::analysis::store;
use crate::catalog::{Difficulty, ProjectTemplate};
use crate::errors::AppError;
use crate::github::GitHubClient;
use crate::llm_client::{extract_job_skills, personalize_description};
use crate::models::skills::{GapAnalysis, GapSummary, Role, RoleRequirements as Requirements};
use crate::state::AppState;

fn parse_role(raw: &str) -> Result<Role, AppError> {
    Role::parse(raw).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid target role '{raw}'. Must be one of: frontend, backend, fullstack, devops"
        ))
    })
}

/// Runs the full extraction-plus-gap pipeline for a user, re-serving a stored
/// analysis when one is younger than the freshness window.
async fn gap_analysis_for_user(
    state: &AppState,
    user_id: Uuid,
    role: Role,
    github_token: Option<String>,
) -> Result<(GapAnalysis, DateTime<Utc>, bool), AppError> {
    let now = Utc::now();

    if let Some(row) = store::latest_gap_analysis(&state.db, user_id, role.as_str()).await? {
        if store::is_fresh(row.analyzed_at, now) {
            let analysis = calculate_skill_gaps(&row.present_skills, role, &state.catalog)?;
            return Ok((analysis, row.analyzed_at, true));
        }
    }

    let projects = store::fetch_projects(&state.db, user_id).await?;
    if projects.is_empty() {
        return Err(AppError::NotFound(
            "No projects found. Sync some GitHub repositories first.".to_string(),
        ));
    }

    let github = github_token.map(GitHubClient::new).transpose()?;
    let manifests = github.as_ref().map(|c| c as &dyn ManifestSource);
    let present: Vec<String> =
        extract_skills_from_projects(&projects, manifests, state.tech_detector.as_ref())
            .await
            .into_iter()
            .collect();

    let analysis = calculate_skill_gaps(&present, role, &state.catalog)?;
    store::store_gap_analysis(&state.db, user_id, &analysis, now).await;

    Ok((analysis, now, false))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGapRequest {
    pub user_id: Uuid,
    pub target_role: String,
    #[serde(default)]
    pub github_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGapResponse {
    pub analysis: GapAnalysis,
    pub summary: GapSummary,
    pub analyzed_at: DateTime<Utc>,
    pub cached: bool,
}

/// POST /api/v1/analysis/skill-gaps
pub async fn handle_skill_gaps(
    State(state): State<AppState>,
    Json(req): Json<SkillGapRequest>,
) -> Result<Json<SkillGapResponse>, AppError> {
    let role = parse_role(&req.target_role)?;
    let (analysis, analyzed_at, cached) =
        gap_analysis_for_user(&state, req.user_id, role, req.github_token).await?;
    let summary = skill_gap_summary(&analysis);
    Ok(Json(SkillGapResponse {
        analysis,
        summary,
        analyzed_at,
        cached,
    }))
}

fn default_personalize() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsRequest {
    pub user_id: Uuid,
    pub target_role: String,
    #[serde(default)]
    pub github_token: Option<String>,
    #[serde(default = "default_personalize")]
    pub personalize: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsResponse {
    pub recommendations: Vec<ProjectMatch>,
    pub analysis: GapAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// POST /api/v1/analysis/recommendations
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Json(req): Json<RecommendationsRequest>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let role = parse_role(&req.target_role)?;
    let (analysis, _, _) =
        gap_analysis_for_user(&state, req.user_id, role, req.github_token).await?;

    let matches = match_projects_to_gaps(&analysis.missing_skills, state.catalog.templates());
    let mut recommendations: Vec<ProjectMatch> = top_recommendations(&matches, 5).to_vec();

    if recommendations.is_empty() {
        return Ok(Json(RecommendationsResponse {
            recommendations,
            analysis,
            message: Some(
                "Great job! You have all the essential skills for this role. \
                 Consider exploring advanced topics or another role track."
                    .to_string(),
            ),
        }));
    }

    if req.personalize {
        for recommendation in &mut recommendations {
            match personalize_description(
                &state.llm,
                &recommendation.template,
                &analysis.present_skills,
                &recommendation.gaps_filled.essential,
            )
            .await
            {
                Ok(description) => recommendation.template.description = description,
                Err(e) => {
                    warn!(
                        "personalization failed for template '{}', keeping stock description: {e}",
                        recommendation.template.id
                    );
                }
            }
        }
    }

    for recommendation in &recommendations {
        store::store_recommendation(&state.db, req.user_id, recommendation).await;
    }

    Ok(Json(RecommendationsResponse {
        recommendations,
        analysis,
        message: None,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioScoreRequest {
    pub user_id: Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioScoreResponse {
    #[serde(flatten)]
    pub result: PortfolioScoreResult,
    pub scored_at: DateTime<Utc>,
    pub cached: bool,
}

/// POST /api/v1/analysis/portfolio-score
pub async fn handle_portfolio_score(
    State(state): State<AppState>,
    Json(req): Json<PortfolioScoreRequest>,
) -> Result<Json<PortfolioScoreResponse>, AppError> {
    let now = Utc::now();

    if let Some(row) = store::latest_portfolio_score(&state.db, req.user_id).await? {
        if store::is_fresh(row.scored_at, now) {
            return Ok(Json(PortfolioScoreResponse {
                result: row.data.0,
                scored_at: row.scored_at,
                cached: true,
            }));
        }
    }

    // An empty portfolio is a valid zero-score result, not an error.
    let projects = store::fetch_projects(&state.db, req.user_id).await?;
    let result = calculate_portfolio_score(&projects);
    store::store_portfolio_score(&state.db, req.user_id, &result, now).await;

    Ok(Json(PortfolioScoreResponse {
        result,
        scored_at: now,
        cached: false,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchRequest {
    pub user_id: Uuid,
    pub job_title: String,
    pub job_description: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchResponse {
    pub job_title: String,
    pub required_skills: Vec<String>,
    #[serde(flatten)]
    pub result: JobMatchResult,
}

/// POST /api/v1/jobs/match
pub async fn handle_job_match(
    State(state): State<AppState>,
    Json(req): Json<JobMatchRequest>,
) -> Result<Json<JobMatchResponse>, AppError> {
    if req.job_title.trim().is_empty() {
        return Err(AppError::Validation("jobTitle must not be empty".to_string()));
    }
    if req.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "jobDescription must not be empty".to_string(),
        ));
    }

    let required_skills = extract_job_skills(&state.llm, &req.job_description).await?;

    let projects = store::fetch_projects(&state.db, req.user_id).await?;
    if projects.is_empty() {
        return Err(AppError::NotFound(
            "No projects found. Sync some GitHub repositories first.".to_string(),
        ));
    }

    let result = calculate_job_match(&required_skills, &projects);
    store::store_job_match(&state.db, req.user_id, &req.job_title, &result).await;

    Ok(Json(JobMatchResponse {
        job_title: req.job_title,
        required_skills,
        result,
    }))
}

#[derive(Serialize)]
pub struct RoleListEntry {
    pub role: Role,
    #[serde(flatten)]
    pub requirements: Requirements,
}

/// GET /api/v1/roles
pub async fn handle_list_roles(
    State(state): State<AppState>,
) -> Json<Vec<RoleListEntry>> {
    let roles = state
        .catalog
        .roles()
        .iter()
        .map(|(role, requirements)| RoleListEntry {
            role: *role,
            requirements: requirements.clone(),
        })
        .collect();
    Json(roles)
}

#[derive(Deserialize)]
pub struct TemplateFilter {
    pub category: Option<String>,
    pub difficulty: Option<String>,
}

/// GET /api/v1/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
    Query(filter): Query<TemplateFilter>,
) -> Result<Json<Vec<ProjectTemplate>>, AppError> {
    let category = filter
        .category
        .as_deref()
        .map(parse_role)
        .transpose()?;
    let difficulty = filter
        .difficulty
        .as_deref()
        .map(|raw| {
            Difficulty::parse(raw).ok_or_else(|| {
                AppError::Validation(format!(
                    "Invalid difficulty '{raw}'. Must be one of: beginner, intermediate, advanced"
                ))
            })
        })
        .transpose()?;

    let templates = state
        .catalog
        .templates()
        .iter()
        .filter(|t| category.map(|c| t.category == c).unwrap_or(true))
        .filter(|t| difficulty.map(|d| t.difficulty == d).unwrap_or(true))
        .cloned()
        .collect();

    Ok(Json(templates))
}
