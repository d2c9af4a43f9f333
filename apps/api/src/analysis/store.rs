//! Persistence for analysis results. Reads surface errors; result writes log
//! and continue so a storage hiccup never loses a computed response.

use chrono::{DateTime, Duration, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::analysis::job_match::JobMatchResult;
use crate::analysis::matcher::ProjectMatch;
use crate::analysis::portfolio::PortfolioScoreResult;
use crate::models::project::ProjectRow;
use crate::models::skills::{GapAnalysis, MissingSkills};

/// Stored analyses are re-served for this long before being recomputed.
pub const FRESHNESS_WINDOW_HOURS: i64 = 24;

pub fn is_fresh(analyzed_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - analyzed_at < Duration::hours(FRESHNESS_WINDOW_HOURS)
}

pub async fn fetch_projects(pool: &PgPool, user_id: Uuid) -> Result<Vec<ProjectRow>, sqlx::Error> {
    sqlx::query_as::<_, ProjectRow>(
        "SELECT * FROM projects WHERE user_id = $1 ORDER BY stars DESC, name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

#[derive(Debug, sqlx::FromRow)]
pub struct SkillGapRow {
    pub user_id: Uuid,
    pub target_role: String,
    pub present_skills: Vec<String>,
    pub missing_skills: Json<MissingSkills>,
    pub analyzed_at: DateTime<Utc>,
}

pub async fn latest_gap_analysis(
    pool: &PgPool,
    user_id: Uuid,
    target_role: &str,
) -> Result<Option<SkillGapRow>, sqlx::Error> {
    sqlx::query_as::<_, SkillGapRow>(
        "SELECT user_id, target_role, present_skills, missing_skills, analyzed_at
         FROM skill_gaps
         WHERE user_id = $1 AND target_role = $2
         ORDER BY analyzed_at DESC
         LIMIT 1",
    )
    .bind(user_id)
    .bind(target_role)
    .fetch_optional(pool)
    .await
}

pub async fn store_gap_analysis(
    pool: &PgPool,
    user_id: Uuid,
    analysis: &GapAnalysis,
    analyzed_at: DateTime<Utc>,
) {
    let result = sqlx::query(
        "INSERT INTO skill_gaps (user_id, target_role, present_skills, missing_skills, analyzed_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(user_id)
    .bind(analysis.role.as_str())
    .bind(&analysis.present_skills)
    .bind(Json(&analysis.missing_skills))
    .bind(analyzed_at)
    .execute(pool)
    .await;

    if let Err(e) = result {
        warn!("failed to store gap analysis for {user_id}: {e}");
    }
}

pub async fn store_job_match(
    pool: &PgPool,
    user_id: Uuid,
    job_title: &str,
    result: &JobMatchResult,
) {
    let outcome = sqlx::query(
        "INSERT INTO job_matches
             (user_id, job_title, match_percentage, matched_skills, missing_skills,
              recommended_projects)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(user_id)
    .bind(job_title)
    .bind(result.match_percentage as i32)
    .bind(&result.matched_skills)
    .bind(&result.missing_skills)
    .bind(&result.recommended_projects)
    .execute(pool)
    .await;

    if let Err(e) = outcome {
        warn!("failed to store job match for {user_id}: {e}");
    }
}

pub async fn store_recommendation(pool: &PgPool, user_id: Uuid, recommendation: &ProjectMatch) {
    let template = &recommendation.template;
    let gaps_filled: Vec<String> = recommendation
        .gaps_filled
        .essential
        .iter()
        .chain(&recommendation.gaps_filled.preferred)
        .chain(&recommendation.gaps_filled.nice_to_have)
        .cloned()
        .collect();

    let outcome = sqlx::query(
        "INSERT INTO project_recommendations
             (user_id, project_name, description, tech_stack, difficulty, time_estimate,
              gaps_filled, learning_resources, priority, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'suggested')",
    )
    .bind(user_id)
    .bind(&template.name)
    .bind(&template.description)
    .bind(&template.tech_stack)
    .bind(template.difficulty.as_str())
    .bind(&template.time_estimate)
    .bind(&gaps_filled)
    .bind(Json(&template.learning_resources))
    .bind(recommendation.priority_score as i32)
    .execute(pool)
    .await;

    if let Err(e) = outcome {
        warn!("failed to store recommendation '{}' for {user_id}: {e}", template.id);
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct PortfolioScoreRow {
    pub data: Json<PortfolioScoreResult>,
    pub scored_at: DateTime<Utc>,
}

pub async fn latest_portfolio_score(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<PortfolioScoreRow>, sqlx::Error> {
    sqlx::query_as::<_, PortfolioScoreRow>(
        "SELECT data, scored_at
         FROM portfolio_scores
         WHERE user_id = $1
         ORDER BY scored_at DESC
         LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn store_portfolio_score(
    pool: &PgPool,
    user_id: Uuid,
    result: &PortfolioScoreResult,
    scored_at: DateTime<Utc>,
) {
    let outcome = sqlx::query(
        "INSERT INTO portfolio_scores (user_id, data, scored_at) VALUES ($1, $2, $3)",
    )
    .bind(user_id)
    .bind(Json(result))
    .bind(scored_at)
    .execute(pool)
    .await;

    if let Err(e) = outcome {
        warn!("failed to store portfolio score for {user_id}: {e}");
    }
}
