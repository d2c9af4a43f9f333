//! Job-description matching: compares skills required by a posting against
//! the skills evidenced by a user's synced projects.

use serde::Serialize;
use uuid::Uuid;

use crate::analysis::normalize::{normalize_skill, skills_match};
use crate::models::project::ProjectRow;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchBreakdown {
    /// Count of required skills the user evidenced, not a percentage.
    pub essential_match: usize,
    pub total_required: usize,
    pub total_matched: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchResult {
    pub match_percentage: u32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    /// Projects that demonstrate a matched skill, strongest first.
    pub recommended_projects: Vec<Uuid>,
    pub breakdown: MatchBreakdown,
}

/// Partitions the posting's required skills into matched and missing based on
/// project languages, and picks up to 5 evidence projects by star count.
pub fn calculate_job_match(required_skills: &[String], projects: &[ProjectRow]) -> JobMatchResult {
    let user_skills: Vec<String> = projects
        .iter()
        .flat_map(|p| p.language_names())
        .map(normalize_skill)
        .collect();

    let mut matched_skills = Vec::new();
    let mut missing_skills = Vec::new();
    for required in required_skills {
        if user_skills.iter().any(|have| skills_match(required, have)) {
            matched_skills.push(required.clone());
        } else {
            missing_skills.push(required.clone());
        }
    }

    let match_percentage = if required_skills.is_empty() {
        0
    } else {
        ((matched_skills.len() as f64 / required_skills.len() as f64) * 100.0).round() as u32
    };

    let mut evidence: Vec<&ProjectRow> = projects
        .iter()
        .filter(|p| {
            p.language_names().any(|language| {
                matched_skills
                    .iter()
                    .any(|skill| skills_match(skill, language))
            })
        })
        .collect();
    evidence.sort_by(|a, b| b.stars.cmp(&a.stars));
    let recommended_projects = evidence.iter().take(5).map(|p| p.id).collect();

    JobMatchResult {
        match_percentage,
        breakdown: MatchBreakdown {
            essential_match: matched_skills.len(),
            total_required: required_skills.len(),
            total_matched: matched_skills.len(),
        },
        matched_skills,
        missing_skills,
        recommended_projects,
    }
}
