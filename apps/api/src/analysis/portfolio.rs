//! Portfolio scoring: four weighted component scores plus textual feedback.

use std::collections::BTreeSet;

use chrono::{Months, Utc};
use serde::{Deserialize, Serialize};

use crate::models::project::ProjectRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioScoreResult {
    pub overall_score: u32,
    pub project_quality: u32,
    pub tech_diversity: u32,
    pub documentation: u32,
    pub consistency: u32,
    pub breakdown: ScoreBreakdown,
}

/// Weighted blend: quality 35%, diversity 25%, documentation 20%,
/// consistency 20%.
pub fn calculate_portfolio_score(projects: &[ProjectRow]) -> PortfolioScoreResult {
    if projects.is_empty() {
        return PortfolioScoreResult {
            overall_score: 0,
            project_quality: 0,
            tech_diversity: 0,
            documentation: 0,
            consistency: 0,
            breakdown: ScoreBreakdown {
                strengths: vec![],
                weaknesses: vec!["No projects found".to_string()],
                suggestions: vec!["Sync your GitHub repositories to get started".to_string()],
            },
        };
    }

    let project_quality = score_project_quality(projects);
    let tech_diversity = score_tech_diversity(projects);
    let documentation = score_documentation(projects);
    let consistency = score_consistency(projects);

    let overall_score = (project_quality as f64 * 0.35
        + tech_diversity as f64 * 0.25
        + documentation as f64 * 0.20
        + consistency as f64 * 0.20)
        .round() as u32;

    let breakdown = build_feedback(
        projects,
        project_quality,
        tech_diversity,
        documentation,
        consistency,
    );

    PortfolioScoreResult {
        overall_score,
        project_quality,
        tech_diversity,
        documentation,
        consistency,
        breakdown,
    }
}

/// Average complexity over the projects that have been analysed, plus a
/// bonus of 5 per high-complexity project (>= 70), bonus capped at 20, total
/// capped at 100. Unanalysed projects do not participate; zero when none
/// have a score.
fn score_project_quality(projects: &[ProjectRow]) -> u32 {
    let scored: Vec<f64> = projects
        .iter()
        .filter_map(|p| p.complexity_score)
        .collect();
    if scored.is_empty() {
        return 0;
    }

    let average = scored.iter().sum::<f64>() / scored.len() as f64;

    let high_complexity = scored.iter().filter(|&&c| c >= 70.0).count();
    let bonus = (high_complexity * 5).min(20) as f64;

    (average + bonus).min(100.0).round() as u32
}

/// Step function over the count of distinct languages across all projects.
fn score_tech_diversity(projects: &[ProjectRow]) -> u32 {
    let languages: BTreeSet<&str> = projects.iter().flat_map(|p| p.language_names()).collect();
    let count = languages.len() as u32;

    let score = match count {
        0 => 0,
        1..=2 => 20 + count * 10,
        3..=5 => 40 + (count - 2) * 10,
        6..=10 => 70 + (count - 5) * 4,
        _ => 90 + ((count - 10) * 2).min(10),
    };
    score.min(100)
}

/// Share of projects with a real description (50%), with stars (30%), and
/// with more than one language (20%).
fn score_documentation(projects: &[ProjectRow]) -> u32 {
    let total = projects.len() as f64;
    let described = projects
        .iter()
        .filter(|p| p.description.as_deref().map(str::len).unwrap_or(0) > 10)
        .count() as f64;
    let starred = projects.iter().filter(|p| p.stars > 0).count() as f64;
    let multi_language = projects
        .iter()
        .filter(|p| p.language_names().count() > 1)
        .count() as f64;

    ((described / total) * 50.0 + (starred / total) * 30.0 + (multi_language / total) * 20.0)
        .round() as u32
}

/// Recent activity (commit within 3 months, 60%) and community signal
/// (stars or forks, 40%).
fn score_consistency(projects: &[ProjectRow]) -> u32 {
    let total = projects.len() as f64;
    let cutoff = Utc::now() - Months::new(3);

    let recent = projects
        .iter()
        .filter(|p| p.last_commit_date.map(|d| d > cutoff).unwrap_or(false))
        .count() as f64;
    let engaged = projects
        .iter()
        .filter(|p| p.stars > 0 || p.forks > 0)
        .count() as f64;

    ((recent / total) * 60.0 + (engaged / total) * 40.0).round() as u32
}

fn build_feedback(
    projects: &[ProjectRow],
    project_quality: u32,
    tech_diversity: u32,
    documentation: u32,
    consistency: u32,
) -> ScoreBreakdown {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut suggestions = Vec::new();

    if project_quality >= 70 {
        strengths.push("Strong project complexity across your portfolio".to_string());
    } else if project_quality < 50 {
        weaknesses.push("Projects could be more substantial".to_string());
        suggestions.push("Build a larger project with multiple features".to_string());
    }

    if tech_diversity >= 70 {
        strengths.push("Great variety of technologies".to_string());
    } else if tech_diversity < 50 {
        weaknesses.push("Limited technology diversity".to_string());
        suggestions.push("Try a project in a new language or framework".to_string());
    }

    if documentation >= 70 {
        strengths.push("Well-documented repositories".to_string());
    } else if documentation < 50 {
        weaknesses.push("Repositories lack descriptions".to_string());
        suggestions.push("Add clear descriptions and READMEs to your repositories".to_string());
    }

    if consistency >= 70 {
        strengths.push("Consistent recent activity".to_string());
    } else if consistency < 50 {
        weaknesses.push("Low recent activity".to_string());
        suggestions.push("Commit regularly to keep your portfolio active".to_string());
    }

    if projects.len() < 3 {
        suggestions.push("Add more projects to strengthen your portfolio".to_string());
    } else if projects.len() >= 10 {
        strengths.push(format!("Impressive portfolio with {} projects", projects.len()));
    }

    ScoreBreakdown {
        strengths,
        weaknesses,
        suggestions,
    }
}
