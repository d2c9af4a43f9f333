#![allow(dead_code)]
//! Template recommendation: ranks catalog templates by how many of the user's
//! missing skills each one teaches, essential gaps weighted heaviest.

use serde::Serialize;

use crate::analysis::normalize::skills_match;
use crate::catalog::{Difficulty, ProjectTemplate};
use crate::models::skills::{MissingSkills, Role};

/// Missing skills a single template would teach, broken down by tier.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapsFilled {
    pub essential: Vec<String>,
    pub preferred: Vec<String>,
    pub nice_to_have: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMatch {
    pub template: ProjectTemplate,
    pub gaps_filled: GapsFilled,
    pub priority_score: u32,
    pub match_percentage: u32,
}

fn gaps_taught_by(template: &ProjectTemplate, gaps: &MissingSkills) -> GapsFilled {
    let taught = |tier: &[String]| -> Vec<String> {
        tier.iter()
            .filter(|gap| {
                template
                    .skills_taught
                    .iter()
                    .any(|skill| skills_match(skill, gap))
            })
            .cloned()
            .collect()
    };

    let essential = taught(&gaps.essential);
    let preferred = taught(&gaps.preferred);
    let nice_to_have = taught(&gaps.nice_to_have);
    let total = essential.len() + preferred.len() + nice_to_have.len();

    GapsFilled {
        essential,
        preferred,
        nice_to_have,
        total,
    }
}

/// Scores every template against the gaps and returns those that fill at
/// least one, sorted by priority descending with ties broken by template id.
pub fn match_projects_to_gaps(
    gaps: &MissingSkills,
    templates: &[ProjectTemplate],
) -> Vec<ProjectMatch> {
    let total_gaps = gaps.total();

    let mut matches: Vec<ProjectMatch> = templates
        .iter()
        .filter_map(|template| {
            let gaps_filled = gaps_taught_by(template, gaps);
            if gaps_filled.total == 0 {
                return None;
            }

            let priority_score = (gaps_filled.essential.len() * 3
                + gaps_filled.preferred.len() * 2
                + gaps_filled.nice_to_have.len()) as u32;
            let match_percentage = if total_gaps == 0 {
                0
            } else {
                ((gaps_filled.total as f64 / total_gaps as f64) * 100.0).round() as u32
            };

            Some(ProjectMatch {
                template: template.clone(),
                gaps_filled,
                priority_score,
                match_percentage,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.priority_score
            .cmp(&a.priority_score)
            .then_with(|| a.template.id.cmp(&b.template.id))
    });

    matches
}

/// First `count` matches, assuming the slice is already ranked.
pub fn top_recommendations(matches: &[ProjectMatch], count: usize) -> &[ProjectMatch] {
    &matches[..matches.len().min(count)]
}

pub fn filter_by_difficulty(matches: Vec<ProjectMatch>, difficulty: Difficulty) -> Vec<ProjectMatch> {
    matches
        .into_iter()
        .filter(|m| m.template.difficulty == difficulty)
        .collect()
}

pub fn filter_by_category(matches: Vec<ProjectMatch>, category: Role) -> Vec<ProjectMatch> {
    matches
        .into_iter()
        .filter(|m| m.template.category == category)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn template(id: &str, taught: &[&str], difficulty: Difficulty, category: Role) -> ProjectTemplate {
        ProjectTemplate {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            tech_stack: vec![],
            difficulty,
            time_estimate: "2 weeks".to_string(),
            skills_taught: skills(taught),
            category,
            features: vec![],
            learning_resources: vec![],
        }
    }

    fn gaps(essential: &[&str], preferred: &[&str], nice: &[&str]) -> MissingSkills {
        MissingSkills {
            essential: skills(essential),
            preferred: skills(preferred),
            nice_to_have: skills(nice),
        }
    }

    #[test]
    fn test_template_filling_no_gaps_is_excluded() {
        let templates = vec![template("t1", &["Elm"], Difficulty::Beginner, Role::Frontend)];
        let matches = match_projects_to_gaps(&gaps(&["React"], &[], &[]), &templates);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_docker_only_gap_scores_priority_and_percentage() {
        // One preferred-tier gap filled out of one total gap.
        let templates = vec![template(
            "ci",
            &["Docker", "GitHub Actions"],
            Difficulty::Intermediate,
            Role::Devops,
        )];
        let matches = match_projects_to_gaps(&gaps(&[], &["Docker"], &[]), &templates);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].priority_score, 2);
        assert_eq!(matches[0].match_percentage, 100);
        assert_eq!(matches[0].gaps_filled.preferred, skills(&["Docker"]));
        assert_eq!(matches[0].gaps_filled.total, 1);
    }

    #[test]
    fn test_priority_weights_tiers() {
        let templates = vec![
            template("essential-heavy", &["React", "TypeScript"], Difficulty::Beginner, Role::Frontend),
            template("nice-only", &["Storybook"], Difficulty::Beginner, Role::Frontend),
        ];
        let matches = match_projects_to_gaps(
            &gaps(&["React", "TypeScript"], &[], &["Storybook"]),
            &templates,
        );

        assert_eq!(matches[0].template.id, "essential-heavy");
        assert_eq!(matches[0].priority_score, 6);
        assert_eq!(matches[1].priority_score, 1);
    }

    #[test]
    fn test_ties_break_by_template_id() {
        let templates = vec![
            template("zzz", &["React"], Difficulty::Beginner, Role::Frontend),
            template("aaa", &["React"], Difficulty::Beginner, Role::Frontend),
        ];
        let matches = match_projects_to_gaps(&gaps(&["React"], &[], &[]), &templates);
        assert_eq!(matches[0].template.id, "aaa");
        assert_eq!(matches[1].template.id, "zzz");
    }

    #[test]
    fn test_gaps_filled_preserves_tier_order() {
        let templates = vec![template(
            "t1",
            &["TypeScript", "React", "Jest"],
            Difficulty::Beginner,
            Role::Frontend,
        )];
        let matches = match_projects_to_gaps(
            &gaps(&["React", "TypeScript"], &["Jest"], &[]),
            &templates,
        );
        assert_eq!(
            matches[0].gaps_filled.essential,
            skills(&["React", "TypeScript"])
        );
    }

    #[test]
    fn test_match_percentage_rounds() {
        // 1 of 3 gaps filled -> 33%.
        let templates = vec![template("t1", &["React"], Difficulty::Beginner, Role::Frontend)];
        let matches = match_projects_to_gaps(
            &gaps(&["React", "Vue", "Angular"], &[], &[]),
            &templates,
        );
        assert_eq!(matches[0].match_percentage, 33);
    }

    #[test]
    fn test_top_recommendations_clamps_count() {
        let templates = vec![
            template("a", &["React"], Difficulty::Beginner, Role::Frontend),
            template("b", &["React"], Difficulty::Beginner, Role::Frontend),
        ];
        let matches = match_projects_to_gaps(&gaps(&["React"], &[], &[]), &templates);
        assert_eq!(top_recommendations(&matches, 5).len(), 2);
        assert_eq!(top_recommendations(&matches, 1).len(), 1);
    }

    #[test]
    fn test_filters() {
        let templates = vec![
            template("a", &["React"], Difficulty::Beginner, Role::Frontend),
            template("b", &["React"], Difficulty::Advanced, Role::Backend),
        ];
        let matches = match_projects_to_gaps(&gaps(&["React"], &[], &[]), &templates);

        let beginner = filter_by_difficulty(matches.clone(), Difficulty::Beginner);
        assert_eq!(beginner.len(), 1);
        assert_eq!(beginner[0].template.id, "a");

        let backend = filter_by_category(matches, Role::Backend);
        assert_eq!(backend.len(), 1);
        assert_eq!(backend[0].template.id, "b");
    }
}
