//! Gap calculation: set difference between a role's requirement tiers and a
//! user's present skills, plus essential-tier coverage.

use crate::analysis::normalize::skills_match;
use crate::catalog::Catalog;
use crate::errors::AppError;
use crate::models::skills::{GapAnalysis, GapStatus, GapSummary, MissingSkills, Role};

/// Computes the missing skills per tier (original tier order preserved) and
/// the essential coverage percentage.
pub fn calculate_skill_gaps(
    present_skills: &[String],
    target_role: Role,
    catalog: &Catalog,
) -> Result<GapAnalysis, AppError> {
    let requirements = catalog.requirements(target_role).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid target role '{target_role}'. Must be one of: frontend, backend, fullstack, devops"
        ))
    })?;

    let has_skill =
        |required: &str| present_skills.iter().any(|present| skills_match(required, present));
    let missing_in = |tier: &[String]| -> Vec<String> {
        tier.iter().filter(|skill| !has_skill(skill)).cloned().collect()
    };

    let missing_essential = missing_in(&requirements.essential);
    let missing_preferred = missing_in(&requirements.preferred);
    let missing_nice_to_have = missing_in(&requirements.nice_to_have);

    // An empty essential tier means there is nothing left to cover.
    let coverage_percentage = if requirements.essential.is_empty() {
        100
    } else {
        let met = requirements.essential.len() - missing_essential.len();
        ((met as f64 / requirements.essential.len() as f64) * 100.0).round() as u32
    };

    Ok(GapAnalysis {
        role: target_role,
        present_skills: present_skills.to_vec(),
        missing_skills: MissingSkills {
            essential: missing_essential,
            preferred: missing_preferred,
            nice_to_have: missing_nice_to_have,
        },
        coverage_percentage,
    })
}

/// Classifies coverage into a status band and builds the learning priority
/// list: first 3 missing-essential skills, then first 2 missing-preferred.
pub fn skill_gap_summary(analysis: &GapAnalysis) -> GapSummary {
    let pct = analysis.coverage_percentage;
    let (status, message) = if pct >= 90 {
        (
            GapStatus::Excellent,
            format!("You have {pct}% of essential skills! Focus on preferred skills to stand out."),
        )
    } else if pct >= 70 {
        (
            GapStatus::Good,
            format!("You have {pct}% of essential skills. Fill the remaining gaps to be job-ready."),
        )
    } else if pct >= 40 {
        (
            GapStatus::NeedsWork,
            format!(
                "You have {pct}% of essential skills. Focus on building projects with missing technologies."
            ),
        )
    } else {
        (
            GapStatus::Beginner,
            format!(
                "You have {pct}% of essential skills. Start with beginner-friendly projects to build fundamentals."
            ),
        )
    };

    let priority = analysis
        .missing_skills
        .essential
        .iter()
        .take(3)
        .chain(analysis.missing_skills.preferred.iter().take(2))
        .cloned()
        .collect();

    GapSummary {
        status,
        message,
        priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_essential_is_subset_in_original_order() {
        let catalog = Catalog::load().unwrap();
        let analysis =
            calculate_skill_gaps(&skills(&["HTML", "CSS"]), Role::Frontend, &catalog).unwrap();

        let essential = &catalog.requirements(Role::Frontend).unwrap().essential;
        let mut last_index = 0;
        for missing in &analysis.missing_skills.essential {
            let index = essential
                .iter()
                .position(|s| s == missing)
                .expect("missing skill must come from the configured tier");
            assert!(index >= last_index, "tier order not preserved");
            last_index = index;
        }
    }

    #[test]
    fn test_scenario_half_the_essentials_met() {
        // present = [JavaScript, HTML, CSS] against the frontend tier
        // [HTML, CSS, JavaScript, TypeScript, React, Git]: 3 of 6 met.
        let catalog = Catalog::load().unwrap();
        let analysis = calculate_skill_gaps(
            &skills(&["JavaScript", "HTML", "CSS"]),
            Role::Frontend,
            &catalog,
        )
        .unwrap();

        assert_eq!(
            analysis.missing_skills.essential,
            skills(&["TypeScript", "React", "Git"])
        );
        assert_eq!(analysis.coverage_percentage, 50);
    }

    #[test]
    fn test_coverage_percentage_formula() {
        let catalog = Catalog::load().unwrap();
        let requirements = catalog.requirements(Role::Devops).unwrap();
        let present = skills(&[requirements.essential[0].as_str()]);
        let analysis = calculate_skill_gaps(&present, Role::Devops, &catalog).unwrap();

        let total = requirements.essential.len();
        let missing = analysis.missing_skills.essential.len();
        let expected = (((total - missing) as f64 / total as f64) * 100.0).round() as u32;
        assert_eq!(analysis.coverage_percentage, expected);
    }

    #[test]
    fn test_full_coverage_yields_100() {
        let catalog = Catalog::load().unwrap();
        let requirements = catalog.requirements(Role::Devops).unwrap();
        let present: Vec<String> = requirements.essential.clone();
        let analysis = calculate_skill_gaps(&present, Role::Devops, &catalog).unwrap();
        assert_eq!(analysis.coverage_percentage, 100);
        assert!(analysis.missing_skills.essential.is_empty());
    }

    #[test]
    fn test_coverage_bounded_for_empty_present_skills() {
        let catalog = Catalog::load().unwrap();
        let analysis = calculate_skill_gaps(&[], Role::Backend, &catalog).unwrap();
        assert_eq!(analysis.coverage_percentage, 0);
        assert_eq!(
            analysis.missing_skills.essential,
            catalog.requirements(Role::Backend).unwrap().essential
        );
    }

    #[test]
    fn test_summary_bands() {
        let analysis = |pct| GapAnalysis {
            role: Role::Frontend,
            present_skills: vec![],
            missing_skills: MissingSkills {
                essential: vec![],
                preferred: vec![],
                nice_to_have: vec![],
            },
            coverage_percentage: pct,
        };

        assert_eq!(skill_gap_summary(&analysis(95)).status, GapStatus::Excellent);
        assert_eq!(skill_gap_summary(&analysis(90)).status, GapStatus::Excellent);
        assert_eq!(skill_gap_summary(&analysis(75)).status, GapStatus::Good);
        assert_eq!(skill_gap_summary(&analysis(40)).status, GapStatus::NeedsWork);
        assert_eq!(skill_gap_summary(&analysis(10)).status, GapStatus::Beginner);
    }

    #[test]
    fn test_summary_message_interpolates_percentage() {
        let catalog = Catalog::load().unwrap();
        let analysis = calculate_skill_gaps(&[], Role::Frontend, &catalog).unwrap();
        let summary = skill_gap_summary(&analysis);
        assert!(summary.message.contains("0%"));
    }

    #[test]
    fn test_summary_priority_three_essential_then_two_preferred() {
        let analysis = GapAnalysis {
            role: Role::Backend,
            present_skills: vec![],
            missing_skills: MissingSkills {
                essential: skills(&["A", "B", "C", "D"]),
                preferred: skills(&["P1", "P2", "P3"]),
                nice_to_have: vec![],
            },
            coverage_percentage: 0,
        };
        let summary = skill_gap_summary(&analysis);
        assert_eq!(summary.priority, skills(&["A", "B", "C", "P1", "P2"]));
    }

    #[test]
    fn test_token_matching_rejects_cross_word_hits() {
        let catalog = Catalog::load().unwrap();
        // "Django" must not satisfy the "Go" essential for devops.
        let analysis =
            calculate_skill_gaps(&skills(&["Django"]), Role::Devops, &catalog).unwrap();
        assert!(analysis
            .missing_skills
            .nice_to_have
            .contains(&"Go".to_string()));
    }
}
