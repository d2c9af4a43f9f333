//! Skill extraction over a user's projects.
//!
//! Per project, three escalating strategies: declared languages (always
//! contribute), dependency manifests when the repository is reachable, then
//! an LLM fallback when manifests yield nothing. The description synonym scan
//! runs regardless. Collaborator failures contribute zero skills and
//! processing continues; the extractor itself never errors.

use std::collections::BTreeSet;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::analysis::manifests::{extract_skills_from_dependencies, DependencyFiles};
use crate::analysis::normalize::{detect_skills_in_text, normalize_skill};
use crate::errors::AppError;
use crate::models::project::ProjectRow;

/// Fetches whichever well-known dependency manifests exist in a repository.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    async fn fetch_dependency_files(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<DependencyFiles, AppError>;
}

/// Identifies frameworks and technologies when manifests are unavailable.
/// Implementations must degrade to an empty list instead of failing.
#[async_trait]
pub trait TechDetector: Send + Sync {
    async fn detect_technologies(
        &self,
        name: &str,
        languages: &[String],
        description: Option<&str>,
    ) -> Vec<String>;
}

/// Extracts `owner/repo` from a GitHub URL, tolerating trailing paths and a
/// `.git` suffix. Returns `None` for anything that is not a GitHub repo URL.
pub fn parse_repo_url(url: &str) -> Option<(String, String)> {
    let rest = url.split("github.com/").nth(1)?;
    let mut parts = rest.split('/').filter(|segment| !segment.is_empty());
    let owner = parts.next()?;
    let repo = parts.next()?.trim_end_matches(".git");
    if repo.is_empty() {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

/// Union of canonical skills contributed across all projects and strategies.
pub async fn extract_skills_from_projects(
    projects: &[ProjectRow],
    manifests: Option<&dyn ManifestSource>,
    detector: &dyn TechDetector,
) -> BTreeSet<String> {
    let mut skills = BTreeSet::new();

    for project in projects {
        // 1. Declared languages always contribute.
        let languages: Vec<String> = project.language_names().map(normalize_skill).collect();
        skills.extend(languages.iter().cloned());

        // 2. Dependency manifests, when the repository is reachable.
        let mut manifest_hit = false;
        let repo = project.url.as_deref().and_then(parse_repo_url);
        if let (Some(source), Some((owner, repo))) = (manifests, repo) {
            match source.fetch_dependency_files(&owner, &repo).await {
                Ok(files) => {
                    let found = extract_skills_from_dependencies(&files);
                    debug!("{owner}/{repo}: {} skills from manifests", found.len());
                    manifest_hit = !found.is_empty();
                    skills.extend(found);
                }
                Err(e) => {
                    warn!("manifest fetch failed for {owner}/{repo}, falling back: {e}");
                }
            }
        }

        // 3. LLM fallback only when manifests yielded nothing.
        if !manifest_hit {
            let detected = detector
                .detect_technologies(&project.name, &languages, project.description.as_deref())
                .await;
            skills.extend(detected.iter().map(|s| normalize_skill(s)));
        }

        // 4. Description scan for quick wins.
        if let Some(description) = &project.description {
            skills.extend(
                detect_skills_in_text(description)
                    .into_iter()
                    .map(str::to_string),
            );
        }
    }

    skills
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use sqlx::types::Json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    fn project(name: &str, languages: &[&str], description: Option<&str>, url: Option<&str>) -> ProjectRow {
        ProjectRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.map(str::to_string),
            url: url.map(str::to_string),
            github_repo_id: None,
            languages: Some(Json(
                languages.iter().map(|l| (l.to_string(), 50.0)).collect(),
            )),
            stars: 0,
            forks: 0,
            complexity_score: None,
            last_commit_date: None,
            created_at: Utc::now(),
        }
    }

    struct StubManifests {
        files: DependencyFiles,
        fail: bool,
    }

    #[async_trait]
    impl ManifestSource for StubManifests {
        async fn fetch_dependency_files(
            &self,
            _owner: &str,
            _repo: &str,
        ) -> Result<DependencyFiles, AppError> {
            if self.fail {
                Err(AppError::Validation("stub failure".to_string()))
            } else {
                Ok(self.files.clone())
            }
        }
    }

    struct StubDetector {
        skills: Vec<String>,
        calls: AtomicUsize,
    }

    impl StubDetector {
        fn new(skills: &[&str]) -> Self {
            Self {
                skills: skills.iter().map(|s| s.to_string()).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TechDetector for StubDetector {
        async fn detect_technologies(
            &self,
            _name: &str,
            _languages: &[String],
            _description: Option<&str>,
        ) -> Vec<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.skills.clone()
        }
    }

    #[test]
    fn test_parse_repo_url_variants() {
        assert_eq!(
            parse_repo_url("https://github.com/octocat/hello-world"),
            Some(("octocat".to_string(), "hello-world".to_string()))
        );
        assert_eq!(
            parse_repo_url("https://github.com/octocat/hello-world.git"),
            Some(("octocat".to_string(), "hello-world".to_string()))
        );
        assert_eq!(
            parse_repo_url("https://github.com/octocat/hello-world/tree/main"),
            Some(("octocat".to_string(), "hello-world".to_string()))
        );
        assert_eq!(parse_repo_url("https://gitlab.com/octocat/repo"), None);
        assert_eq!(parse_repo_url("https://github.com/only-owner"), None);
    }

    #[tokio::test]
    async fn test_languages_always_contribute() {
        let projects = vec![project("p1", &["TypeScript", "CSS"], None, None)];
        let detector = StubDetector::new(&[]);
        let skills = extract_skills_from_projects(&projects, None, &detector).await;
        assert!(skills.contains("TypeScript"));
        assert!(skills.contains("CSS"));
    }

    #[tokio::test]
    async fn test_manifest_hit_skips_llm_fallback() {
        let projects = vec![project(
            "p1",
            &["JavaScript"],
            None,
            Some("https://github.com/a/b"),
        )];
        let manifests = StubManifests {
            files: DependencyFiles {
                package_json: Some(json!({ "dependencies": { "react": "1" } })),
                ..Default::default()
            },
            fail: false,
        };
        let detector = StubDetector::new(&["ShouldNotAppear"]);

        let skills =
            extract_skills_from_projects(&projects, Some(&manifests), &detector).await;

        assert!(skills.contains("React"));
        assert!(!skills.contains("ShouldNotAppear"));
        assert_eq!(detector.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_manifest_failure_falls_back_to_llm() {
        let projects = vec![project(
            "p1",
            &["Python"],
            None,
            Some("https://github.com/a/b"),
        )];
        let manifests = StubManifests {
            files: DependencyFiles::default(),
            fail: true,
        };
        let detector = StubDetector::new(&["Django"]);

        let skills =
            extract_skills_from_projects(&projects, Some(&manifests), &detector).await;

        assert!(skills.contains("Django"));
        assert_eq!(detector.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_description_scan_contributes_alongside_manifests() {
        let projects = vec![project(
            "p1",
            &[],
            Some("Deployed on Kubernetes with Docker"),
            Some("https://github.com/a/b"),
        )];
        let manifests = StubManifests {
            files: DependencyFiles {
                cargo_toml: Some("[dependencies]".to_string()),
                ..Default::default()
            },
            fail: false,
        };
        let detector = StubDetector::new(&[]);

        let skills =
            extract_skills_from_projects(&projects, Some(&manifests), &detector).await;

        assert!(skills.contains("Rust"));
        assert!(skills.contains("Kubernetes"));
        assert!(skills.contains("Docker"));
    }

    #[tokio::test]
    async fn test_llm_results_are_normalized_and_unioned() {
        let projects = vec![
            project("p1", &["js"], None, None),
            project("p2", &["golang"], None, None),
        ];
        let detector = StubDetector::new(&["reactjs"]);

        let skills = extract_skills_from_projects(&projects, None, &detector).await;

        assert!(skills.contains("JavaScript"));
        assert!(skills.contains("Go"));
        assert!(skills.contains("React"));
        // LLM fallback ran once per project without a manifest hit.
        assert_eq!(detector.calls.load(Ordering::SeqCst), 2);
    }
}
