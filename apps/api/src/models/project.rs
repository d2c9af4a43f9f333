use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use uuid::Uuid;

/// A GitHub-derived project as stored in the `projects` table.
/// Immutable within a single scoring pass; sync happens elsewhere.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub github_repo_id: Option<i64>,
    /// Declared language -> share of the codebase, as reported by GitHub.
    pub languages: Option<Json<BTreeMap<String, f64>>>,
    pub stars: i32,
    pub forks: i32,
    /// Precomputed elsewhere (codebase analysis pipeline), 0-100.
    pub complexity_score: Option<f64>,
    pub last_commit_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ProjectRow {
    /// Iterates the declared language names, if any.
    pub fn language_names(&self) -> impl Iterator<Item = &str> {
        self.languages
            .iter()
            .flat_map(|langs| langs.0.keys())
            .map(String::as_str)
    }
}
