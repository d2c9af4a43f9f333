//! Static catalogs: role requirement tiers and the project-template library.
//!
//! Both are embedded JSON documents parsed once at startup and carried in
//! `AppState` behind an `Arc`. Nothing mutates them afterwards.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::skills::{Role, RoleRequirements};

const ROLE_REQUIREMENTS_JSON: &str = include_str!("../../data/role-requirements.json");
const PROJECT_TEMPLATES_JSON: &str = include_str!("../../data/project-templates.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn parse(raw: &str) -> Option<Difficulty> {
        match raw.trim().to_lowercase().as_str() {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningResource {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A predefined project idea catalogued with the skills it teaches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub difficulty: Difficulty,
    pub time_estimate: String,
    pub skills_taught: Vec<String>,
    /// Which role track the template serves. Same closed set as `Role`.
    pub category: Role,
    pub features: Vec<String>,
    pub learning_resources: Vec<LearningResource>,
}

#[derive(Debug, Deserialize)]
struct TemplateFile {
    templates: Vec<ProjectTemplate>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    roles: BTreeMap<Role, RoleRequirements>,
    templates: Vec<ProjectTemplate>,
}

impl Catalog {
    /// Parses and validates the embedded catalogs. Fails fast at startup on
    /// a missing role or a duplicate template id.
    pub fn load() -> Result<Self> {
        Self::from_parts(ROLE_REQUIREMENTS_JSON, PROJECT_TEMPLATES_JSON)
    }

    fn from_parts(roles_json: &str, templates_json: &str) -> Result<Self> {
        let roles: BTreeMap<Role, RoleRequirements> =
            serde_json::from_str(roles_json).context("role-requirements.json is malformed")?;

        for role in Role::ALL {
            if !roles.contains_key(&role) {
                bail!("role-requirements.json is missing role '{role}'");
            }
        }

        let templates = serde_json::from_str::<TemplateFile>(templates_json)
            .context("project-templates.json is malformed")?
            .templates;

        let mut seen = BTreeSet::new();
        for template in &templates {
            if !seen.insert(template.id.as_str()) {
                bail!("duplicate template id '{}'", template.id);
            }
        }

        Ok(Self { roles, templates })
    }

    /// Requirements for a role, or `None` when the role is not configured.
    pub fn requirements(&self, role: Role) -> Option<&RoleRequirements> {
        self.roles.get(&role)
    }

    pub fn roles(&self) -> &BTreeMap<Role, RoleRequirements> {
        &self.roles
    }

    pub fn templates(&self) -> &[ProjectTemplate] {
        &self.templates
    }
}
