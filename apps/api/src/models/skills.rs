use std::fmt;

use serde::{Deserialize, Serialize};

/// Target role tags. A closed set; unknown tags are rejected at the
/// validation boundary before any analysis runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Frontend,
    Backend,
    Fullstack,
    Devops,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Frontend, Role::Backend, Role::Fullstack, Role::Devops];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Frontend => "frontend",
            Role::Backend => "backend",
            Role::Fullstack => "fullstack",
            Role::Devops => "devops",
        }
    }

    /// Case-insensitive parse of a role tag. Returns `None` for anything
    /// outside the configured set.
    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim().to_lowercase().as_str() {
            "frontend" => Some(Role::Frontend),
            "backend" => Some(Role::Backend),
            "fullstack" => Some(Role::Fullstack),
            "devops" => Some(Role::Devops),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Skill requirements for one role, split into three priority tiers.
/// Loaded from the static catalog; tier order is meaningful and preserved
/// through gap calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRequirements {
    pub title: String,
    pub essential: Vec<String>,
    pub preferred: Vec<String>,
    pub nice_to_have: Vec<String>,
}

/// Required skills the user does not yet demonstrate, per tier, in the
/// original requirement order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingSkills {
    pub essential: Vec<String>,
    pub preferred: Vec<String>,
    pub nice_to_have: Vec<String>,
}

impl MissingSkills {
    pub fn total(&self) -> usize {
        self.essential.len() + self.preferred.len() + self.nice_to_have.len()
    }
}

/// Result of comparing a user's present skills against a role's requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapAnalysis {
    pub role: Role,
    pub present_skills: Vec<String>,
    pub missing_skills: MissingSkills,
    /// Share of the essential tier the user already covers, 0-100.
    pub coverage_percentage: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GapStatus {
    Excellent,
    Good,
    NeedsWork,
    Beginner,
}

/// Human-readable summary derived from a `GapAnalysis`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapSummary {
    pub status: GapStatus,
    pub message: String,
    /// What to learn next: up to 3 essential gaps then up to 2 preferred.
    pub priority: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!(Role::parse("Frontend"), Some(Role::Frontend));
        assert_eq!(Role::parse("  DEVOPS "), Some(Role::Devops));
    }

    #[test]
    fn test_role_parse_rejects_unknown_tags() {
        assert_eq!(Role::parse("data-science"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_role_serde_roundtrip() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            let back: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(back, role);
        }
    }

    #[test]
    fn test_gap_status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&GapStatus::NeedsWork).unwrap(),
            r#""needs-work""#
        );
    }

    #[test]
    fn test_missing_skills_total() {
        let missing = MissingSkills {
            essential: vec!["React".to_string()],
            preferred: vec!["Docker".to_string(), "Testing".to_string()],
            nice_to_have: vec![],
        };
        assert_eq!(missing.total(), 3);
    }
}
