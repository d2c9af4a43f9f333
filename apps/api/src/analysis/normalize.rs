//! Canonical skill vocabulary: name normalization, free-text detection, and
//! the matching rule shared by the gap calculator, template matcher, and job
//! matcher.

/// Variant -> canonical skill name. Lookup is case-insensitive. Unmapped
/// tokens pass through trimmed, so normalization is idempotent on names that
/// are already canonical.
const SKILL_ALIASES: &[(&str, &str)] = &[
    ("javascript", "JavaScript"),
    ("js", "JavaScript"),
    ("typescript", "TypeScript"),
    ("ts", "TypeScript"),
    ("python", "Python"),
    ("py", "Python"),
    ("java", "Java"),
    ("csharp", "C#"),
    ("c#", "C#"),
    ("cpp", "C++"),
    ("c++", "C++"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("sql", "SQL"),
    ("go", "Go"),
    ("golang", "Go"),
    ("rust", "Rust"),
    ("ruby", "Ruby"),
    ("php", "PHP"),
    ("swift", "Swift"),
    ("kotlin", "Kotlin"),
    ("dart", "Dart"),
    ("shell", "Shell"),
    ("bash", "Bash"),
    // Common framework spellings. Folding these here keeps `skills_match`
    // strict: variants unify before matching instead of via loose substrings.
    ("reactjs", "React"),
    ("react.js", "React"),
    ("nextjs", "Next.js"),
    ("next.js", "Next.js"),
    ("nodejs", "Node.js"),
    ("node.js", "Node.js"),
    ("vuejs", "Vue"),
    ("vue.js", "Vue"),
    ("postgres", "PostgreSQL"),
    ("postgresql", "PostgreSQL"),
    ("mongo", "MongoDB"),
    ("mongodb", "MongoDB"),
    ("k8s", "Kubernetes"),
];

/// Maps a raw token (language name, dependency key, free-text mention) to its
/// canonical skill name, or passes it through trimmed when no mapping exists.
pub fn normalize_skill(raw: &str) -> String {
    let trimmed = raw.trim();
    let lower = trimmed.to_lowercase();
    SKILL_ALIASES
        .iter()
        .find(|(variant, _)| *variant == lower)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Framework/tool synonym groups scanned against free-text descriptions.
/// Substring match, case-insensitive, one hit per group.
const SKILL_PATTERNS: &[(&str, &[&str])] = &[
    ("React", &["react", "reactjs", "react.js"]),
    ("Next.js", &["nextjs", "next.js"]),
    ("Vue", &["vue", "vuejs", "vue.js"]),
    ("Angular", &["angular"]),
    ("Svelte", &["svelte"]),
    ("Tailwind CSS", &["tailwind", "tailwindcss"]),
    ("Bootstrap", &["bootstrap"]),
    ("Node.js", &["nodejs", "node.js", "node backend"]),
    ("Express", &["express", "expressjs"]),
    ("Django", &["django"]),
    ("Flask", &["flask"]),
    ("FastAPI", &["fastapi"]),
    ("Spring", &["spring", "spring boot"]),
    ("Laravel", &["laravel"]),
    ("Rails", &["rails", "ruby on rails"]),
    ("MongoDB", &["mongodb", "mongo"]),
    ("PostgreSQL", &["postgresql", "postgres"]),
    ("MySQL", &["mysql"]),
    ("Redis", &["redis"]),
    ("Firebase", &["firebase"]),
    ("Supabase", &["supabase"]),
    ("SQLite", &["sqlite"]),
    ("Docker", &["docker"]),
    ("Kubernetes", &["kubernetes", "k8s"]),
    ("AWS", &["aws", "amazon web services"]),
    ("Azure", &["azure"]),
    ("GCP", &["gcp", "google cloud"]),
    ("Vercel", &["vercel"]),
    ("Netlify", &["netlify"]),
    ("Git", &["git"]),
    ("CI/CD", &["ci/cd", "cicd", "continuous integration"]),
    ("Webpack", &["webpack"]),
    ("Vite", &["vite"]),
    ("Jest", &["jest"]),
    ("Testing", &["testing", "unit test", "integration test"]),
    ("Redux", &["redux"]),
    ("Zustand", &["zustand"]),
    ("REST API", &["rest api", "restful"]),
    ("GraphQL", &["graphql"]),
    ("React Native", &["react native"]),
];

/// Scans free text for known framework/tool mentions and returns the
/// canonical group labels, one per matched group.
pub fn detect_skills_in_text(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    SKILL_PATTERNS
        .iter()
        .filter(|(_, patterns)| patterns.iter().any(|p| lower.contains(p)))
        .map(|(label, _)| *label)
        .collect()
}

fn tokens(s: &str) -> Vec<&str> {
    s.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|t| !t.is_empty())
        .collect()
}

fn contains_run(haystack: &[&str], needle: &[&str]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|window| window == needle)
}

/// Case-insensitive skill equivalence. Exact match after normalization, or
/// the shorter name appearing as a whole-token run inside the longer one:
/// "React" matches "React Framework (React, Vue or Angular)", while "Go"
/// does not match "Django" and "Java" does not match "JavaScript".
pub fn skills_match(a: &str, b: &str) -> bool {
    let a = normalize_skill(a).to_lowercase();
    let b = normalize_skill(b).to_lowercase();
    if a == b {
        return true;
    }
    let tokens_a = tokens(&a);
    let tokens_b = tokens(&b);
    contains_run(&tokens_a, &tokens_b) || contains_run(&tokens_b, &tokens_a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_maps_variants() {
        assert_eq!(normalize_skill("js"), "JavaScript");
        assert_eq!(normalize_skill("GOLANG"), "Go");
        assert_eq!(normalize_skill("  ts "), "TypeScript");
        assert_eq!(normalize_skill("postgres"), "PostgreSQL");
    }

    #[test]
    fn test_normalize_is_idempotent_on_canonical_names() {
        for name in ["JavaScript", "Go", "C++", "Next.js", "PostgreSQL"] {
            let once = normalize_skill(name);
            assert_eq!(once, name);
            assert_eq!(normalize_skill(&once), once);
        }
    }

    #[test]
    fn test_normalize_passes_unknown_through_trimmed() {
        assert_eq!(normalize_skill("  Elixir  "), "Elixir");
    }

    #[test]
    fn test_detect_skills_in_text_finds_groups() {
        let found = detect_skills_in_text("A dashboard built with React and Tailwind, deployed with Docker");
        assert!(found.contains(&"React"));
        assert!(found.contains(&"Tailwind CSS"));
        assert!(found.contains(&"Docker"));
    }

    #[test]
    fn test_detect_skills_dedupes_per_group() {
        let found = detect_skills_in_text("react react.js reactjs everywhere");
        assert_eq!(found.iter().filter(|s| **s == "React").count(), 1);
    }

    #[test]
    fn test_detect_skills_empty_for_plain_text() {
        assert!(detect_skills_in_text("a small utility library").is_empty());
    }

    #[test]
    fn test_skills_match_exact_case_insensitive() {
        assert!(skills_match("react", "React"));
        assert!(skills_match(" TypeScript ", "typescript"));
    }

    #[test]
    fn test_skills_match_through_normalization() {
        assert!(skills_match("golang", "Go"));
        assert!(skills_match("ReactJS", "React"));
        assert!(skills_match("node.js", "nodejs"));
    }

    #[test]
    fn test_skills_match_token_containment() {
        assert!(skills_match("React", "React Framework (React, Vue or Angular)"));
        assert!(skills_match("CI/CD", "CI/CD pipelines"));
    }

    #[test]
    fn test_skills_match_is_symmetric() {
        assert_eq!(
            skills_match("React", "React Framework"),
            skills_match("React Framework", "React")
        );
    }

    #[test]
    fn test_skills_match_rejects_cross_word_substrings() {
        assert!(!skills_match("Go", "Django"));
        assert!(!skills_match("Java", "JavaScript"));
        assert!(!skills_match("R", "React"));
    }
}
