// Prompt constants and builders for every LLM call site. Kept in one file so
// wording changes are reviewed together.

use crate::catalog::ProjectTemplate;

/// Project descriptions are clipped before being interpolated into prompts.
const MAX_DESCRIPTION_CHARS: usize = 1000;

pub const CODEBASE_ANALYSIS_SYSTEM: &str = "You are a code analysis expert. \
    Identify the technologies, frameworks, and tools a project uses. \
    Respond with a JSON array of technology names only. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences.";

pub fn codebase_analysis_prompt(
    name: &str,
    languages: &[String],
    description: Option<&str>,
) -> String {
    let description: String = description
        .unwrap_or("(no description)")
        .chars()
        .take(MAX_DESCRIPTION_CHARS)
        .collect();

    format!(
        "Identify the frameworks and technologies this repository most likely uses.\n\
         Repository name: {name}\n\
         Languages: {}\n\
         Description: {description}\n\n\
         Return a JSON array of specific technology names, for example \
         [\"React\", \"PostgreSQL\", \"Docker\"]. \
         Only include technologies you are confident about.",
        languages.join(", ")
    )
}

pub const JOB_SKILLS_SYSTEM: &str = "You are a technical recruiter expert at \
    reading job descriptions. Extract the concrete technical skills a posting \
    requires. Respond with a JSON array of skill names only. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences.";

pub fn job_skills_prompt(description: &str) -> String {
    format!(
        "Extract the technical skills required by this job description. \
         Include languages, frameworks, databases, and tools. Exclude soft \
         skills and years-of-experience qualifiers.\n\n\
         Job description:\n{description}\n\n\
         Return a JSON array of skill names, for example \
         [\"TypeScript\", \"React\", \"AWS\"]."
    )
}

pub const PERSONALIZE_SYSTEM: &str = "You are a friendly programming mentor. \
    Write short, encouraging project pitches. Respond with plain text only, \
    two to three sentences, no markdown.";

pub fn personalize_prompt(
    template: &ProjectTemplate,
    present_skills: &[String],
    gaps_filled: &[String],
) -> String {
    format!(
        "Rewrite this project description for a learner.\n\
         Project: {}\n\
         Stock description: {}\n\
         Tech stack: {}\n\
         The learner already knows: {}\n\
         This project would teach them: {}\n\n\
         Explain in 2-3 sentences why this project is a good next step, \
         referencing what they already know and what they would learn.",
        template.name,
        template.description,
        template.tech_stack.join(", "),
        present_skills.join(", "),
        gaps_filled.join(", ")
    )
}
