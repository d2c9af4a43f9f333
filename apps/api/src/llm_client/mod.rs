/// LLM Client — the single point of entry for all OpenAI API calls in GitStory.
///
/// ARCHITECTURAL RULE: No other module may call the OpenAI API directly.
/// All LLM interactions MUST go through this module.
///
/// Model: gpt-4o-mini (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

use crate::analysis::extract::TechDetector;
use crate::analysis::normalize::normalize_skill;
use crate::catalog::ProjectTemplate;
use crate::errors::AppError;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// The model used for all LLM calls in GitStory.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gpt-4o-mini";
const MAX_TOKENS: u32 = 1024;
const TEMPERATURE: f32 = 0.3;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.message.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// The single LLM client used by all services in GitStory.
/// Wraps the OpenAI Chat Completions API with retry logic and structured
/// output helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Makes a raw call to the OpenAI API, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(OPENAI_API_URL)
                .bearer_auth(&self.api_key)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                // Try to parse error message
                let message = serde_json::from_str::<OpenAiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat_response: ChatResponse = response.json().await?;

            if let Some(usage) = &chat_response.usage {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            return Ok(chat_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Finds the first top-level JSON array in a text blob, tolerating prose
/// around it. Respects string literals and escapes while tracking depth.
fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Technology detector backed by the LLM. Failures degrade to an empty list
/// so extraction keeps going without the fallback's input.
#[derive(Clone)]
pub struct LlmTechDetector {
    llm: LlmClient,
}

impl LlmTechDetector {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl TechDetector for LlmTechDetector {
    async fn detect_technologies(
        &self,
        name: &str,
        languages: &[String],
        description: Option<&str>,
    ) -> Vec<String> {
        let prompt = prompts::codebase_analysis_prompt(name, languages, description);
        let response = match self.llm.call(&prompt, prompts::CODEBASE_ANALYSIS_SYSTEM).await {
            Ok(r) => r,
            Err(e) => {
                warn!("technology detection failed for '{name}': {e}");
                return Vec::new();
            }
        };

        match response.text().and_then(parse_skill_array) {
            Some(skills) => skills,
            None => {
                warn!("technology detection for '{name}' returned no parsable array");
                Vec::new()
            }
        }
    }
}

/// Pulls a string array out of an LLM reply, tolerating code fences and
/// surrounding prose.
fn parse_skill_array(text: &str) -> Option<Vec<String>> {
    let json = extract_json_array(strip_json_fences(text))?;
    serde_json::from_str(json).ok()
}

/// Extracts the skills a job posting requires. Unlike technology detection,
/// a failure here invalidates the whole match, so the error propagates.
pub async fn extract_job_skills(llm: &LlmClient, description: &str) -> Result<Vec<String>, AppError> {
    let prompt = prompts::job_skills_prompt(description);
    let response = llm
        .call(&prompt, prompts::JOB_SKILLS_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    let text = response
        .text()
        .ok_or_else(|| AppError::Llm("empty response".to_string()))?;
    let json = extract_json_array(strip_json_fences(text))
        .ok_or_else(|| AppError::Llm("no JSON array in response".to_string()))?;
    let raw: Vec<String> =
        serde_json::from_str(json).map_err(|e| AppError::Llm(e.to_string()))?;

    Ok(raw
        .iter()
        .map(|s| normalize_skill(s))
        .filter(|s| !s.is_empty())
        .collect())
}

/// Rewrites a template description around what the user knows and what the
/// project would teach them. Callers fall back to the stock description on
/// error.
pub async fn personalize_description(
    llm: &LlmClient,
    template: &ProjectTemplate,
    present_skills: &[String],
    gaps_filled: &[String],
) -> Result<String, LlmError> {
    let prompt = prompts::personalize_prompt(template, present_skills, gaps_filled);
    let response = llm.call(&prompt, prompts::PERSONALIZE_SYSTEM).await?;
    let text = response.text().ok_or(LlmError::EmptyContent)?;
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_json_array_plain() {
        assert_eq!(
            extract_json_array(r#"["React", "Docker"]"#),
            Some(r#"["React", "Docker"]"#)
        );
    }

    #[test]
    fn test_extract_json_array_with_surrounding_prose() {
        let input = "Here are the skills: [\"Go\", \"SQL\"] — hope that helps!";
        assert_eq!(extract_json_array(input), Some(r#"["Go", "SQL"]"#));
    }

    #[test]
    fn test_extract_json_array_respects_brackets_in_strings() {
        let input = r#"["arr[0] access", "b"]"#;
        assert_eq!(extract_json_array(input), Some(input));
    }

    #[test]
    fn test_extract_json_array_nested() {
        let input = r#"[["a"], ["b"]]"#;
        assert_eq!(extract_json_array(input), Some(input));
    }

    #[test]
    fn test_parse_skill_array_with_surrounding_prose() {
        let input = r#"Here are the technologies: ["React", "Docker"]"#;
        assert_eq!(
            parse_skill_array(input),
            Some(vec!["React".to_string(), "Docker".to_string()])
        );
    }

    #[test]
    fn test_parse_skill_array_with_fences_and_prose() {
        let input = "```json\nThe stack is [\"Rust\", \"PostgreSQL\"], roughly.\n```";
        assert_eq!(
            parse_skill_array(input),
            Some(vec!["Rust".to_string(), "PostgreSQL".to_string()])
        );
    }

    #[test]
    fn test_parse_skill_array_none_on_garbage() {
        assert_eq!(parse_skill_array("no list in sight"), None);
        assert_eq!(parse_skill_array("[1, 2, 3"), None);
    }

    #[test]
    fn test_extract_json_array_none_when_unclosed() {
        assert_eq!(extract_json_array("[\"a\", \"b\""), None);
        assert_eq!(extract_json_array("no array here"), None);
    }
}
