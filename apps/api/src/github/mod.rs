#![allow(dead_code)]
/// GitHub client — the single point of entry for all GitHub API calls.
///
/// All repository content reads go through this module so rate-limit and
/// auth handling live in one place.
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::extract::ManifestSource;
use crate::analysis::manifests::DependencyFiles;
use crate::errors::AppError;

const GITHUB_API_URL: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("gitstory-api/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub rate limit exceeded (resets at {reset:?})")]
    RateLimited { reset: Option<u64> },

    #[error("Repository or file not found")]
    NotFound,

    #[error("GitHub authentication failed")]
    AuthFailed,

    #[error("GitHub API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
pub struct RateLimit {
    pub limit: u32,
    pub remaining: u32,
    pub reset: u64,
}

#[derive(Debug, Deserialize)]
struct RateLimitEnvelope {
    rate: RateLimit,
}

#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    token: String,
}

impl GitHubClient {
    /// Built per request with the caller's token, so construction failure
    /// surfaces as an error instead of panicking a handler.
    pub fn new(token: String) -> Result<Self, GitHubError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, token })
    }

    /// Fetches a single file's raw content from the default branch.
    /// A missing file is `Ok(None)`; everything else surfaces as an error.
    async fn fetch_raw_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Option<String>, GitHubError> {
        let url = format!("{GITHUB_API_URL}/repos/{owner}/{repo}/contents/{path}");
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github.raw+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(Some(response.text().await?)),
            StatusCode::NOT_FOUND => Ok(None),
            StatusCode::UNAUTHORIZED => Err(GitHubError::AuthFailed),
            StatusCode::FORBIDDEN => {
                let reset = response
                    .headers()
                    .get("x-ratelimit-reset")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok());
                Err(GitHubError::RateLimited { reset })
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(GitHubError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    /// Current core rate-limit status for the configured token.
    pub async fn rate_limit(&self) -> Result<RateLimit, GitHubError> {
        let response = self
            .client
            .get(format!("{GITHUB_API_URL}/rate_limit"))
            .bearer_auth(&self.token)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GitHubError::Api { status, message });
        }

        let envelope: RateLimitEnvelope = response.json().await?;
        Ok(envelope.rate)
    }
}

#[async_trait]
impl ManifestSource for GitHubClient {
    async fn fetch_dependency_files(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<DependencyFiles, AppError> {
        let mut files = DependencyFiles::default();

        if let Some(text) = self.fetch_raw_file(owner, repo, "package.json").await? {
            match serde_json::from_str(&text) {
                Ok(value) => files.package_json = Some(value),
                Err(e) => warn!("{owner}/{repo}: package.json is not valid JSON: {e}"),
            }
        }
        files.requirements_txt = self.fetch_raw_file(owner, repo, "requirements.txt").await?;
        files.pom_xml = self.fetch_raw_file(owner, repo, "pom.xml").await?;
        files.gemfile = self.fetch_raw_file(owner, repo, "Gemfile").await?;
        files.go_mod = self.fetch_raw_file(owner, repo, "go.mod").await?;
        if let Some(text) = self.fetch_raw_file(owner, repo, "composer.json").await? {
            match serde_json::from_str(&text) {
                Ok(value) => files.composer_json = Some(value),
                Err(e) => warn!("{owner}/{repo}: composer.json is not valid JSON: {e}"),
            }
        }
        files.cargo_toml = self.fetch_raw_file(owner, repo, "Cargo.toml").await?;

        debug!(
            "{owner}/{repo}: manifest fetch complete (empty: {})",
            files.is_empty()
        );
        Ok(files)
    }
}
