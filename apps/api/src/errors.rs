#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::github::GitHubError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::GitHub(e) => match e {
                GitHubError::RateLimited { .. } => (
                    StatusCode::TOO_MANY_REQUESTS,
                    "GITHUB_RATE_LIMITED",
                    "GitHub API rate limit exceeded".to_string(),
                ),
                GitHubError::NotFound => (
                    StatusCode::NOT_FOUND,
                    "GITHUB_NOT_FOUND",
                    "Repository not found".to_string(),
                ),
                GitHubError::AuthFailed => (
                    StatusCode::UNAUTHORIZED,
                    "GITHUB_AUTH_FAILED",
                    "GitHub authentication failed".to_string(),
                ),
                GitHubError::Api { .. } | GitHubError::Http(_) => {
                    tracing::error!("GitHub error: {e}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "GITHUB_ERROR",
                        "A GitHub API error occurred".to_string(),
                    )
                }
            },
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
