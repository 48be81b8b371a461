//! Client for the text-generation service that turns free text into task
//! drafts.
//!
//! The service speaks one endpoint, `POST /create-todo-ai` with
//! `{ "input": "..." }`, and always answers with the envelope
//! `{ "success", "message", "todos" }`, including on errors.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::error::ApiError;
use crate::models::TaskDraft;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub todos: Vec<TaskDraft>,
}

#[derive(Clone)]
pub struct AiClient {
    client: Client,
    base_url: String,
}

/// Reject blank input before any request is made.
pub fn validate_input(input: Option<&str>) -> Result<&str, ApiError> {
    match input.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ApiError::BadRequest(
            "Input must be a non-empty string".to_string(),
        )),
    }
}

impl AiClient {
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(base_url, "text generation client initialized");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Ask the service for drafts. A `success: false` envelope is returned
    /// as-is; transport failures and non-2xx answers become errors.
    #[instrument(skip(self, input), fields(input_len = input.len()))]
    pub async fn generate(&self, input: &str) -> Result<GenerateEnvelope, ApiError> {
        #[derive(Serialize)]
        struct Request<'a> {
            input: &'a str,
        }

        let url = format!("{}/create-todo-ai", self.base_url);
        debug!(url = %url, "text generation request");

        let response = self
            .client
            .post(&url)
            .json(&Request { input })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "text generation request failed");
                ApiError::Upstream(format!("Text generation service unavailable: {e}"))
            })?;

        let status = response.status();

        if status.is_success() {
            return response.json::<GenerateEnvelope>().await.map_err(|e| {
                error!(error = %e, "failed to parse text generation response");
                ApiError::Upstream(format!("Invalid text generation response: {e}"))
            });
        }

        let message = response
            .json::<GenerateEnvelope>()
            .await
            .ok()
            .map(|env| env.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Text generation service error: {status}"));

        match status {
            StatusCode::BAD_REQUEST => Err(ApiError::BadRequest(message)),
            _ => {
                error!(status = %status, message = %message, "text generation service error");
                Err(ApiError::Upstream(message))
            }
        }
    }
}
