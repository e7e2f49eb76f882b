//! HTTP client for the Noctisium API
//!
//! Every call asks for `text/plain` so the API answers with the rendered
//! summaries instead of JSON.

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::Serialize;

const DEFAULT_API_URL: &str = "http://localhost:8080";

/// HTTP client for communicating with the Noctisium API
#[derive(Clone)]
pub struct NoctisiumClient {
    client: reqwest::Client,
    base_url: String,
}

impl NoctisiumClient {
    /// Create a new client from environment variables
    ///
    /// Optional env vars:
    /// - NOCTISIUM_API_URL: Base URL of the API (default http://localhost:8080)
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("NOCTISIUM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self::new(&base_url)
    }

    pub fn new(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/plain"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current rank, RR and progress towards the next tier
    pub async fn rank_status(&self) -> Result<String> {
        self.get_text("/rank").await
    }

    pub async fn rank_tiers(&self) -> Result<String> {
        self.get_text("/rank/tiers").await
    }

    /// Assess a week, or the last completed week when none is given
    pub async fn assess_week(&self, week_key: Option<&str>) -> Result<String> {
        self.post_text(
            "/rank/assess",
            &AssessRequest {
                week_key: week_key.map(|s| s.to_string()),
            },
        )
        .await
    }

    pub async fn needs_assessment(&self) -> Result<String> {
        self.get_text("/rank/needs-assessment").await
    }

    pub async fn rank_history(&self) -> Result<String> {
        self.get_text("/rank/history").await
    }

    /// Rebuild the whole history from the weekly records
    pub async fn regenerate_history(&self) -> Result<String> {
        self.post_text("/rank/history/regenerate", &serde_json::json!({}))
            .await
    }

    /// Completion preview for a week, without touching RR
    pub async fn week_progress(&self, week_key: &str) -> Result<String> {
        self.get_text(&format!("/weeks/{}/completion", week_key.trim()))
            .await
    }

    // --- Internal helpers ---

    async fn get_text(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to GET {}", path))?;

        handle_text_response(response).await
    }

    async fn post_text<T: Serialize>(&self, path: &str, body: &T) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to POST {}", path))?;

        handle_text_response(response).await
    }
}

async fn handle_text_response(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .context("Failed to read response body")?;

    if !status.is_success() {
        anyhow::bail!("API error ({}): {}", status, body);
    }

    Ok(body)
}

// --- Request Types ---

#[derive(Debug, Serialize)]
struct AssessRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    week_key: Option<String>,
}
