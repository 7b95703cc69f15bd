//! Text-generation client
//!
//! Talks to a Gemini-style `generateContent` endpoint.

use crate::config::InsightConfig;
use crate::insight::prompt::{build_prompt, AnalysisData};
use crate::model::{DayLog, Macros, UserSettings};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NOT_CONFIGURED_MESSAGE: &str =
    "Insight API key not configured. Set [insight].api_key or NUTRITRACK_INSIGHT_API_KEY.";
pub const FAILURE_MESSAGE: &str =
    "Could not reach the insight service. Check your API key and connection.";
pub const EMPTY_MESSAGE: &str = "No analysis could be generated right now.";

/// Client for nutrition summaries
pub struct InsightClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl InsightClient {
    pub fn new(config: &InsightConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Produce a narrative for the filtered logs
    ///
    /// Always returns displayable text: a fixed notice stands in when the
    /// client is unconfigured, the call fails, or the reply is empty.
    pub async fn generate_insight(
        &self,
        logs: &[&DayLog],
        settings: &UserSettings,
        totals: &Macros,
        weight_change_kg: f64,
    ) -> String {
        let Some(api_key) = &self.api_key else {
            return NOT_CONFIGURED_MESSAGE.to_string();
        };

        let prompt = build_prompt(&AnalysisData::new(logs, settings, totals, weight_change_kg));

        match self.generate(api_key, &prompt).await {
            Ok(Some(text)) => text,
            Ok(None) => EMPTY_MESSAGE.to_string(),
            Err(e) => {
                tracing::error!(error = %e, model = %self.model, "Insight request failed");
                FAILURE_MESSAGE.to_string()
            }
        }
    }

    async fn generate(&self, api_key: &str, prompt: &str) -> Result<Option<String>, InsightError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InsightError::Timeout
                } else {
                    InsightError::Request(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(InsightError::ApiError { status, message });
        }

        let reply: GenerateResponse = response.json().await?;
        Ok(reply.text())
    }
}

/// Errors from the text-generation call; never surfaced to callers
#[derive(Error, Debug)]
enum InsightError {
    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Text of the first candidate, `None` if blank
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
