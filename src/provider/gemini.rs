//! Gemini API client
//!
//! Production completion provider for the financial assistant.
//! Uses a long-lived reqwest::Client for connection pooling.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};

use crate::error::AppError;
use crate::provider::{Completion, CompletionProvider};

const GEMINI_MODEL: &str = "gemini-1.5-pro";

/// Reusable Gemini client (connection-pooled)
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url: format!(
                "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
                GEMINI_MODEL
            ),
        }
    }

    /// Generate a completion for an already composed prompt
    pub async fn generate(&self, prompt: &str) -> crate::Result<Completion> {
        if self.api_key.is_empty() {
            return Err(AppError::MissingApiKey);
        }

        let url = format!("{}?key={}", self.base_url, self.api_key);

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                max_output_tokens: 2048,
            },
        };

        info!(model = GEMINI_MODEL, "Calling Gemini API");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini API request failed: {}", e);
                AppError::Provider(format!("Gemini API error: {}", e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error response: {}", error_text);
            return Err(AppError::Provider(format!(
                "Gemini API error: {}",
                error_text
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            AppError::Provider(format!("Gemini parse error: {}", e))
        })?;

        let Some(candidate) = body.candidates.first() else {
            return Err(AppError::Provider(
                "No response from Gemini API".to_string(),
            ));
        };

        let Some(text) = extract_text(&candidate.content) else {
            return Err(AppError::UnexpectedResponseShape(
                candidate.content.to_string(),
            ));
        };

        info!(chars = text.len(), "Gemini response received");

        Ok(Completion { text })
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    async fn complete(&self, prompt: &str) -> crate::Result<Completion> {
        self.generate(prompt).await
    }
}

/// Normalize the textual content of a completion candidate.
///
/// Accepted shapes: a bare JSON string, an object with a `parts` array of
/// `{"text": ...}` fragments (the documented generateContent shape), or an
/// object with a plain `text` field. Anything else is unrecognized.
pub(crate) fn extract_text(content: &Value) -> Option<String> {
    match content {
        Value::String(text) => Some(text.clone()),
        Value::Object(fields) => {
            if let Some(parts) = fields.get("parts").and_then(Value::as_array) {
                let mut out = String::new();
                for part in parts {
                    if let Some(text) = part.get("text").and_then(Value::as_str) {
                        out.push_str(text);
                    }
                }
                if out.is_empty() {
                    None
                } else {
                    Some(out)
                }
            } else {
                fields
                    .get("text")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            }
        }
        _ => None,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: i32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Value,
}
