//! Tag generator backed by the Gemini generative language API.

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::prompt::build_prompt;
use super::{TagGenerator, TagRequest};
use crate::config::TaggingConfig;
use crate::error::{CloudPilotError, Result};

/// User agent string for model requests.
const USER_AGENT: &str = "CloudPilot/0.1 (Tag Generator)";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagPayload {
    tags: Vec<String>,
}

/// Tag generator calling a Gemini model over HTTP.
pub struct GeminiTagGenerator {
    client: Client,
    endpoint: String,
    api_key: String,
    content_preview_chars: usize,
}

impl GeminiTagGenerator {
    /// Create a new generator from the tagging configuration.
    pub fn new(config: &TaggingConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                CloudPilotError::Tagging(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            api_key: config.api_key.clone(),
            content_preview_chars: config.content_preview_chars,
        })
    }

    /// URL the generator posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request_tags(&self, request: &TagRequest) -> Result<Vec<String>> {
        if self.api_key.is_empty() {
            return Err(CloudPilotError::Tagging("API key is not configured".to_string()));
        }

        let prompt = build_prompt(request, self.content_preview_chars);
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        debug!("Requesting tags for {} from {}", request.file_name, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| CloudPilotError::Tagging(format!("failed to call model: {}", e)))?;

        if !response.status().is_success() {
            return Err(CloudPilotError::Tagging(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CloudPilotError::Tagging(format!("failed to read response: {}", e)))?;

        parse_generate_response(&bytes)
    }
}

impl TagGenerator for GeminiTagGenerator {
    fn generate_tags<'a>(&'a self, request: &'a TagRequest) -> BoxFuture<'a, Result<Vec<String>>> {
        Box::pin(self.request_tags(request))
    }
}

/// Remove a surrounding Markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Extract the tag list from a `generateContent` response body.
///
/// The model is asked to answer with `{"tags": [...]}`; the text of the
/// first candidate is parsed as that object.
pub fn parse_generate_response(body: &[u8]) -> Result<Vec<String>> {
    let response: GenerateResponse = serde_json::from_slice(body)
        .map_err(|e| CloudPilotError::Tagging(format!("invalid model response: {}", e)))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect::<String>())
        .ok_or_else(|| CloudPilotError::Tagging("model returned no candidates".to_string()))?;

    let payload: TagPayload = serde_json::from_str(strip_code_fence(&text))
        .map_err(|e| CloudPilotError::Tagging(format!("model output is not a tag list: {}", e)))?;

    Ok(payload.tags)
}
