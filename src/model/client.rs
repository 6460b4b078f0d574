//! Model client for AI inference using the generateContent REST API.

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::inference::{InferencePart, InferenceRequest, ModelEndpoint, UpstreamFailure};

/// Default base URL for the hosted Gemini API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model handle.
pub const DEFAULT_MODEL_NAME: &str = "gemini-2.5-flash";

/// Model client errors.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("failed to parse response: {0}")]
    ParseError(String),
}

impl UpstreamFailure for ModelError {
    fn status_code(&self) -> Option<u16> {
        match self {
            ModelError::ApiError { status, .. } => Some(*status),
            ModelError::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            ModelError::ParseError(_) => None,
        }
    }
}

/// Configuration for the generative model endpoint.
///
/// Constructed explicitly and injected into [`GeminiClient`]; nothing here
/// is read from ambient process state.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub base_url: String,
    pub api_key: String,
    pub model_name: String,
    /// Per-request timeout for the HTTP call.
    pub timeout: Duration,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl ModelConfig {
    /// Create a new ModelConfig with custom base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Create a new ModelConfig with custom API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Create a new ModelConfig with custom model name.
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Set the per-request HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// generateContent wire structures.
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    /// Base64-encoded payload.
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Client for a hosted Gemini-compatible generative endpoint.
pub struct GeminiClient {
    config: ModelConfig,
    client: Client,
}

impl GeminiClient {
    /// Create a new GeminiClient with the given configuration.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Borrow the active configuration.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model_name
        )
    }

    /// Encode request parts into the wire format, base64-ing binary payloads.
    fn encode(request: &InferenceRequest) -> GenerateContentRequest {
        let parts = request
            .parts()
            .iter()
            .map(|part| match part {
                InferencePart::Text(text) => Part::Text { text: text.clone() },
                InferencePart::Binary { mime_type, data } => Part::InlineData {
                    inline_data: InlineData {
                        mime_type: mime_type.clone(),
                        data: STANDARD.encode(data),
                    },
                },
            })
            .collect();

        GenerateContentRequest {
            contents: vec![Content { parts }],
        }
    }

    /// Concatenate the text parts of the first candidate.
    ///
    /// An empty string is a valid completion; only a response with no
    /// candidate at all is malformed.
    fn extract_text(response: GenerateContentResponse) -> Result<String, ModelError> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::ParseError("no candidates in response".to_string()))?;

        Ok(candidate
            .content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect())
    }
}

impl ModelEndpoint for GeminiClient {
    type Error = ModelError;

    async fn generate(&self, request: &InferenceRequest) -> Result<String, ModelError> {
        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.config.api_key.as_str())
            .timeout(self.config.timeout)
            .json(&Self::encode(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Keep the body text intact so upstream retry hints survive
            // classification.
            let message = response.text().await.unwrap_or_default();
            return Err(ModelError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        Self::extract_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_model_config_default() {
        let config = ModelConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model_name, "gemini-2.5-flash");
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_model_config_builder() {
        let config = ModelConfig::default()
            .with_base_url("http://localhost:8000/v1beta")
            .with_api_key("secret")
            .with_model_name("gemini-2.0-flash")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.base_url, "http://localhost:8000/v1beta");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model_name, "gemini-2.0-flash");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_url_handles_trailing_slash() {
        let client = GeminiClient::new(
            ModelConfig::default().with_base_url("https://example.test/v1beta/"),
        );
        assert_eq!(
            client.url(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_encode_wire_format() {
        let request = InferenceRequest::text("analyze this").with_binary("image/png", vec![1, 2, 3]);
        let encoded = serde_json::to_value(GeminiClient::encode(&request)).unwrap();

        assert_eq!(
            encoded,
            json!({
                "contents": [{
                    "parts": [
                        { "text": "analyze this" },
                        { "inlineData": { "mimeType": "image/png", "data": "AQID" } }
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_extract_text_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"status\":" }, { "text": "\"ok\"}" }] }
            }]
        }))
        .unwrap();

        assert_eq!(
            GeminiClient::extract_text(response).unwrap(),
            "{\"status\":\"ok\"}"
        );
    }

    #[test]
    fn test_extract_text_empty_parts_is_empty_success() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [] } }]
        }))
        .unwrap();

        assert_eq!(GeminiClient::extract_text(response).unwrap(), "");
    }

    #[test]
    fn test_extract_text_no_candidates_is_error() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [] })).unwrap();

        assert!(matches!(
            GeminiClient::extract_text(response),
            Err(ModelError::ParseError(_))
        ));
    }

    #[test]
    fn test_status_code_exposed_for_api_errors() {
        let error = ModelError::ApiError {
            status: 429,
            message: "quota exceeded, retry in 5s".to_string(),
        };
        assert_eq!(error.status_code(), Some(429));

        let error = ModelError::ParseError("bad".to_string());
        assert_eq!(error.status_code(), None);
    }
}
