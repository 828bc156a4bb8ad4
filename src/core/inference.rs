//! Remote inference client for the hosted multimodal model.
//!
//! The client sends one `generateContent` request per call: the image as
//! base64 inline data followed by the tool prompt. [`InferenceBackend`] is the
//! seam between the upload flow and the network so tests can swap in a mock.
//!
//! # Error surfacing
//!
//! [`InferenceBackend::generate`] reports a typed [`InferenceError`].
//! [`infer`] then folds every failure except a missing credential into
//! displayable text starting with `An error occurred: `. Only
//! [`ConfigurationError`] reaches the caller as an error, which the UI shows
//! in its error banner.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{API_KEY_VAR, Config};

/// Prefix of the text returned in place of a failed request.
pub const ERROR_PREFIX: &str = "An error occurred: ";

/// Longest API error body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// One image + prompt pair to send to the model.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    /// Raw image file bytes.
    pub image_bytes: Arc<[u8]>,
    /// Mime type of the image, e.g. `image/png`.
    pub mime_type: &'static str,
    /// Instruction text.
    pub prompt: &'static str,
}

/// The client is not configured well enough to make a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("The {0} environment variable is not set.")]
    MissingApiKey(&'static str),
}

/// Any failure producing a model response.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("the model API rejected the request ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("the model returned no text")]
    EmptyResponse,
}

impl From<reqwest::Error> for InferenceError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

/// A service that turns an image and a prompt into text.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Runs one request.
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::Configuration`] before any network activity
    /// when the credential is missing, and other variants for transport, API
    /// or payload failures.
    async fn generate(&self, request: &InferenceRequest) -> Result<String, InferenceError>;

    /// Display name for logs.
    fn name(&self) -> &'static str;
}

/// Runs `request` on `backend` with the application's error contract.
///
/// Returns the model text on success, or `An error occurred: ...` for any
/// failure other than a missing credential.
///
/// # Errors
///
/// Returns [`ConfigurationError`] when the backend has no credential.
pub async fn infer(
    backend: &dyn InferenceBackend,
    request: &InferenceRequest,
) -> Result<String, ConfigurationError> {
    match backend.generate(request).await {
        Ok(text) => Ok(text),
        Err(InferenceError::Configuration(e)) => {
            tracing::warn!(backend = backend.name(), "{e}");
            Err(e)
        }
        Err(e) => {
            tracing::error!(backend = backend.name(), "Error processing image: {e}");
            Ok(format!("{ERROR_PREFIX}{e}"))
        }
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

fn build_request_body(request: &InferenceRequest, temperature: f32) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part {
                    inline_data: Some(InlineData {
                        mime_type: request.mime_type,
                        data: BASE64.encode(&request.image_bytes),
                    }),
                    text: None,
                },
                Part {
                    inline_data: None,
                    text: Some(request.prompt),
                },
            ],
        }],
        generation_config: GenerationConfig { temperature },
    }
}

/// Extracts a readable message from an error response body.
fn api_error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
        return envelope.error.message;
    }
    let trimmed = body.trim();
    if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
        let cut: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{cut}...")
    } else {
        trimmed.to_string()
    }
}

// =============================================================================
// Gemini client
// =============================================================================

/// Client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    api_base: String,
    model: String,
    temperature: f32,
}

impl GeminiClient {
    /// Creates a client from resolved configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    /// Full URL of the `generateContent` method for the configured model.
    #[must_use]
    pub fn endpoint(&self) -> String {
        let trimmed = self.model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{trimmed}")
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }
}

#[async_trait]
impl InferenceBackend for GeminiClient {
    async fn generate(&self, request: &InferenceRequest) -> Result<String, InferenceError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ConfigurationError::MissingApiKey(API_KEY_VAR).into());
        };

        let body = build_request_body(request, self.temperature);
        tracing::info!(
            model = %self.model,
            mime_type = request.mime_type,
            bytes = request.image_bytes.len(),
            "sending generateContent request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload = response.text().await?;
        if !status.is_success() {
            return Err(InferenceError::Api {
                status: status.as_u16(),
                message: api_error_message(&payload),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&payload)?;
        let text = parsed.text().ok_or(InferenceError::EmptyResponse)?;
        tracing::info!(chars = text.chars().count(), "model response received");
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}
