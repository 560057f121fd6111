//! Model Client
//!
//! A single-shot text completion capability. The session engine and the
//! command bridge only ever need "send this prompt, give me the text back",
//! so that is all [`ModelClient`] exposes. [`GeminiClient`] is the production
//! implementation backed by the Gemini `generateContent` endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Failures of a single model call.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Model service rejected the API credential (HTTP {0})")]
    Auth(StatusCode),
    #[error("Error parsing API response.\nRaw: {raw}")]
    BadResponse { raw: String },
}

/// A generic client for a text-completion model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Sends one prompt and returns the model's text untouched.
    async fn ask(&self, prompt: &str) -> Result<String, ModelError>;
}

// --- Gemini wire types ---

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

/// Pulls `candidates[0].content.parts[0].text` out of a response body.
fn extract_text(body: &str) -> Result<String, ModelError> {
    let bad_response = || ModelError::BadResponse {
        raw: body.to_string(),
    };
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|_| bad_response())?;
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .map(|part| part.text)
        .ok_or_else(bad_response)
}

/// An implementation of `ModelClient` for the Gemini REST API.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl GeminiClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - The Gemini API credential, sent as the `key` query parameter.
    /// * `base_url` - API root, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    /// * `model` - Model identifier (e.g. "gemini-2.5-flash").
    pub fn new(api_key: SecretString, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    #[instrument(name = "model_ask", skip_all, fields(model = %self.model, prompt_len = prompt.len()))]
    async fn ask(&self, prompt: &str) -> Result<String, ModelError> {
        let body = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.expose_secret())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(%status, "Model service rejected the credential");
            return Err(ModelError::Auth(status));
        }

        let text = response.text().await?;
        debug!(%status, body_len = text.len(), "Received model response");
        extract_text(&text)
    }
}
