use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::ChatProvider;
use crate::domain::{Message, ProviderConfig, ProviderError, Role, DEFAULT_GEMINI_MODEL};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const MODELS_PATH: &str = "/v1beta/models";
const PROVIDER_NAME: &str = "Gemini";
/// Returned when a successful response has no first-candidate text.
pub const NO_RESPONSE_TEXT: &str = "No response text found";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

impl Content {
    fn text(role: &'static str, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// Adapter for the Gemini `generateContent` endpoint.
///
/// History maps to `user`/`model` contents followed by the current turn.
/// Gemini gets no separate system channel here: when the history is empty
/// the system prompt is folded into the current turn as
/// `"System: <prompt>\n\nUser: <message>"`, otherwise it is not repeated.
pub struct GeminiProvider {
    client: reqwest::Client,
    /// Base URL + MODELS_PATH; the model and method are appended per call.
    models_url: String,
}

impl GeminiProvider {
    pub const BASE_URL_ENV: &'static str = "CHATRELAY_GEMINI_BASE_URL";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let models_url = format!("{}{}", base.trim_end_matches('/'), MODELS_PATH);
        Self { client, models_url }
    }

    /// Reads `CHATRELAY_GEMINI_BASE_URL`, defaulting to the public API.
    pub fn from_env(client: reqwest::Client) -> Self {
        Self::with_client(client, Self::configured_base_url())
    }

    pub fn configured_base_url() -> String {
        std::env::var(Self::BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/{}:generateContent", self.models_url, model)
    }

    /// Text submitted for the current turn.
    fn current_turn_text(message: &str, history: &[Message], system_prompt: &str) -> String {
        if history.is_empty() {
            format!("System: {}\n\nUser: {}", system_prompt, message)
        } else {
            message.to_string()
        }
    }

    fn build_request(
        message: &str,
        history: &[Message],
        system_prompt: &str,
    ) -> GenerateContentRequest {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|m| {
                let role = if m.role() == Role::Assistant {
                    "model"
                } else {
                    "user"
                };
                Content::text(role, m.content())
            })
            .collect();

        contents.push(Content::text(
            "user",
            Self::current_turn_text(message, history, system_prompt),
        ));

        GenerateContentRequest { contents }
    }

    /// `candidates[0].content.parts[0].text`, or [`NO_RESPONSE_TEXT`].
    fn extract_text(body: &Value) -> String {
        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .unwrap_or(NO_RESPONSE_TEXT)
            .to_string()
    }

    async fn try_send(
        &self,
        message: &str,
        history: &[Message],
        config: &ProviderConfig,
    ) -> Result<String, ProviderError> {
        let model = config.model().unwrap_or(DEFAULT_GEMINI_MODEL);
        let request = Self::build_request(message, history, config.system_prompt());

        let response = self
            .client
            .post(self.endpoint(model))
            .query(&[("key", config.api_key())])
            .json(&request)
            .send()
            .await
            // Strip the URL: it carries the key.
            .map_err(|e| ProviderError::transport(PROVIDER_NAME, e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(|e| {
                ProviderError::malformed(PROVIDER_NAME, e.without_url().to_string())
            })?;
            return Err(ProviderError::rejected(PROVIDER_NAME, status.as_u16(), body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::malformed(PROVIDER_NAME, e.without_url().to_string()))?;
        let json: Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::malformed(PROVIDER_NAME, e.to_string()))?;

        Ok(Self::extract_text(&json))
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    async fn send(&self, message: &str, history: &[Message], config: &ProviderConfig) -> String {
        match self.try_send(message, history, config).await {
            Ok(text) => {
                debug!("GeminiProvider: received {} chars", text.len());
                text
            }
            Err(e) => {
                warn!("GeminiProvider: {}", e);
                e.to_string()
            }
        }
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }
}
