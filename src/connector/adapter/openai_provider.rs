use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::ChatProvider;
use crate::domain::{Message, ProviderConfig, ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";
/// Model requested on every call; OpenAI configs carry no model choice.
pub const OPENAI_MODEL: &str = "gpt-3.5-turbo";
const PROVIDER_NAME: &str = "OpenAI";
/// Returned when a successful response has no first-choice content.
pub const NO_CONTENT: &str = "No content";

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Adapter for OpenAI-style chat completion endpoints.
///
/// Sends one flat message list: the system prompt, the history role for role,
/// then the current user turn. The reply is `choices[0].message.content`.
///
/// The endpoint can be redirected to any compatible server:
///
/// ```text
/// CHATRELAY_OPENAI_BASE_URL=http://localhost:1234
/// ```
pub struct OpenAiProvider {
    client: reqwest::Client,
    /// Full endpoint URL (base + COMPLETIONS_PATH).
    url: String,
}

impl OpenAiProvider {
    pub const BASE_URL_ENV: &'static str = "CHATRELAY_OPENAI_BASE_URL";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Shares an existing connection pool.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{}", base.trim_end_matches('/'), COMPLETIONS_PATH);
        Self { client, url }
    }

    /// Reads `CHATRELAY_OPENAI_BASE_URL`, defaulting to the public API.
    pub fn from_env(client: reqwest::Client) -> Self {
        Self::with_client(client, Self::configured_base_url())
    }

    pub fn configured_base_url() -> String {
        std::env::var(Self::BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn build_request<'a>(
        message: &'a str,
        history: &'a [Message],
        config: &'a ProviderConfig,
    ) -> ApiRequest<'a> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ApiMessage {
            role: "system",
            content: config.system_prompt(),
        });
        messages.extend(history.iter().map(|m| ApiMessage {
            role: m.role().as_str(),
            content: m.content(),
        }));
        messages.push(ApiMessage {
            role: "user",
            content: message,
        });

        ApiRequest {
            model: OPENAI_MODEL,
            messages,
        }
    }

    /// `choices[0].message.content`, or [`NO_CONTENT`] if any step is missing.
    fn extract_content(body: &Value) -> String {
        body.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .unwrap_or(NO_CONTENT)
            .to_string()
    }

    async fn try_send(
        &self,
        message: &str,
        history: &[Message],
        config: &ProviderConfig,
    ) -> Result<String, ProviderError> {
        let request = Self::build_request(message, history, config);

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", config.api_key()))
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER_NAME, e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::rejected(
                PROVIDER_NAME,
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::malformed(PROVIDER_NAME, e.without_url().to_string()))?;
        let json: Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::malformed(PROVIDER_NAME, e.to_string()))?;

        Ok(Self::extract_content(&json))
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    async fn send(&self, message: &str, history: &[Message], config: &ProviderConfig) -> String {
        match self.try_send(message, history, config).await {
            Ok(text) => {
                debug!("OpenAiProvider: received {} chars", text.len());
                text
            }
            Err(e) => {
                warn!("OpenAiProvider: {}", e);
                e.to_string()
            }
        }
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }
}
