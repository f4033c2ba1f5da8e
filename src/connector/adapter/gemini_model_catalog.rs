use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::ModelCatalog;
use crate::connector::adapter::GeminiProvider;
use crate::domain::{rank_models, ModelInfo};

const MODELS_PATH: &str = "/v1beta/models";
const GENERATE_CONTENT: &str = "generateContent";

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ApiModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiModel {
    name: String,
    display_name: Option<String>,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

/// Lists Gemini models usable with `generateContent`.
///
/// Every failure (unreachable host, non-2xx, unexpected JSON) degrades to an
/// empty list; callers decide how to report that.
pub struct GeminiModelCatalog {
    client: reqwest::Client,
    url: String,
}

impl GeminiModelCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{}", base.trim_end_matches('/'), MODELS_PATH);
        Self { client, url }
    }

    /// Shares the chat adapter's `CHATRELAY_GEMINI_BASE_URL` override.
    pub fn from_env(client: reqwest::Client) -> Self {
        Self::with_client(client, GeminiProvider::configured_base_url())
    }

    /// Drops models without content generation, strips the `models/` prefix
    /// and ranks the rest.
    fn to_models(response: ListModelsResponse) -> Vec<ModelInfo> {
        let models = response
            .models
            .into_iter()
            .filter(|m| {
                m.supported_generation_methods
                    .iter()
                    .any(|method| method == GENERATE_CONTENT)
            })
            .map(|m| {
                let id = m.name.replace("models/", "");
                let display_name = m.display_name.unwrap_or_else(|| id.clone());
                ModelInfo::new(id, display_name)
            })
            .collect();

        rank_models(models)
    }

    async fn try_fetch(&self, api_key: &str) -> Result<Vec<ModelInfo>, String> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("key", api_key)])
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e.without_url()))?;

        if !response.status().is_success() {
            return Err(format!("API returned {}", response.status()));
        }

        let parsed: ListModelsResponse = response
            .json()
            .await
            .map_err(|e| format!("failed to parse response: {}", e.without_url()))?;

        Ok(Self::to_models(parsed))
    }
}

#[async_trait]
impl ModelCatalog for GeminiModelCatalog {
    async fn fetch_models(&self, api_key: &str) -> Vec<ModelInfo> {
        match self.try_fetch(api_key).await {
            Ok(models) => {
                debug!("GeminiModelCatalog: {} usable models", models.len());
                models
            }
            Err(e) => {
                warn!("GeminiModelCatalog: {}. Returning no models.", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn listing() -> serde_json::Value {
        json!({
            "models": [
                {
                    "name": "models/gemini-pro",
                    "displayName": "Gemini Pro",
                    "supportedGenerationMethods": ["generateContent", "countTokens"]
                },
                {
                    "name": "models/gemini-1.5-flash",
                    "displayName": "Gemini 1.5 Flash",
                    "supportedGenerationMethods": ["generateContent"]
                },
                {
                    "name": "models/gemini-flash-8b",
                    "supportedGenerationMethods": ["generateContent"]
                },
                {
                    "name": "models/text-embedding",
                    "displayName": "Text Embedding",
                    "supportedGenerationMethods": ["embedContent"]
                },
                {
                    "name": "models/aqa"
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_fetch_filters_and_ranks() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1beta/models"))
            .and(query_param("key", "g-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = GeminiModelCatalog::new(server.uri());
        let models = catalog.fetch_models("g-key").await;

        let ids: Vec<&str> = models.iter().map(|m| m.id()).collect();
        assert_eq!(ids, vec!["gemini-1.5-flash", "gemini-flash-8b", "gemini-pro"]);
        assert_eq!(models[0].display_name(), "Gemini 1.5 Flash");
        assert_eq!(models[1].display_name(), "gemini-flash-8b");
    }

    #[tokio::test]
    async fn test_non_success_returns_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let catalog = GeminiModelCatalog::new(server.uri());
        assert!(catalog.fetch_models("bad").await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_returns_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"models": [{"displayName": "x"}]})),
            )
            .mount(&server)
            .await;

        let catalog = GeminiModelCatalog::new(server.uri());
        assert!(catalog.fetch_models("g-key").await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_returns_empty() {
        let catalog = GeminiModelCatalog::new("http://127.0.0.1:1");
        assert!(catalog.fetch_models("g-key").await.is_empty());
    }

    #[test]
    fn test_missing_models_field_is_empty() {
        let response: ListModelsResponse = serde_json::from_str("{}").unwrap();
        assert!(GeminiModelCatalog::to_models(response).is_empty());
    }
}
