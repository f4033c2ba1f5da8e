use async_trait::async_trait;

use crate::domain::ModelInfo;

/// Lists the models a key can use for text generation.
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    /// Models supporting content generation, ranked flash-first.
    ///
    /// Any failure yields an empty list.
    async fn fetch_models(&self, api_key: &str) -> Vec<ModelInfo>;
}
