use std::sync::Arc;

use tracing::info;

use crate::application::{ModelCatalog, PreferenceStore};
use crate::domain::{DomainError, ModelInfo, ProviderKind};

/// Refreshes the list of Gemini models and manages the saved selection.
pub struct DiscoverModelsUseCase {
    catalog: Arc<dyn ModelCatalog>,
    preferences: Arc<dyn PreferenceStore>,
}

impl DiscoverModelsUseCase {
    pub fn new(catalog: Arc<dyn ModelCatalog>, preferences: Arc<dyn PreferenceStore>) -> Self {
        Self {
            catalog,
            preferences,
        }
    }

    /// Fetches models with the saved Gemini key.
    ///
    /// A blank key is rejected before any request is made. An empty result
    /// is a failure from the user's point of view and is reported as such.
    pub async fn execute(&self) -> Result<Vec<ModelInfo>, DomainError> {
        let key = self.preferences.api_key(ProviderKind::Gemini);
        if key.trim().is_empty() {
            return Err(DomainError::invalid_input("Enter Gemini API Key first"));
        }

        let models = self.catalog.fetch_models(key.trim()).await;
        if models.is_empty() {
            return Err(DomainError::not_found("Failed to fetch models"));
        }

        info!("Discovered {} Gemini models", models.len());
        Ok(models)
    }

    pub fn selected_model(&self) -> String {
        self.preferences.gemini_model()
    }

    /// Saves `model_id` as the Gemini model if the catalog offers it.
    pub async fn select(&self, model_id: &str) -> Result<ModelInfo, DomainError> {
        let models = self.execute().await?;
        let model = models
            .into_iter()
            .find(|m| m.id() == model_id.trim())
            .ok_or_else(|| DomainError::not_found(format!("Model not available: {}", model_id)))?;

        self.preferences.set_gemini_model(model.id())?;
        info!("Selected Gemini model {}", model.id());
        Ok(model)
    }
}
