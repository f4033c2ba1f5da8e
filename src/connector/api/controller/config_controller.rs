use anyhow::{anyhow, Result};

use crate::application::PreferenceStore;
use crate::domain::{mask_key, Preferences, ProviderKind};

use super::super::Container;

pub struct ConfigController<'a> {
    container: &'a Container,
}

impl<'a> ConfigController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn show(&self) -> Result<String> {
        let prefs = self.container.preferences().load();
        Ok(self.format_settings(&prefs))
    }

    pub async fn provider(&self, name: String) -> Result<String> {
        let kind = parse_provider(&name)?;
        self.container.preferences().set_active_provider(kind)?;
        Ok(format!("Active provider set to {}.", kind))
    }

    pub async fn key(&self, provider: String, key: String) -> Result<String> {
        let kind = parse_provider(&provider)?;
        self.container.preferences().set_api_key(kind, &key)?;

        let saved = self.container.preferences().api_key(kind);
        if saved.is_empty() {
            Ok(format!("Cleared the {} API key.", kind))
        } else {
            Ok(format!("Saved {} API key {}.", kind, mask_key(&saved)))
        }
    }

    pub async fn prompt(&self, prompt: String) -> Result<String> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(anyhow!("System prompt cannot be empty"));
        }
        self.container.preferences().set_system_prompt(prompt)?;
        Ok("System prompt updated.".to_string())
    }

    pub async fn model(&self, model: String) -> Result<String> {
        let model = model.trim();
        if model.is_empty() {
            return Err(anyhow!("Model name cannot be empty"));
        }
        self.container.preferences().set_gemini_model(model)?;
        Ok(format!("Gemini model set to {}.", model))
    }

    fn format_settings(&self, prefs: &Preferences) -> String {
        let stored_in = match self.container.preferences_path() {
            Some(path) => path.display().to_string(),
            None => "(memory only)".to_string(),
        };

        format!(
            "ChatRelay Settings\n==================\nProvider:      {}\nOpenAI Key:    {}\nGemini Key:    {}\nGemini Model:  {}\nSystem Prompt: {}\nStored In:     {}",
            prefs.provider,
            mask_key(&prefs.openai_key),
            mask_key(&prefs.gemini_key),
            prefs.gemini_model,
            prefs.system_prompt,
            stored_in
        )
    }
}

fn parse_provider(name: &str) -> Result<ProviderKind> {
    ProviderKind::parse(name)
        .ok_or_else(|| anyhow!("Unknown provider '{}': expected openai or gemini", name.trim()))
}
