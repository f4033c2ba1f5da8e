use serde::{Deserialize, Serialize};

use super::{ProviderKind, DEFAULT_GEMINI_MODEL};

pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful driving assistant. Keep answers short, safe, and concise.";

/// The user's saved settings.
///
/// Unknown or missing fields fall back to the defaults below, so a partially
/// written file still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub provider: ProviderKind,
    pub openai_key: String,
    pub gemini_key: String,
    pub gemini_model: String,
    pub system_prompt: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            openai_key: String::new(),
            gemini_key: String::new(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl Preferences {
    pub fn api_key(&self, kind: ProviderKind) -> &str {
        match kind {
            ProviderKind::OpenAi => &self.openai_key,
            ProviderKind::Gemini => &self.gemini_key,
        }
    }

    /// Stores the key with surrounding whitespace removed.
    pub fn set_api_key(&mut self, kind: ProviderKind, key: &str) {
        let key = key.trim().to_string();
        match kind {
            ProviderKind::OpenAi => self.openai_key = key,
            ProviderKind::Gemini => self.gemini_key = key,
        }
    }
}
