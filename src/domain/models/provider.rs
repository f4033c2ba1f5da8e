use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Model used when a Gemini config does not name one.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Which backend family handles a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Gemini,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "openai" => ProviderKind::OpenAi,
            "gemini" => ProviderKind::Gemini,
            unknown => {
                warn!("Unknown provider '{}', defaulting to openai", unknown);
                ProviderKind::OpenAi
            }
        }
    }

    /// Strict variant for user input where a typo should be reported.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Some(ProviderKind::OpenAi),
            "gemini" => Some(ProviderKind::Gemini),
            _ => None,
        }
    }

    pub fn all() -> [ProviderKind; 2] {
        [ProviderKind::OpenAi, ProviderKind::Gemini]
    }
}

/// Unknown stored names load as `OpenAi` instead of failing the whole record.
impl<'de> Deserialize<'de> for ProviderKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ProviderKind::from_str(&raw))
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything a provider call needs beyond the conversation itself.
///
/// Built fresh from the preference store for every call and never retained.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    kind: ProviderKind,
    api_key: String,
    system_prompt: String,
    model: Option<String>,
}

impl ProviderConfig {
    pub fn new(
        kind: ProviderKind,
        api_key: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            api_key: api_key.into(),
            system_prompt: system_prompt.into(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Whitespace-only keys count as missing.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("api_key", &mask_key(&self.api_key))
            .field("system_prompt", &self.system_prompt)
            .field("model", &self.model)
            .finish()
    }
}

/// Renders a key as its last four characters, for display.
pub fn mask_key(key: &str) -> String {
    let key = key.trim();
    if key.is_empty() {
        return "(not set)".to_string();
    }
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
