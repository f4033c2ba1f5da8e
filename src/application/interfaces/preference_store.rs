use crate::domain::{DomainError, Preferences, ProviderConfig, ProviderKind};

/// Synchronous key/value access to the user's saved settings.
///
/// `load` is called on every read so the engine always sees the latest
/// values. Implementations fall back to defaults rather than failing a read.
pub trait PreferenceStore: Send + Sync {
    fn load(&self) -> Preferences;

    fn save(&self, preferences: &Preferences) -> Result<(), DomainError>;

    fn active_provider(&self) -> ProviderKind {
        self.load().provider
    }

    fn set_active_provider(&self, kind: ProviderKind) -> Result<(), DomainError> {
        self.update(&|prefs: &mut Preferences| prefs.provider = kind)
    }

    fn api_key(&self, kind: ProviderKind) -> String {
        self.load().api_key(kind).to_string()
    }

    fn set_api_key(&self, kind: ProviderKind, key: &str) -> Result<(), DomainError> {
        self.update(&|prefs: &mut Preferences| prefs.set_api_key(kind, key))
    }

    fn system_prompt(&self) -> String {
        self.load().system_prompt
    }

    fn set_system_prompt(&self, prompt: &str) -> Result<(), DomainError> {
        self.update(&|prefs: &mut Preferences| prefs.system_prompt = prompt.to_string())
    }

    fn gemini_model(&self) -> String {
        self.load().gemini_model
    }

    fn set_gemini_model(&self, model: &str) -> Result<(), DomainError> {
        self.update(&|prefs: &mut Preferences| prefs.gemini_model = model.trim().to_string())
    }

    /// The config for the active provider, read in one pass.
    fn provider_config(&self) -> ProviderConfig {
        let prefs = self.load();
        let kind = prefs.provider;
        let config = ProviderConfig::new(kind, prefs.api_key(kind), prefs.system_prompt.clone());
        match kind {
            ProviderKind::Gemini => config.with_model(prefs.gemini_model),
            ProviderKind::OpenAi => config,
        }
    }

    /// Load, modify and save in one step.
    fn update(&self, apply: &dyn Fn(&mut Preferences)) -> Result<(), DomainError> {
        let mut prefs = self.load();
        apply(&mut prefs);
        self.save(&prefs)
    }
}
