use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::{
    DiscoverModelsUseCase, Dispatcher, ModelCatalog, PreferenceStore, Presenter, ProviderSet,
};
use crate::connector::adapter::{
    GeminiModelCatalog, GeminiProvider, InMemoryPreferenceStore, JsonPreferenceStore,
    OpenAiProvider,
};

const USER_AGENT: &str = concat!("chatrelay/", env!("CARGO_PKG_VERSION"));

pub struct ContainerConfig {
    pub data_dir: String,
    /// Keep preferences in memory only; nothing is read from or written to
    /// `data_dir`.
    pub memory_preferences: bool,
    /// Upper bound on live conversations. `None` keeps every conversation
    /// for the life of the process.
    pub max_sessions: Option<usize>,
}

pub struct Container {
    providers: ProviderSet,
    model_catalog: Arc<dyn ModelCatalog>,
    preferences: Arc<dyn PreferenceStore>,
    preferences_path: Option<PathBuf>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        // One client, so the adapters share a connection pool.
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build HTTP client")?;

        let openai = Arc::new(OpenAiProvider::from_env(client.clone()));
        let gemini = Arc::new(GeminiProvider::from_env(client.clone()));
        debug!("OpenAI endpoint: {}", openai.url());

        let model_catalog: Arc<dyn ModelCatalog> = Arc::new(GeminiModelCatalog::from_env(client));

        let (preferences, preferences_path): (Arc<dyn PreferenceStore>, Option<PathBuf>) =
            if config.memory_preferences {
                debug!("Using in-memory preferences");
                (Arc::new(InMemoryPreferenceStore::new()), None)
            } else {
                let store = JsonPreferenceStore::in_dir(PathBuf::from(&config.data_dir));
                debug!("Using preferences at {}", store.path().display());
                let path = store.path().to_path_buf();
                (Arc::new(store), Some(path))
            };

        Ok(Self {
            providers: ProviderSet::new(openai, gemini),
            model_catalog,
            preferences,
            preferences_path,
            config,
        })
    }

    /// A fresh dispatcher rendering through `presenter`.
    pub fn dispatcher(&self, presenter: Arc<dyn Presenter>) -> Dispatcher {
        Dispatcher::new(self.providers.clone(), self.preferences.clone(), presenter)
            .with_session_capacity(self.config.max_sessions)
    }

    pub fn discover_models_use_case(&self) -> DiscoverModelsUseCase {
        DiscoverModelsUseCase::new(self.model_catalog.clone(), self.preferences.clone())
    }

    pub fn preferences(&self) -> Arc<dyn PreferenceStore> {
        self.preferences.clone()
    }

    /// Where preferences are persisted, or `None` when kept in memory.
    pub fn preferences_path(&self) -> Option<&Path> {
        self.preferences_path.as_deref()
    }
}
