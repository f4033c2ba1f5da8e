pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    ChatProvider, ModelCatalog, PreferenceStore, Presenter, DiscoverModelsUseCase, Dispatcher,
    DispatcherHandle, ProviderSet, SessionStore, WELCOME_MESSAGE,
};

pub use cli::Commands;

pub use connector::{
    ConsolePresenter, GeminiModelCatalog, GeminiProvider, InMemoryPreferenceStore,
    JsonPreferenceStore, OpenAiProvider,
};

pub use domain::{
    Completion, ConversationEvent, ConversationId, DomainError, Message, ModelInfo, Preferences,
    ProviderConfig, ProviderError, ProviderKind, Role, Session,
};
