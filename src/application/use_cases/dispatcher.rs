use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::application::{ChatProvider, PreferenceStore, Presenter};
use crate::application::use_cases::session_store::SessionStore;
use crate::domain::{
    Completion, ConversationEvent, ConversationId, DomainError, Message, ProviderKind,
};

/// Seed message of every new conversation.
pub const WELCOME_MESSAGE: &str = "Hello! I am ready. What would you like to talk about?";

/// Capacity of the inbound event queue.
const EVENT_QUEUE_DEPTH: usize = 64;

/// One adapter per backend family.
#[derive(Clone)]
pub struct ProviderSet {
    openai: Arc<dyn ChatProvider>,
    gemini: Arc<dyn ChatProvider>,
}

impl ProviderSet {
    pub fn new(openai: Arc<dyn ChatProvider>, gemini: Arc<dyn ChatProvider>) -> Self {
        Self { openai, gemini }
    }

    pub fn for_kind(&self, kind: ProviderKind) -> Arc<dyn ChatProvider> {
        match kind {
            ProviderKind::OpenAi => self.openai.clone(),
            ProviderKind::Gemini => self.gemini.clone(),
        }
    }
}

/// Routes conversation events and owns every transcript.
///
/// All session mutations and all presenter calls happen on whichever task
/// drives the dispatcher. Provider calls run on spawned tasks that only
/// perform the request and hand back a [`Completion`] over a channel.
pub struct Dispatcher {
    sessions: SessionStore,
    providers: ProviderSet,
    preferences: Arc<dyn PreferenceStore>,
    presenter: Arc<dyn Presenter>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl Dispatcher {
    pub fn new(
        providers: ProviderSet,
        preferences: Arc<dyn PreferenceStore>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            sessions: SessionStore::new(),
            providers,
            preferences,
            presenter,
            completions_tx,
            completions_rx,
            in_flight: 0,
        }
    }

    pub fn with_session_capacity(mut self, capacity: Option<usize>) -> Self {
        self.sessions = SessionStore::with_capacity(capacity);
        self
    }

    /// Creates the inbound queue and its sending half.
    pub fn channel() -> (DispatcherHandle, mpsc::Receiver<ConversationEvent>) {
        let (tx, rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        (DispatcherHandle { events: tx }, rx)
    }

    /// Number of provider calls that have not delivered their result yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn transcript(&self, conversation_id: ConversationId) -> Option<&[Message]> {
        self.sessions.get(conversation_id).map(|s| s.messages())
    }

    pub fn conversation_count(&self) -> usize {
        self.sessions.len()
    }

    /// Processes events until the handle side is dropped, then waits for
    /// outstanding provider calls to land before returning.
    pub async fn run(mut self, mut events: mpsc::Receiver<ConversationEvent>) -> Self {
        let mut accepting = true;

        loop {
            if !accepting && self.in_flight == 0 {
                break;
            }

            tokio::select! {
                event = events.recv(), if accepting => match event {
                    Some(event) => self.handle(event),
                    None => {
                        debug!("Event channel closed with {} call(s) in flight", self.in_flight);
                        accepting = false;
                    }
                },
                Some(completion) = self.completions_rx.recv(), if self.in_flight > 0 => {
                    self.complete(completion);
                }
                else => break,
            }
        }

        self
    }

    /// Applies every outstanding completion, waiting as needed.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            match self.completions_rx.recv().await {
                Some(completion) => self.complete(completion),
                None => break,
            }
        }
    }

    /// Handles one inbound event without waiting on the network.
    pub fn handle(&mut self, event: ConversationEvent) {
        debug!("Handling {} for {}", event.kind(), event.conversation_id());

        match event {
            ConversationEvent::NewConversation { conversation_id } => {
                if let Err(e) = self.start_conversation(conversation_id) {
                    warn!("Ignoring new conversation: {}", e);
                }
            }
            ConversationEvent::UserReply {
                conversation_id,
                text,
            } => self.reply(conversation_id, text),
            ConversationEvent::Dismiss { conversation_id } => {
                self.presenter.dismiss(conversation_id);
            }
        }
    }

    fn start_conversation(&mut self, conversation_id: ConversationId) -> Result<(), DomainError> {
        let session = self.sessions.create(conversation_id, WELCOME_MESSAGE)?;
        info!("Started conversation {}", conversation_id);
        self.presenter.render(conversation_id, session.messages());
        Ok(())
    }

    fn reply(&mut self, conversation_id: ConversationId, text: String) {
        let Some(session) = self.sessions.get_mut(conversation_id) else {
            warn!("Reply for unknown conversation {} dropped", conversation_id);
            return;
        };

        let history = session.history();
        session.append_user(text.clone());
        self.presenter.render(conversation_id, session.messages());

        let config = self.preferences.provider_config();
        if !config.has_api_key() {
            warn!("No API key configured for {}", config.kind());
            session.append_assistant(format!(
                "Error: Missing API Key for {}.",
                config.kind().as_str()
            ));
            self.presenter.render(conversation_id, session.messages());
            return;
        }

        let provider = self.providers.for_kind(config.kind());
        let completions = self.completions_tx.clone();
        self.in_flight += 1;

        info!(
            "Sending turn for {} to {} ({} prior messages)",
            conversation_id,
            provider.name(),
            history.len()
        );

        let provider_name = provider.name().to_string();
        tokio::spawn(async move {
            // The call runs in its own task so a panic still yields a completion.
            let call = tokio::spawn(async move { provider.send(&text, &history, &config).await });
            let reply = match call.await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("{} call for {} aborted: {}", provider_name, conversation_id, e);
                    format!("{} Error: {}", provider_name, e)
                }
            };
            if completions
                .send(Completion::new(conversation_id, reply))
                .is_err()
            {
                debug!("Dispatcher gone before reply for {} arrived", conversation_id);
            }
        });
    }

    fn complete(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let conversation_id = completion.conversation_id();

        let Some(session) = self.sessions.get_mut(conversation_id) else {
            warn!("Reply for evicted conversation {} discarded", conversation_id);
            return;
        };

        session.append_assistant(completion.into_text());
        debug!("Conversation {} now has {} messages", conversation_id, session.len());
        self.presenter.render(conversation_id, session.messages());
    }
}

/// Sending half of the dispatcher's event queue.
#[derive(Clone)]
pub struct DispatcherHandle {
    events: mpsc::Sender<ConversationEvent>,
}

impl DispatcherHandle {
    /// Allocates a fresh id and asks the dispatcher to start a conversation.
    pub async fn new_conversation(&self) -> Result<ConversationId, DomainError> {
        let conversation_id = ConversationId::new();
        self.send(ConversationEvent::NewConversation { conversation_id })
            .await?;
        Ok(conversation_id)
    }

    pub async fn reply(
        &self,
        conversation_id: ConversationId,
        text: impl Into<String>,
    ) -> Result<(), DomainError> {
        self.send(ConversationEvent::UserReply {
            conversation_id,
            text: text.into(),
        })
        .await
    }

    pub async fn dismiss(&self, conversation_id: ConversationId) -> Result<(), DomainError> {
        self.send(ConversationEvent::Dismiss { conversation_id })
            .await
    }

    pub async fn send(&self, event: ConversationEvent) -> Result<(), DomainError> {
        self.events
            .send(event)
            .await
            .map_err(|_| DomainError::internal("dispatcher is no longer running"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::domain::{Preferences, ProviderConfig, Role};

    #[derive(Default)]
    struct RecordingPresenter {
        renders: Mutex<Vec<(ConversationId, Vec<Message>)>>,
        dismissed: Mutex<Vec<ConversationId>>,
    }

    impl Presenter for RecordingPresenter {
        fn render(&self, conversation_id: ConversationId, messages: &[Message]) {
            self.renders
                .lock()
                .unwrap()
                .push((conversation_id, messages.to_vec()));
        }

        fn dismiss(&self, conversation_id: ConversationId) {
            self.dismissed.lock().unwrap().push(conversation_id);
        }
    }

    struct FixedPreferences(Mutex<Preferences>);

    impl FixedPreferences {
        fn with_key(kind: ProviderKind, key: &str) -> Self {
            let mut prefs = Preferences {
                provider: kind,
                ..Preferences::default()
            };
            prefs.set_api_key(kind, key);
            Self(Mutex::new(prefs))
        }
    }

    impl PreferenceStore for FixedPreferences {
        fn load(&self) -> Preferences {
            self.0.lock().unwrap().clone()
        }

        fn save(&self, preferences: &Preferences) -> Result<(), DomainError> {
            *self.0.lock().unwrap() = preferences.clone();
            Ok(())
        }
    }

    /// Echoes the message and records what it was given.
    struct EchoProvider {
        label: &'static str,
        calls: Mutex<Vec<(String, Vec<Message>, ProviderConfig)>>,
    }

    impl EchoProvider {
        fn new(label: &'static str) -> Arc<Self> {
            Arc::new(Self {
                label,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatProvider for EchoProvider {
        async fn send(&self, message: &str, history: &[Message], config: &ProviderConfig) -> String {
            self.calls
                .lock()
                .unwrap()
                .push((message.to_string(), history.to_vec(), config.clone()));
            format!("{} says: {}", self.label, message)
        }

        fn name(&self) -> &str {
            self.label
        }
    }

    struct PanickingProvider;

    #[async_trait]
    impl ChatProvider for PanickingProvider {
        async fn send(&self, _message: &str, _history: &[Message], _config: &ProviderConfig) -> String {
            panic!("connection pool exploded")
        }

        fn name(&self) -> &str {
            "OpenAI"
        }
    }

    struct Fixture {
        dispatcher: Dispatcher,
        presenter: Arc<RecordingPresenter>,
        openai: Arc<EchoProvider>,
        gemini: Arc<EchoProvider>,
    }

    fn fixture(preferences: FixedPreferences) -> Fixture {
        let presenter = Arc::new(RecordingPresenter::default());
        let openai = EchoProvider::new("openai");
        let gemini = EchoProvider::new("gemini");
        let dispatcher = Dispatcher::new(
            ProviderSet::new(openai.clone(), gemini.clone()),
            Arc::new(preferences),
            presenter.clone(),
        );
        Fixture {
            dispatcher,
            presenter,
            openai,
            gemini,
        }
    }

    #[tokio::test]
    async fn test_new_conversation_renders_welcome() {
        let mut f = fixture(FixedPreferences::with_key(ProviderKind::OpenAi, "sk"));
        let id = ConversationId::new();

        f.dispatcher
            .handle(ConversationEvent::NewConversation { conversation_id: id });

        let renders = f.presenter.renders.lock().unwrap();
        assert_eq!(renders.len(), 1);
        assert_eq!(renders[0].0, id);
        assert_eq!(renders[0].1, vec![Message::assistant(WELCOME_MESSAGE)]);
    }

    #[tokio::test]
    async fn test_reply_sends_history_without_current_turn() {
        let mut f = fixture(FixedPreferences::with_key(ProviderKind::OpenAi, "sk"));
        let id = ConversationId::new();
        f.dispatcher
            .handle(ConversationEvent::NewConversation { conversation_id: id });

        f.dispatcher.handle(ConversationEvent::UserReply {
            conversation_id: id,
            text: "first".to_string(),
        });
        f.dispatcher.settle().await;
        f.dispatcher.handle(ConversationEvent::UserReply {
            conversation_id: id,
            text: "second".to_string(),
        });
        f.dispatcher.settle().await;

        let calls = f.openai.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "first");
        assert_eq!(calls[0].1, vec![Message::assistant(WELCOME_MESSAGE)]);
        assert_eq!(calls[1].0, "second");
        assert_eq!(calls[1].1.len(), 3);
        assert!(calls[1].1.iter().all(|m| m.content() != "second"));
        assert_eq!(f.gemini.call_count(), 0);
    }

    #[tokio::test]
    async fn test_user_turn_rendered_before_assistant_turn() {
        let mut f = fixture(FixedPreferences::with_key(ProviderKind::OpenAi, "sk"));
        let id = ConversationId::new();
        f.dispatcher
            .handle(ConversationEvent::NewConversation { conversation_id: id });
        f.dispatcher.handle(ConversationEvent::UserReply {
            conversation_id: id,
            text: "hello".to_string(),
        });

        // The user's own turn is visible before the provider answers.
        {
            let renders = f.presenter.renders.lock().unwrap();
            assert_eq!(renders.len(), 2);
            assert_eq!(renders[1].1.last(), Some(&Message::user("hello")));
        }
        assert_eq!(f.dispatcher.in_flight(), 1);

        f.dispatcher.settle().await;

        let renders = f.presenter.renders.lock().unwrap();
        assert_eq!(renders.len(), 3);
        assert_eq!(
            renders[2].1.last(),
            Some(&Message::assistant("openai says: hello"))
        );
        assert_eq!(f.dispatcher.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        let mut f = fixture(FixedPreferences::with_key(ProviderKind::Gemini, "  "));
        let id = ConversationId::new();
        f.dispatcher
            .handle(ConversationEvent::NewConversation { conversation_id: id });
        f.dispatcher.handle(ConversationEvent::UserReply {
            conversation_id: id,
            text: "hi".to_string(),
        });

        assert_eq!(f.dispatcher.in_flight(), 0);
        assert_eq!(f.gemini.call_count(), 0);
        assert_eq!(f.openai.call_count(), 0);

        let transcript = f.dispatcher.transcript(id).unwrap();
        assert_eq!(transcript.len(), 3);
        assert_eq!(
            transcript[2],
            Message::assistant("Error: Missing API Key for gemini.")
        );
    }

    #[tokio::test]
    async fn test_active_provider_selects_adapter_and_model() {
        let mut f = fixture(FixedPreferences::with_key(ProviderKind::Gemini, "g-key"));
        let id = ConversationId::new();
        f.dispatcher
            .handle(ConversationEvent::NewConversation { conversation_id: id });
        f.dispatcher.handle(ConversationEvent::UserReply {
            conversation_id: id,
            text: "hi".to_string(),
        });
        f.dispatcher.settle().await;

        let calls = f.gemini.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].2.kind(), ProviderKind::Gemini);
        assert_eq!(calls[0].2.api_key(), "g-key");
        assert_eq!(calls[0].2.model(), Some("gemini-2.0-flash"));
        assert_eq!(f.openai.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_conversation_is_ignored() {
        let mut f = fixture(FixedPreferences::with_key(ProviderKind::OpenAi, "sk"));

        f.dispatcher.handle(ConversationEvent::UserReply {
            conversation_id: ConversationId::new(),
            text: "anyone?".to_string(),
        });

        assert_eq!(f.dispatcher.in_flight(), 0);
        assert!(f.presenter.renders.lock().unwrap().is_empty());
        assert_eq!(f.openai.call_count(), 0);
    }

    #[tokio::test]
    async fn test_dismiss_keeps_session() {
        let mut f = fixture(FixedPreferences::with_key(ProviderKind::OpenAi, "sk"));
        let id = ConversationId::new();
        f.dispatcher
            .handle(ConversationEvent::NewConversation { conversation_id: id });
        f.dispatcher
            .handle(ConversationEvent::Dismiss { conversation_id: id });

        assert_eq!(*f.presenter.dismissed.lock().unwrap(), vec![id]);
        assert!(f.dispatcher.transcript(id).is_some());
    }

    #[tokio::test]
    async fn test_duplicate_new_conversation_keeps_transcript() {
        let mut f = fixture(FixedPreferences::with_key(ProviderKind::OpenAi, ""));
        let id = ConversationId::new();
        f.dispatcher
            .handle(ConversationEvent::NewConversation { conversation_id: id });
        f.dispatcher.handle(ConversationEvent::UserReply {
            conversation_id: id,
            text: "hi".to_string(),
        });
        f.dispatcher
            .handle(ConversationEvent::NewConversation { conversation_id: id });

        assert_eq!(f.dispatcher.transcript(id).unwrap().len(), 3);
        assert_eq!(f.dispatcher.conversation_count(), 1);
    }

    #[tokio::test]
    async fn test_run_drains_pending_replies_after_close() {
        let f = fixture(FixedPreferences::with_key(ProviderKind::OpenAi, "sk"));
        let (handle, events) = Dispatcher::channel();
        let task = tokio::spawn(f.dispatcher.run(events));

        let id = handle.new_conversation().await.unwrap();
        for i in 0..3 {
            handle.reply(id, format!("turn {i}")).await.unwrap();
        }
        drop(handle);

        let dispatcher = task.await.unwrap();
        let transcript = dispatcher.transcript(id).unwrap();

        assert_eq!(transcript.len(), 1 + 2 * 3);
        assert_eq!(transcript.iter().filter(|m| m.role() == Role::User).count(), 3);
        assert_eq!(dispatcher.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_panicking_provider_still_appends_error_turn() {
        let presenter = Arc::new(RecordingPresenter::default());
        let dispatcher = Dispatcher::new(
            ProviderSet::new(Arc::new(PanickingProvider), EchoProvider::new("gemini")),
            Arc::new(FixedPreferences::with_key(ProviderKind::OpenAi, "sk")),
            presenter.clone(),
        );
        let (handle, events) = Dispatcher::channel();
        let task = tokio::spawn(dispatcher.run(events));

        let id = handle.new_conversation().await.unwrap();
        handle.reply(id, "hi").await.unwrap();
        drop(handle);

        let dispatcher = tokio::time::timeout(std::time::Duration::from_secs(5), task)
            .await
            .expect("run should return once the failed call is accounted for")
            .unwrap();
        let transcript = dispatcher.transcript(id).unwrap();

        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[2].role(), Role::Assistant);
        assert!(
            transcript[2].content().starts_with("OpenAI Error: "),
            "got: {}",
            transcript[2].content()
        );
        assert_eq!(dispatcher.in_flight(), 0);
        assert_eq!(presenter.renders.lock().unwrap().len(), 3);
    }
}
