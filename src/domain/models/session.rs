use super::{ConversationId, Message};

/// The transcript of one conversation.
///
/// A session is created with a single seed message and only ever grows: the
/// engine appends user and assistant turns in chronological order and never
/// edits or removes an entry. `messages()` is therefore never empty.
#[derive(Debug, Clone)]
pub struct Session {
    id: ConversationId,
    messages: Vec<Message>,
}

impl Session {
    /// Starts a transcript seeded with an assistant message.
    pub fn new(id: ConversationId, seed: impl Into<String>) -> Self {
        Self {
            id,
            messages: vec![Message::assistant(seed)],
        }
    }

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Snapshot of everything said so far. Taken before a user turn is
    /// appended, this is the history handed to a provider alongside that turn.
    pub fn history(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn append_user(&mut self, text: impl Into<String>) {
        self.messages.push(Message::user(text));
    }

    pub fn append_assistant(&mut self, text: impl Into<String>) {
        self.messages.push(Message::assistant(text));
    }
}
