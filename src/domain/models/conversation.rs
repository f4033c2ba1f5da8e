use std::fmt;

use uuid::Uuid;

/// Opaque identifier of one live conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationId(Uuid);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// First eight hex digits, for console labels.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inbound events from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationEvent {
    NewConversation { conversation_id: ConversationId },
    UserReply {
        conversation_id: ConversationId,
        text: String,
    },
    Dismiss { conversation_id: ConversationId },
}

impl ConversationEvent {
    pub fn conversation_id(&self) -> ConversationId {
        match self {
            ConversationEvent::NewConversation { conversation_id }
            | ConversationEvent::UserReply {
                conversation_id, ..
            }
            | ConversationEvent::Dismiss { conversation_id } => *conversation_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ConversationEvent::NewConversation { .. } => "new_conversation",
            ConversationEvent::UserReply { .. } => "user_reply",
            ConversationEvent::Dismiss { .. } => "dismiss",
        }
    }
}

/// Result of a background provider call, delivered back to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    conversation_id: ConversationId,
    text: String,
}

impl Completion {
    pub fn new(conversation_id: ConversationId, text: impl Into<String>) -> Self {
        Self {
            conversation_id,
            text: text.into(),
        }
    }

    pub fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
