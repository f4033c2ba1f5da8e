use crate::domain::{ConversationId, Message};

/// The surface that shows conversations to the user.
///
/// Called only from the dispatcher, after every transcript mutation.
pub trait Presenter: Send + Sync {
    /// Show the full, ordered transcript of a conversation.
    fn render(&self, conversation_id: ConversationId, messages: &[Message]);

    /// Clear whatever is visible for a conversation.
    fn dismiss(&self, conversation_id: ConversationId);
}
