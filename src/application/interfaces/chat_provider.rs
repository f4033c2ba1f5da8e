use async_trait::async_trait;

use crate::domain::{Message, ProviderConfig};

/// One backend family's chat-completion API behind a uniform contract.
///
/// Implementors own the wire format and transport. They hold no credentials:
/// the key, system prompt and model arrive in `config` on every call.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send `message` after `history` and return the assistant's reply.
    ///
    /// Never fails from the caller's point of view. Transport errors, non-2xx
    /// statuses and malformed bodies come back as displayable text prefixed
    /// with [`ChatProvider::name`], so the transcript always gets a turn.
    async fn send(&self, message: &str, history: &[Message], config: &ProviderConfig) -> String;

    /// Human-readable provider name used as the error prefix.
    fn name(&self) -> &str;
}
