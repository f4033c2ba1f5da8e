use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::application::Dispatcher;
use crate::connector::adapter::ConsolePresenter;
use crate::domain::{ConversationEvent, ConversationId};

use super::super::Container;

/// One line of console input. Anything that is not a slash command,
/// including an empty line, is sent as typed.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput {
    New,
    Dismiss,
    Quit,
    Unknown(String),
    Message(String),
}

impl ChatInput {
    fn parse(line: &str) -> Self {
        let command = line.trim();
        if !command.starts_with('/') {
            return ChatInput::Message(line.to_string());
        }
        match command {
            "/new" => ChatInput::New,
            "/dismiss" => ChatInput::Dismiss,
            "/quit" | "/exit" => ChatInput::Quit,
            other => ChatInput::Unknown(other.to_string()),
        }
    }
}

pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Reads stdin line by line until EOF or `/quit`, then waits for pending
    /// replies before returning.
    pub async fn chat(&self) -> Result<String> {
        let presenter = Arc::new(ConsolePresenter::stdout());
        let (handle, events) = Dispatcher::channel();
        let driver = tokio::spawn(self.container.dispatcher(presenter).run(events));

        println!("Commands: /new, /dismiss, /quit. Anything else is sent as a reply.");
        let mut current = handle.new_conversation().await?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            match ChatInput::parse(&line) {
                ChatInput::Message(text) => handle.reply(current, text).await?,
                ChatInput::New => {
                    current = handle.new_conversation().await?;
                    debug!("Switched to conversation {}", current);
                }
                ChatInput::Dismiss => handle.dismiss(current).await?,
                ChatInput::Quit => break,
                ChatInput::Unknown(command) => {
                    println!("Unknown command {}. Try /new, /dismiss or /quit.", command);
                }
            }
        }

        drop(handle);
        let dispatcher = driver.await.context("dispatcher task failed")?;
        info!(
            "Chat ended with {} conversation(s)",
            dispatcher.conversation_count()
        );

        Ok(String::new())
    }

    /// Starts a conversation, sends `message` and waits for the reply.
    pub async fn ask(&self, message: String) -> Result<String> {
        let presenter = Arc::new(ConsolePresenter::stdout());
        let mut dispatcher = self.container.dispatcher(presenter);

        let conversation_id = ConversationId::new();
        dispatcher.handle(ConversationEvent::NewConversation { conversation_id });
        dispatcher.handle(ConversationEvent::UserReply {
            conversation_id,
            text: message,
        });
        dispatcher.settle().await;

        Ok(String::new())
    }
}
