use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Mutex;

use tracing::warn;

use crate::application::Presenter;
use crate::domain::{ConversationId, Message, Role};

const USER_LABEL: &str = "Me";
const ASSISTANT_LABEL: &str = "AI Bot";
const SYSTEM_LABEL: &str = "System";

struct ConsoleState {
    /// Messages already printed per conversation.
    shown: HashMap<ConversationId, usize>,
    out: Box<dyn Write + Send>,
}

/// Prints transcripts to a terminal.
///
/// Each render prints only the messages not yet shown for that conversation,
/// so re-rendering after every append reads as a running chat log. Dismissing
/// forgets what was shown; the next render replays the whole transcript.
pub struct ConsolePresenter {
    state: Mutex<ConsoleState>,
}

impl ConsolePresenter {
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            state: Mutex::new(ConsoleState {
                shown: HashMap::new(),
                out,
            }),
        }
    }

    fn label(role: Role) -> &'static str {
        match role {
            Role::User => USER_LABEL,
            Role::Assistant => ASSISTANT_LABEL,
            Role::System => SYSTEM_LABEL,
        }
    }

    fn format_line(conversation_id: ConversationId, message: &Message) -> String {
        format!(
            "[{}] {}: {}",
            conversation_id.short(),
            Self::label(message.role()),
            message.content()
        )
    }
}

impl Default for ConsolePresenter {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Presenter for ConsolePresenter {
    fn render(&self, conversation_id: ConversationId, messages: &[Message]) {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let already = state.shown.get(&conversation_id).copied().unwrap_or(0);
        let start = if already > messages.len() { 0 } else { already };

        for message in &messages[start..] {
            let line = Self::format_line(conversation_id, message);
            if let Err(e) = writeln!(state.out, "{}", line) {
                warn!("Failed to write transcript line: {}", e);
                return;
            }
        }
        if let Err(e) = state.out.flush() {
            warn!("Failed to flush transcript: {}", e);
        }

        state.shown.insert(conversation_id, messages.len());
    }

    fn dismiss(&self, conversation_id: ConversationId) {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        state.shown.remove(&conversation_id);
        if let Err(e) = writeln!(state.out, "[{}] (dismissed)", conversation_id.short()) {
            warn!("Failed to write dismiss marker: {}", e);
        }
    }
}
