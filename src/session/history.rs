use crate::llm::{MessageRole, ProviderMessage};
use uuid::Uuid;

/// In-memory conversation history for one chat session.
///
/// Only user and assistant turns are stored; instructions travel separately
/// as the system prompt. Nothing is persisted.
#[derive(Debug, Clone)]
pub struct History {
    session_id: String,
    turns: Vec<ProviderMessage>,
}

impl History {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            turns: Vec::new(),
        }
    }

    /// Identifier used to correlate log lines for this conversation.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(ProviderMessage::user(text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(ProviderMessage::assistant(text));
    }

    /// Remove the last turn if it is a user turn with no reply after it.
    pub fn pop_dangling_user(&mut self) -> Option<ProviderMessage> {
        if self.has_dangling_user() {
            self.turns.pop()
        } else {
            None
        }
    }

    pub fn has_dangling_user(&self) -> bool {
        self.turns
            .last()
            .is_some_and(|turn| turn.role == MessageRole::User)
    }

    pub fn turns(&self) -> &[ProviderMessage] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
