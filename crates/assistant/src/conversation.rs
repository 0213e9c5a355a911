//! Conversation state.
//!
//! An append-only message log plus a typing flag, owned by the session
//! and observed by whatever presentation layer is attached. Messages
//! are never edited or removed; `clear` is the only reset.

use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One chat message. Immutable once appended.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub text: String,
    pub role: Role,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    typing: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: &str) {
        self.push(Role::User, text);
    }

    pub fn push_assistant(&mut self, text: &str) {
        self.push(Role::Assistant, text);
    }

    fn push(&mut self, role: Role, text: &str) {
        self.messages.push(ChatMessage {
            text: text.to_string(),
            role,
            timestamp: Local::now(),
        });
    }

    /// "Assistant is composing" flag for the presentation layer.
    pub fn set_typing(&mut self, typing: bool) {
        self.typing = typing;
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Full reset. The only way messages ever leave the log.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.typing = false;
    }
}
