use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::parsers::answer::ParsedAnswer;

/// Text shown in place of an answer when the chat request fails.
pub const CHAT_FAILURE_TEXT: &str = "Sorry, I had trouble connecting to the server.";

/// Identifier of a message within one transcript. Never reused.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub sources: Option<String>,
    pub is_error: bool,
    pub status: MessageStatus,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(id: MessageId, content: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::User,
            content: content.into(),
            sources: None,
            is_error: false,
            status: MessageStatus::Resolved,
            timestamp: Utc::now(),
        }
    }

    /// Placeholder for an answer that has not arrived yet.
    pub fn pending_assistant(id: MessageId) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content: String::new(),
            sources: None,
            is_error: false,
            status: MessageStatus::Pending,
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn resolve(&mut self, answer: ParsedAnswer) {
        self.content = answer.content;
        self.sources = if answer.sources.is_empty() {
            None
        } else {
            Some(answer.sources)
        };
        self.is_error = false;
        self.status = MessageStatus::Resolved;
        self.timestamp = Utc::now();
    }

    pub(crate) fn fail(&mut self) {
        self.content = CHAT_FAILURE_TEXT.to_string();
        self.sources = None;
        self.is_error = true;
        self.status = MessageStatus::Failed;
        self.timestamp = Utc::now();
    }

    pub fn is_pending(&self) -> bool {
        self.status == MessageStatus::Pending
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MessageStatus {
    Pending,
    Resolved,
    Failed,
}
