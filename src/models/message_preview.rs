use chrono::{DateTime, Utc};

use crate::models::{ChatMessage, MessageStatus, Role};
use crate::parsers::{collapse_whitespace, truncate_chars};

pub const PREVIEW_MAX_CHARS: usize = 80;

/// One-line summary of a transcript entry, used by the history listing.
#[derive(Debug, Clone)]
pub struct MessagePreview {
    pub role: Role,
    pub status: MessageStatus,
    pub content_preview: String,
    pub content_len: usize,
    pub timestamp: DateTime<Utc>,
}

impl MessagePreview {
    pub fn from_message(message: &ChatMessage) -> Self {
        let collapsed = collapse_whitespace(&message.content);

        Self {
            role: message.role,
            status: message.status,
            content_preview: truncate_chars(&collapsed, PREVIEW_MAX_CHARS),
            content_len: collapsed.chars().count(),
            timestamp: message.timestamp,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.content_len > PREVIEW_MAX_CHARS
    }
}
