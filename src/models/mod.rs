pub mod message;
pub mod message_preview;

pub use message::{CHAT_FAILURE_TEXT, ChatMessage, MessageId, MessageStatus, Role};
pub use message_preview::MessagePreview;
