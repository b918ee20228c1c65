pub mod api;
pub mod app;
pub mod chat;
pub mod config;
pub mod login;
pub mod models;
pub mod parsers;
pub mod session;
pub mod transcript;
pub mod ui;

// Re-export commonly used types
pub use api::{ApiClient, ApiError, Credentials};
pub use chat::ChatController;
pub use config::Config;
pub use models::{ChatMessage, MessageId, MessageStatus, Role};
pub use parsers::{ParsedAnswer, parse_answer};
pub use session::{ExpiryReason, FileTokenStore, MemoryTokenStore, Session, TokenStore, View};
pub use transcript::{PendingTurn, Transcript};
