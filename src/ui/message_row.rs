//! Text rendering of a single chat bubble.

use crate::models::{ChatMessage, MessagePreview, MessageStatus, Role};

const INDENT: &str = "  ";

pub fn render_message(message: &ChatMessage) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "[{}] {}",
        message.timestamp.format("%H:%M:%S"),
        header(message.role, message.status)
    ));
    out.push('\n');

    if message.is_pending() {
        out.push_str(INDENT);
        out.push_str("\u{2026}\n");
        return out;
    }

    push_indented(&mut out, &message.content);

    if let Some(sources) = message.sources.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(INDENT);
        out.push_str("Sources:\n");
        push_indented(&mut out, sources);
    }

    out
}

pub fn render_preview(preview: &MessagePreview) -> String {
    let mut line = format!(
        "{} {:<9} {}",
        preview.timestamp.format("%H:%M:%S"),
        header(preview.role, preview.status),
        preview.content_preview
    );
    if preview.is_truncated() {
        line.push_str(" (content truncated)");
    }
    line
}

fn header(role: Role, status: MessageStatus) -> String {
    match status {
        MessageStatus::Failed => format!("{} (error)", role.label()),
        _ => role.label().to_string(),
    }
}

fn push_indented(out: &mut String, text: &str) {
    for line in text.lines() {
        out.push_str(INDENT);
        out.push_str(line);
        out.push('\n');
    }
}
