//! Document list and upload status.

use crate::chat::{ChatController, UploadState};

pub const NO_FILES_TEXT: &str = "No files uploaded.";

pub fn render_files(files: &[String]) -> String {
    let mut out = format!("Your Files ({})\n", files.len());

    if files.is_empty() {
        out.push_str("  ");
        out.push_str(NO_FILES_TEXT);
        out.push('\n');
        return out;
    }

    for file in files {
        out.push_str("  - ");
        out.push_str(file);
        out.push('\n');
    }
    out
}

pub fn render_sidebar(chat: &ChatController) -> String {
    let mut out = String::from("Data Sources\n");

    match chat.upload_state() {
        UploadState::Uploading => out.push_str("Uploading...\n"),
        UploadState::Idle => {}
    }
    if let Some(error) = chat.upload_error() {
        out.push_str("Error: ");
        out.push_str(error);
        out.push('\n');
    }

    out.push_str(&render_files(chat.files()));
    out
}
