//! Request and response bodies exchanged with the backend.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RegisteredUser {
    pub id: i64,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FileList {
    #[serde(default)]
    pub files: Vec<String>,
}

/// Body the backend may return after a successful upload.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UploadReceipt {
    pub filename: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub chunks_processed: Option<u64>,
    #[serde(default)]
    pub total_files: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub question: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatResponse {
    pub answer: String,
}
