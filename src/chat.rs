//! Chat view state: transcript, document list and upload status.

use std::path::Path;

use crate::api::{ApiClient, ApiError, UploadReceipt};
use crate::models::MessageId;
use crate::parsers::parse_answer;
use crate::transcript::{PendingTurn, Transcript, TranscriptError};

pub const UPLOAD_FAILED_TEXT: &str = "Upload failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Uploading,
}

pub struct ChatController {
    client: ApiClient,
    transcript: Transcript,
    files: Vec<String>,
    upload_state: UploadState,
    upload_error: Option<String>,
}

impl ChatController {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            transcript: Transcript::new(),
            files: Vec::new(),
            upload_state: UploadState::Idle,
            upload_error: None,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn upload_state(&self) -> UploadState {
        self.upload_state
    }

    pub fn upload_error(&self) -> Option<&str> {
        self.upload_error.as_deref()
    }

    /// Append the question right away, before any request is made.
    pub fn submit(&mut self, question: &str) -> Option<PendingTurn> {
        self.transcript.submit(question)
    }

    /// Settle a turn with the outcome of its `/chat` call.
    pub fn apply_answer(
        &mut self,
        turn: &PendingTurn,
        result: Result<String, ApiError>,
    ) -> Result<(), TranscriptError> {
        match result {
            Ok(raw) => self.transcript.resolve(turn.answer_id, parse_answer(&raw)),
            Err(err) => {
                tracing::error!("Chat failed: {}", err);
                self.transcript.fail(turn.answer_id)
            }
        }
    }

    /// Submit a question and wait for its answer.
    ///
    /// Returns the id of the assistant message, or `None` for blank input.
    pub async fn ask(&mut self, question: &str) -> Option<MessageId> {
        let turn = self.submit(question)?;
        let result = self.client.chat(&turn.question).await;

        if let Err(err) = self.apply_answer(&turn, result) {
            tracing::warn!("Could not settle {}: {}", turn.answer_id, err);
        }
        Some(turn.answer_id)
    }

    /// Reload the document list. On failure the previous list is kept.
    pub async fn refresh_files(&mut self) -> bool {
        match self.client.list_files().await {
            Ok(files) => {
                self.files = files;
                true
            }
            Err(err) => {
                tracing::error!("Failed to fetch files: {}", err);
                false
            }
        }
    }

    pub fn begin_upload(&mut self) {
        self.upload_state = UploadState::Uploading;
        self.upload_error = None;
    }

    pub fn finish_upload(&mut self, result: &Result<Option<UploadReceipt>, ApiError>) {
        self.upload_state = UploadState::Idle;
        if let Err(err) = result {
            tracing::error!("Upload failed: {}", err);
            self.upload_error = Some(
                err.detail()
                    .map(str::to_string)
                    .unwrap_or_else(|| UPLOAD_FAILED_TEXT.to_string()),
            );
        }
    }

    /// Upload a document and refresh the list when it succeeds.
    pub async fn upload(&mut self, path: &Path) -> Result<Option<UploadReceipt>, ApiError> {
        self.begin_upload();
        let result = self.client.upload_file(path).await;
        self.finish_upload(&result);

        if result.is_ok() {
            self.refresh_files().await;
        }
        result
    }
}
