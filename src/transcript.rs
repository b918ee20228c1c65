//! In-memory chat history.
//!
//! Every user submission appends two entries: the user's message and a
//! pending assistant placeholder. The placeholder is later resolved or
//! failed by id, so answers that arrive out of order still land next to the
//! question that produced them.

use thiserror::Error;

use crate::models::{ChatMessage, MessageId, MessagePreview, MessageStatus};
use crate::parsers::answer::ParsedAnswer;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("message {0} is not in the transcript")]
    UnknownMessage(MessageId),

    #[error("message {id} was already settled as {status:?}")]
    AlreadySettled { id: MessageId, status: MessageStatus },
}

/// Handle for one outstanding assistant turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    pub question_id: MessageId,
    pub answer_id: MessageId,
    pub question: String,
}

#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append the user's question and a pending answer slot.
    ///
    /// Returns `None` for blank input, leaving the transcript untouched.
    pub fn submit(&mut self, question: &str) -> Option<PendingTurn> {
        if question.trim().is_empty() {
            return None;
        }

        let question_id = self.allocate_id();
        self.messages.push(ChatMessage::user(question_id, question));

        let answer_id = self.allocate_id();
        self.messages.push(ChatMessage::pending_assistant(answer_id));

        tracing::debug!(%question_id, %answer_id, "Chat turn submitted");

        Some(PendingTurn {
            question_id,
            answer_id,
            question: question.to_string(),
        })
    }

    pub fn resolve(&mut self, id: MessageId, answer: ParsedAnswer) -> Result<(), TranscriptError> {
        self.pending_mut(id)?.resolve(answer);
        Ok(())
    }

    pub fn fail(&mut self, id: MessageId) -> Result<(), TranscriptError> {
        self.pending_mut(id)?.fail();
        Ok(())
    }

    fn pending_mut(&mut self, id: MessageId) -> Result<&mut ChatMessage, TranscriptError> {
        let message = self
            .messages
            .iter_mut()
            .find(|message| message.id == id)
            .ok_or(TranscriptError::UnknownMessage(id))?;

        if !message.is_pending() {
            return Err(TranscriptError::AlreadySettled {
                id,
                status: message.status,
            });
        }

        Ok(message)
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|message| message.id == id)
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

    pub fn pending_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|message| message.is_pending())
            .count()
    }

    pub fn previews(&self) -> Vec<MessagePreview> {
        self.messages.iter().map(MessagePreview::from_message).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CHAT_FAILURE_TEXT, Role};
    use crate::parsers::parse_answer;

    #[test]
    fn submit_appends_question_and_pending_answer() {
        let mut transcript = Transcript::new();

        let turn = transcript.submit("What is this?").unwrap();

        assert_eq!(transcript.len(), 2);
        let question = transcript.get(turn.question_id).unwrap();
        assert_eq!(question.role, Role::User);
        assert_eq!(question.content, "What is this?");
        assert_eq!(question.status, MessageStatus::Resolved);

        let answer = transcript.get(turn.answer_id).unwrap();
        assert_eq!(answer.role, Role::Assistant);
        assert!(answer.is_pending());
    }

    #[test]
    fn blank_submission_is_ignored() {
        let mut transcript = Transcript::new();

        assert!(transcript.submit("   \n\t").is_none());
        assert!(transcript.is_empty());
    }

    #[test]
    fn resolve_fills_content_and_sources() {
        let mut transcript = Transcript::new();
        let turn = transcript.submit("capital?").unwrap();

        transcript
            .resolve(turn.answer_id, parse_answer("Answer: Paris.Sources: geo.pdf"))
            .unwrap();

        let answer = transcript.get(turn.answer_id).unwrap();
        assert_eq!(answer.content, "Paris.");
        assert_eq!(answer.sources.as_deref(), Some("geo.pdf"));
        assert_eq!(answer.status, MessageStatus::Resolved);
        assert!(!answer.is_error);
    }

    #[test]
    fn resolve_without_sources_stores_none() {
        let mut transcript = Transcript::new();
        let turn = transcript.submit("hi").unwrap();

        transcript
            .resolve(turn.answer_id, parse_answer("Answer: hello"))
            .unwrap();

        assert_eq!(transcript.get(turn.answer_id).unwrap().sources, None);
    }

    #[test]
    fn fail_marks_error_with_fallback_text() {
        let mut transcript = Transcript::new();
        let turn = transcript.submit("hi").unwrap();

        transcript.fail(turn.answer_id).unwrap();

        let answer = transcript.get(turn.answer_id).unwrap();
        assert_eq!(answer.content, CHAT_FAILURE_TEXT);
        assert!(answer.is_error);
        assert_eq!(answer.status, MessageStatus::Failed);
    }

    #[test]
    fn settled_message_cannot_transition_again() {
        let mut transcript = Transcript::new();
        let turn = transcript.submit("hi").unwrap();
        transcript.fail(turn.answer_id).unwrap();

        let err = transcript
            .resolve(turn.answer_id, parse_answer("late"))
            .unwrap_err();

        assert_eq!(
            err,
            TranscriptError::AlreadySettled {
                id: turn.answer_id,
                status: MessageStatus::Failed,
            }
        );
    }

    #[test]
    fn user_message_is_not_resolvable() {
        let mut transcript = Transcript::new();
        let turn = transcript.submit("hi").unwrap();

        assert!(matches!(
            transcript.fail(turn.question_id),
            Err(TranscriptError::AlreadySettled { .. })
        ));
    }

    #[test]
    fn unknown_id_is_reported() {
        let mut transcript = Transcript::new();

        assert_eq!(
            transcript.fail(MessageId(42)),
            Err(TranscriptError::UnknownMessage(MessageId(42)))
        );
    }

    #[test]
    fn ids_are_unique_across_turns() {
        let mut transcript = Transcript::new();
        let first = transcript.submit("one").unwrap();
        let second = transcript.submit("two").unwrap();

        let mut ids: Vec<_> = transcript.messages().iter().map(|m| m.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 4);
        assert!(second.question_id > first.answer_id);
    }
}
