//! Interactive chat loop.
//!
//! Questions are sent in the background so the prompt stays usable while an
//! answer is outstanding; answers are applied as they come back.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::api::ApiError;
use crate::chat::ChatController;
use crate::session::View;
use crate::transcript::PendingTurn;
use crate::ui::{message_row, sidebar};

const HELP_TEXT: &str = "\
Type a question and press Enter to ask about your documents.
Commands:
  /upload <path>   upload a document
  /files           list your documents
  /history         show a one-line summary of this conversation
  /logout          forget the stored credential and quit
  /help            show this help
  /quit            leave the chat";

#[derive(Debug, PartialEq, Eq)]
pub enum AppMsg {
    Send(String),
    Upload(PathBuf),
    Files,
    History,
    Logout,
    Help,
    Quit,
    Unknown(String),
}

/// Map one input line to a message. Blank lines map to nothing.
pub fn parse_input(line: &str) -> Option<AppMsg> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let Some(command) = trimmed.strip_prefix('/') else {
        return Some(AppMsg::Send(trimmed.to_string()));
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    Some(match name {
        "upload" if !arg.is_empty() => AppMsg::Upload(PathBuf::from(arg)),
        "files" => AppMsg::Files,
        "history" => AppMsg::History,
        "logout" => AppMsg::Logout,
        "help" | "?" => AppMsg::Help,
        "quit" | "exit" => AppMsg::Quit,
        _ => AppMsg::Unknown(trimmed.to_string()),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

type AnswerResult = (PendingTurn, Result<String, ApiError>);

pub struct App {
    chat: ChatController,
    answers_tx: mpsc::UnboundedSender<AnswerResult>,
    answers_rx: mpsc::UnboundedReceiver<AnswerResult>,
}

impl App {
    pub fn new(chat: ChatController) -> Self {
        let (answers_tx, answers_rx) = mpsc::unbounded_channel();
        Self {
            chat,
            answers_tx,
            answers_rx,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        self.chat.refresh_files().await;
        print!("{}", sidebar::render_sidebar(&self.chat));
        println!("Type /help for commands.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            let flow = tokio::select! {
                line = lines.next_line() => {
                    match line.context("Failed to read input")? {
                        Some(line) => match parse_input(&line) {
                            Some(msg) => self.update(msg).await?,
                            None => Flow::Continue,
                        },
                        None => Flow::Stop,
                    }
                }
                Some((turn, result)) = self.answers_rx.recv() => {
                    self.apply_answer(turn, result);
                    Flow::Continue
                }
            };

            if flow == Flow::Stop {
                break;
            }

            if self.chat.client().session().view() == View::Login {
                println!("Your session has expired. Run `documind login` to sign in again.");
                break;
            }
        }

        let pending = self.chat.transcript().pending_count();
        if pending > 0 {
            tracing::info!(pending, "Leaving with unanswered questions");
        }
        Ok(())
    }

    async fn update(&mut self, msg: AppMsg) -> Result<Flow> {
        match msg {
            AppMsg::Send(question) => self.send(&question),
            AppMsg::Upload(path) => {
                println!("Uploading {}...", path.display());
                match self.chat.upload(&path).await {
                    Ok(Some(receipt)) => println!(
                        "Uploaded {} ({} chunks).",
                        receipt.filename,
                        receipt.chunks_processed.unwrap_or_default()
                    ),
                    Ok(None) => println!("Uploaded {}.", path.display()),
                    Err(_) => {}
                }
                print!("{}", sidebar::render_sidebar(&self.chat));
            }
            AppMsg::Files => {
                self.chat.refresh_files().await;
                print!("{}", sidebar::render_files(self.chat.files()));
            }
            AppMsg::History => {
                for preview in self.chat.transcript().previews() {
                    println!("{}", message_row::render_preview(&preview));
                }
            }
            AppMsg::Logout => {
                self.chat
                    .client()
                    .session()
                    .logout()
                    .context("Failed to clear stored credential")?;
                println!("Logged out.");
                return Ok(Flow::Stop);
            }
            AppMsg::Help => println!("{}", HELP_TEXT),
            AppMsg::Quit => return Ok(Flow::Stop),
            AppMsg::Unknown(input) => println!("Unknown command: {} (try /help)", input),
        }
        Ok(Flow::Continue)
    }

    fn send(&mut self, question: &str) {
        let Some(turn) = self.chat.submit(question) else {
            return;
        };

        if let Some(message) = self.chat.transcript().get(turn.question_id) {
            print!("{}", message_row::render_message(message));
        }

        let client = self.chat.client().clone();
        let tx = self.answers_tx.clone();
        tokio::spawn(async move {
            let result = client.chat(&turn.question).await;
            // The receiver only goes away when the app is shutting down.
            let _ = tx.send((turn, result));
        });
    }

    fn apply_answer(&mut self, turn: PendingTurn, result: Result<String, ApiError>) {
        if let Err(err) = self.chat.apply_answer(&turn, result) {
            tracing::warn!("Dropping answer for {}: {}", turn.answer_id, err);
            return;
        }
        if let Some(message) = self.chat.transcript().get(turn.answer_id) {
            print!("{}", message_row::render_message(message));
        }
    }
}
