//! The chat widget: composer state, submission, and the rendered log.
//!
//! A submission walks `Idle -> Validating -> Sending -> {Success, Failure} ->
//! Idle`. Whatever happens on the wire, the composer is cleared afterwards.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    attachments::{AttachmentManager, PendingAttachment},
    config::WidgetConfig,
    protocol::{BotReply, OutgoingMessage, SubmitOutcome},
    transcript::{Transcript, decode_all},
    transport::ChatTransport,
};

/// Prefix of the bot message shown when a request fails.
pub const TRANSPORT_ERROR_PREFIX: &str = "An error occurred: ";

/// Prefix of the bot message quoting text extracted from a returned file.
pub fn file_contents_message(filename: &str, content: &str) -> String {
    format!("File contents ({filename}):\n{content}")
}

/// Where a submission currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Validating,
    Sending,
    Success,
    Failure,
}

/// Summary of one call to [`ChatWidget::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitReport {
    /// Blank text and no files: nothing was sent or rendered.
    Skipped,
    /// A request was made; the outcome has been rendered.
    Completed(SubmitOutcome),
}

/// The file input element; holds the labels of the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInput {
    selection: Vec<String>,
}

impl FileInput {
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }
}

/// Client-side chat widget.
#[derive(Debug)]
pub struct ChatWidget {
    transport: Arc<dyn ChatTransport>,
    attachments: AttachmentManager,
    transcript: Transcript,
    file_input: FileInput,
    text: String,
    state: SubmitState,
    max_upload_bytes: u64,
}

impl ChatWidget {
    pub fn new(config: &WidgetConfig, transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            attachments: AttachmentManager::new(),
            transcript: Transcript::new(config.server.uploads_prefix.clone()),
            file_input: FileInput::default(),
            text: String::new(),
            state: SubmitState::Idle,
            max_upload_bytes: config.limits.max_upload_bytes,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Composer
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// File input change: the new selection replaces the old one.
    pub fn select_files(&mut self, files: Vec<PendingAttachment>) {
        self.file_input.selection = files.iter().map(|f| f.name.clone()).collect();
        self.attachments.set_files(files);
    }

    /// Remove one pending file; out-of-range indexes are ignored.
    pub fn remove_file(&mut self, index: usize) -> bool {
        self.attachments.remove_at(index)
    }

    pub fn attachments(&self) -> &AttachmentManager {
        &self.attachments
    }

    pub fn file_input(&self) -> &FileInput {
        &self.file_input
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Submission
    // ─────────────────────────────────────────────────────────────────────────

    /// Send the composed message and render the reply.
    pub async fn submit(&mut self) -> SubmitReport {
        self.state = SubmitState::Validating;
        let message = OutgoingMessage::new(self.text.as_str(), self.attachments.files().to_vec());
        if message.is_empty() {
            self.state = SubmitState::Idle;
            return SubmitReport::Skipped;
        }

        let total_bytes = self.attachments.total_bytes();
        if total_bytes > self.max_upload_bytes {
            warn!(
                name: "chat.submit.oversized",
                total_bytes,
                limit = self.max_upload_bytes,
                "Attachments exceed the server upload limit"
            );
        }

        let (_, jobs) = self.transcript.push_user(message.text.clone(), &message.attachments);
        for result in decode_all(jobs).await {
            self.transcript.resolve_preview(result);
        }

        self.state = SubmitState::Sending;
        let outcome = SubmitOutcome::from(self.transport.send_message(&message).await);
        self.state = match outcome {
            SubmitOutcome::TransportError(_) => SubmitState::Failure,
            _ => SubmitState::Success,
        };
        self.render_outcome(&outcome);

        self.reset_composer();
        self.state = SubmitState::Idle;
        SubmitReport::Completed(outcome)
    }

    fn render_outcome(&mut self, outcome: &SubmitOutcome) {
        match outcome {
            SubmitOutcome::Reply(reply) => self.render_reply(reply),
            SubmitOutcome::AppError(error) => {
                info!(name: "chat.submit.app_error", error = %error);
                self.transcript.push_bot(error.clone(), &[]);
            }
            SubmitOutcome::TransportError(detail) => {
                warn!(name: "chat.submit.failed", error = %detail, "Chat request failed");
                self.transcript
                    .push_bot(format!("{TRANSPORT_ERROR_PREFIX}{detail}"), &[]);
            }
        }
    }

    fn render_reply(&mut self, reply: &BotReply) {
        info!(
            name: "chat.submit.replied",
            files = reply.files.len(),
            "Chat reply received"
        );
        self.transcript.push_bot(reply.message.clone(), &reply.files);
        for (filename, content) in reply.extracted_contents() {
            self.transcript
                .push_bot(file_contents_message(filename, content), &[]);
        }
    }

    /// Terminal step of every submission.
    fn reset_composer(&mut self) {
        self.text.clear();
        self.attachments.clear();
        self.file_input.clear();
    }

    /// Ask the server to forget the conversation, then empty the local log.
    ///
    /// On failure the log is kept and an error bubble is appended.
    pub async fn clear_history(&mut self) -> bool {
        match self.transport.clear_history().await {
            Ok(()) => {
                self.transcript.clear();
                true
            }
            Err(e) => {
                warn!(name: "chat.history.clear_failed", error = %e);
                self.transcript
                    .push_bot(format!("{TRANSPORT_ERROR_PREFIX}{e}"), &[]);
                false
            }
        }
    }
}
