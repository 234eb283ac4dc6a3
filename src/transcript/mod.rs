//! Append-only message log.
//!
//! The [`Transcript`] is what the user sees: one [`DisplayedMessage`] per
//! bubble, in the order they were appended. Messages are never edited after
//! they are pushed, with one exception: the inline preview of a local image
//! attachment moves from [`ImagePreview::Pending`] to its final state when
//! the matching [`PreviewResult`] is applied.
//!
//! # Example
//!
//! ```rust
//! use chat_widget::transcript::{Sender, Transcript};
//!
//! let mut transcript = Transcript::new("/uploads/");
//! transcript.push_bot("Here is your chart", &["chart.png".to_string()]);
//!
//! let message = &transcript.messages()[0];
//! assert_eq!(message.sender, Sender::Bot);
//! assert!(transcript.render_html().contains(r#"src="/uploads/chart.png""#));
//! ```

mod html;
mod preview;

pub use preview::{ImagePreview, PreviewJob, PreviewKey, PreviewResult, decode_all};

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attachments::{
    FileIcon, PendingAttachment, SERVER_IMAGE_EXTENSIONS, extension_of, format_size,
    icon_for_server_file,
};

/// Unique id of a displayed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Which side of the conversation a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// CSS class used on the message bubble.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

/// Metadata of a local file shown in a user bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}

/// A file reference rendered inside a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageFile {
    /// A file the user attached, previewed client-side.
    Local {
        file: LocalFile,
        icon: FileIcon,
        preview: ImagePreview,
    },
    /// A filename returned by the server.
    Remote {
        name: String,
        icon: FileIcon,
        /// Viewable URL when the extension is a known image type.
        image_url: Option<String>,
    },
}

impl MessageFile {
    pub fn name(&self) -> &str {
        match self {
            Self::Local { file, .. } => &file.name,
            Self::Remote { name, .. } => name,
        }
    }

    pub fn icon(&self) -> FileIcon {
        match self {
            Self::Local { icon, .. } | Self::Remote { icon, .. } => *icon,
        }
    }

    /// Whether the file renders with an inline image.
    pub fn has_inline_image(&self) -> bool {
        match self {
            Self::Local { preview, .. } => matches!(preview, ImagePreview::Ready(_)),
            Self::Remote { image_url, .. } => image_url.is_some(),
        }
    }
}

/// One bubble in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedMessage {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    pub files: Vec<MessageFile>,
    pub sent_at: DateTime<Utc>,
}

impl fmt::Display for DisplayedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "[{} {}] {}",
            self.sender.as_str(),
            self.sent_at.format("%H:%M:%S"),
            self.text
        )?;
        for file in &self.files {
            write!(f, "  [{}] {}", file.icon().label(), file.name())?;
            match file {
                MessageFile::Local { file, preview, .. } => {
                    write!(f, " ({})", format_size(file.size_bytes))?;
                    if let ImagePreview::Failed(reason) = preview {
                        write!(f, " preview failed: {reason}")?;
                    }
                }
                MessageFile::Remote {
                    image_url: Some(url),
                    ..
                } => write!(f, " -> {url}")?,
                MessageFile::Remote { .. } => {}
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Append-only log of displayed messages.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<DisplayedMessage>,
    uploads_prefix: String,
}

impl Transcript {
    /// Create an empty log resolving server images under `uploads_prefix`.
    pub fn new(uploads_prefix: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            uploads_prefix: uploads_prefix.into(),
        }
    }

    pub fn messages(&self) -> &[DisplayedMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, id: MessageId) -> Option<&DisplayedMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Viewable URL of a server-side file.
    pub fn upload_url(&self, name: &str) -> String {
        format!("{}{name}", self.uploads_prefix)
    }

    /// Append a user bubble for locally attached files.
    ///
    /// Returns the new message id and one decode job per image attachment.
    pub fn push_user(
        &mut self,
        text: impl Into<String>,
        attachments: &[PendingAttachment],
    ) -> (MessageId, Vec<PreviewJob>) {
        let id = MessageId::new();
        let mut jobs = Vec::new();

        let files = attachments
            .iter()
            .enumerate()
            .map(|(index, attachment)| {
                let (icon, preview) = if attachment.is_image() {
                    jobs.push(PreviewJob::new(
                        PreviewKey { message: id, index },
                        attachment.mime_type.clone(),
                        attachment.bytes.clone(),
                    ));
                    (FileIcon::Image, ImagePreview::Pending)
                } else {
                    (attachment.icon(), ImagePreview::None)
                };
                MessageFile::Local {
                    file: LocalFile {
                        name: attachment.name.clone(),
                        mime_type: attachment.mime_type.clone(),
                        size_bytes: attachment.size_bytes,
                    },
                    icon,
                    preview,
                }
            })
            .collect();

        self.push(id, Sender::User, text.into(), files);
        (id, jobs)
    }

    /// Append a bot bubble referencing server-side filenames.
    pub fn push_bot(&mut self, text: impl Into<String>, files: &[String]) -> MessageId {
        let id = MessageId::new();
        let files = files
            .iter()
            .map(|name| {
                let is_image = SERVER_IMAGE_EXTENSIONS.contains(&extension_of(name).as_str());
                MessageFile::Remote {
                    name: name.clone(),
                    icon: icon_for_server_file(name),
                    image_url: is_image.then(|| self.upload_url(name)),
                }
            })
            .collect();

        self.push(id, Sender::Bot, text.into(), files);
        id
    }

    fn push(&mut self, id: MessageId, sender: Sender, text: String, files: Vec<MessageFile>) {
        tracing::debug!(
            name: "transcript.appended",
            message_id = %id,
            sender = sender.as_str(),
            files = files.len(),
        );
        self.messages.push(DisplayedMessage {
            id,
            sender,
            text,
            files,
            sent_at: Utc::now(),
        });
    }

    /// Apply a finished decode to the attachment it was created for.
    ///
    /// Returns `false` if the message is gone (history cleared) or the
    /// attachment is not awaiting a preview.
    pub fn resolve_preview(&mut self, result: PreviewResult) -> bool {
        let PreviewKey { message, index } = result.key;
        let Some(file) = self
            .messages
            .iter_mut()
            .find(|m| m.id == message)
            .and_then(|m| m.files.get_mut(index))
        else {
            return false;
        };

        let MessageFile::Local { preview, file, .. } = file else {
            return false;
        };
        if *preview != ImagePreview::Pending {
            return false;
        }

        *preview = match result.data_url {
            Ok(url) => ImagePreview::Ready(url),
            Err(e) => {
                tracing::warn!(name: "transcript.preview.failed", file = %file.name, error = %e);
                ImagePreview::Failed(e.to_string())
            }
        };
        true
    }

    /// Remove every message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Markup for the whole log.
    pub fn render_html(&self) -> String {
        self.messages.iter().map(html::render_message).collect()
    }

    /// Plain-text rendering of the whole log.
    pub fn render_text(&self) -> String {
        self.messages.iter().map(ToString::to_string).collect()
    }
}
