//! Wire types for the chat endpoint.
//!
//! The server answers `POST /send_message` with a JSON object whose keys are
//! all optional. An in-band `error` key overrides everything else. Transport
//! failures never reach this module; [`SubmitOutcome`] joins both channels at
//! the submission boundary.

use serde::{Deserialize, Deserializer, Serialize};

use crate::attachments::PendingAttachment;

/// Text and files captured from the composer at submission time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Trimmed message text; may be empty when files are attached.
    pub text: String,
    pub attachments: Vec<PendingAttachment>,
}

impl OutgoingMessage {
    pub fn new(text: impl Into<String>, attachments: Vec<PendingAttachment>) -> Self {
        Self {
            text: text.into().trim().to_string(),
            attachments,
        }
    }

    /// A message with blank text and no files is never sent.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.attachments.is_empty()
    }
}

/// JSON body returned by the chat endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerReply {
    /// Application-level error; when present the rest is ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Assistant text.
    #[serde(default)]
    pub message: Option<String>,
    /// Server-relative filenames attached to the reply.
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<String>,
    /// Text extracted from each entry of `files`, same order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_contents: Vec<Option<String>>,
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A successful assistant reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotReply {
    pub message: String,
    pub files: Vec<String>,
    pub file_contents: Vec<Option<String>>,
}

impl BotReply {
    /// `(filename, content)` for every non-blank content entry.
    ///
    /// A content entry without a matching filename is reported as
    /// `"unknown file"`.
    pub fn extracted_contents(&self) -> impl Iterator<Item = (&str, &str)> {
        self.file_contents
            .iter()
            .enumerate()
            .filter_map(|(index, content)| {
                let content = content.as_deref()?;
                if content.trim().is_empty() {
                    return None;
                }
                let name = self.files.get(index).map_or("unknown file", String::as_str);
                Some((name, content))
            })
    }
}

/// Result of one submission, with both error channels folded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server answered normally.
    Reply(BotReply),
    /// The server answered with an `error` field.
    AppError(String),
    /// The request failed or the body was not a reply.
    TransportError(String),
}

impl From<ServerReply> for SubmitOutcome {
    fn from(reply: ServerReply) -> Self {
        // An empty `error` string means no error.
        match reply.error.filter(|e| !e.is_empty()) {
            Some(error) => Self::AppError(error),
            None => Self::Reply(BotReply {
                message: reply.message.unwrap_or_default(),
                files: reply.files,
                file_contents: reply.file_contents,
            }),
        }
    }
}

impl<E: std::fmt::Display> From<Result<ServerReply, E>> for SubmitOutcome {
    fn from(result: Result<ServerReply, E>) -> Self {
        match result {
            Ok(reply) => reply.into(),
            Err(e) => Self::TransportError(e.to_string()),
        }
    }
}

/// JSON body returned by the clear-history endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearHistoryReply {
    #[serde(default)]
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outgoing_message_trims_text() {
        let msg = OutgoingMessage::new("   \n\t ", vec![]);
        assert!(msg.is_empty());

        let msg = OutgoingMessage::new("  hi  ", vec![]);
        assert_eq!(msg.text, "hi");
        assert!(!msg.is_empty());
    }

    #[test]
    fn test_files_only_message_is_not_empty() {
        let file = PendingAttachment::from_bytes("a.txt", "text/plain", b"x".to_vec());
        assert!(!OutgoingMessage::new("", vec![file]).is_empty());
    }

    #[test]
    fn test_reply_defaults_missing_keys() {
        let reply: ServerReply = serde_json::from_str(r#"{"message":"ok"}"#).unwrap();
        assert_eq!(reply.message.as_deref(), Some("ok"));
        assert!(reply.files.is_empty());
        assert!(reply.file_contents.is_empty());
        assert!(reply.error.is_none());
    }

    #[test]
    fn test_error_overrides_everything() {
        let reply: ServerReply = serde_json::from_str(
            r#"{"error":"bad request","message":"ignored","files":["a.png"]}"#,
        )
        .unwrap();
        assert_eq!(
            SubmitOutcome::from(reply),
            SubmitOutcome::AppError("bad request".to_string())
        );
    }

    #[test]
    fn test_null_sequences_decode_as_empty() {
        let reply: ServerReply =
            serde_json::from_str(r#"{"message":"ok","files":null,"file_contents":null}"#).unwrap();
        assert!(reply.files.is_empty());
        assert!(reply.file_contents.is_empty());

        let reply: ServerReply =
            serde_json::from_str(r#"{"message":null,"files":["a.txt"],"file_contents":null}"#)
                .unwrap();
        let SubmitOutcome::Reply(bot) = SubmitOutcome::from(reply) else {
            panic!("expected a reply");
        };
        assert_eq!(bot.message, "");
        assert_eq!(bot.files, vec!["a.txt"]);
    }

    #[test]
    fn test_empty_error_is_not_an_error() {
        let reply: ServerReply =
            serde_json::from_str(r#"{"error":"","message":"ok","files":["a.png"]}"#).unwrap();
        let SubmitOutcome::Reply(bot) = SubmitOutcome::from(reply) else {
            panic!("expected a reply");
        };
        assert_eq!(bot.message, "ok");
        assert_eq!(bot.files, vec!["a.png"]);
    }

    #[test]
    fn test_null_file_contents_decode() {
        let reply: ServerReply =
            serde_json::from_str(r#"{"message":"ok","files":["a.png"],"file_contents":[null]}"#)
                .unwrap();
        let SubmitOutcome::Reply(bot) = SubmitOutcome::from(reply) else {
            panic!("expected a reply");
        };
        assert_eq!(bot.files, vec!["a.png"]);
        assert_eq!(bot.extracted_contents().count(), 0);
    }

    #[test]
    fn test_extracted_contents_skip_blank_and_pair_names() {
        let bot = BotReply {
            message: String::new(),
            files: vec!["a.txt".into(), "b.txt".into(), "c.txt".into()],
            file_contents: vec![Some("alpha".into()), Some("  ".into()), Some("gamma".into())],
        };
        let pairs: Vec<_> = bot.extracted_contents().collect();
        assert_eq!(pairs, vec![("a.txt", "alpha"), ("c.txt", "gamma")]);
    }

    #[test]
    fn test_content_without_filename() {
        let bot = BotReply {
            message: String::new(),
            files: vec![],
            file_contents: vec![Some("orphan".into())],
        };
        let pairs: Vec<_> = bot.extracted_contents().collect();
        assert_eq!(pairs, vec![("unknown file", "orphan")]);
    }

    #[test]
    fn test_transport_error_from_result() {
        let result: Result<ServerReply, String> = Err("connection refused".to_string());
        assert_eq!(
            SubmitOutcome::from(result),
            SubmitOutcome::TransportError("connection refused".to_string())
        );
    }
}
