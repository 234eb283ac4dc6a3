//! Network seam between the widget and the chat server.
//!
//! [`ChatTransport`] is the only place the widget suspends on the network.
//! [`HttpTransport`] is the production implementation; tests substitute a
//! scripted double.

use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    config::WidgetConfig,
    error::{Result, WidgetError},
    protocol::{ClearHistoryReply, OutgoingMessage, ServerReply},
};

/// Sends messages to the chat server.
#[async_trait]
pub trait ChatTransport: Send + Sync + Debug {
    /// Post one message and decode the JSON reply.
    ///
    /// The reply is decoded whatever the HTTP status; a body that is not a
    /// reply object is an error.
    async fn send_message(&self, message: &OutgoingMessage) -> Result<ServerReply>;

    /// Ask the server to forget the conversation.
    async fn clear_history(&self) -> Result<()>;
}

/// HTTP transport posting multipart forms with reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    send_url: Url,
    clear_url: Url,
}

impl HttpTransport {
    /// Create a transport from the widget configuration.
    pub fn new(config: &WidgetConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Self::with_client(config, http)
    }

    /// Create a transport with a custom reqwest client.
    pub fn with_client(config: &WidgetConfig, http: reqwest::Client) -> Result<Self> {
        let base_url = config.base_url()?;
        Ok(Self {
            http,
            send_url: base_url.join(&config.server.send_path)?,
            clear_url: base_url.join(&config.server.clear_history_path)?,
        })
    }

    pub fn send_url(&self) -> &Url {
        &self.send_url
    }

    /// Multipart body: one `message` text field, then one `files` part per
    /// attachment carrying its original filename and MIME type (see
    /// [`PendingAttachment::upload_mime`](crate::attachments::PendingAttachment::upload_mime)).
    pub fn build_form(message: &OutgoingMessage) -> Result<Form> {
        let mut form = Form::new().text("message", message.text.clone());
        for attachment in &message.attachments {
            let part = Part::bytes(attachment.bytes.clone())
                .file_name(attachment.name.clone())
                .mime_str(attachment.upload_mime())?;
            form = form.part("files", part);
        }
        Ok(form)
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send_message(&self, message: &OutgoingMessage) -> Result<ServerReply> {
        let form = Self::build_form(message)?;

        info!(
            name: "chat.request.sent",
            url = %self.send_url,
            files = message.attachments.len(),
            text_len = message.text.len(),
            "Sending chat message"
        );

        let response = self
            .http
            .post(self.send_url.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            debug!(name: "chat.response.received", status = status.as_u16(), bytes = body.len());
        } else {
            // The body may still carry an in-band `error`; decode it anyway.
            warn!(
                name: "chat.response.received",
                status = status.as_u16(),
                bytes = body.len(),
                "Chat server answered with a non-success status"
            );
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn clear_history(&self) -> Result<()> {
        let response = self.http.post(self.clear_url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            return Err(WidgetError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: ClearHistoryReply = response.json().await?;
        if reply.success {
            info!(name: "chat.history.cleared", "Server history cleared");
            Ok(())
        } else {
            Err(WidgetError::Api {
                status: status.as_u16(),
                message: "server did not confirm history reset".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_join_configured_paths() {
        let mut config = WidgetConfig::default();
        config.server.base_url = "http://chat.local:8080".to_string();
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(
            transport.send_url().as_str(),
            "http://chat.local:8080/send_message"
        );
        assert_eq!(
            transport.clear_url.as_str(),
            "http://chat.local:8080/clear_history"
        );
    }

    #[test]
    fn test_untyped_attachment_still_builds_form() {
        let message = OutgoingMessage::new(
            "hi",
            vec![
                crate::attachments::PendingAttachment::from_bytes("Makefile", "", b"all:".to_vec()),
                crate::attachments::PendingAttachment::from_bytes(
                    "a.bin",
                    "not a mime",
                    vec![1, 2, 3],
                ),
            ],
        );
        assert!(HttpTransport::build_form(&message).is_ok());
    }

    #[test]
    fn test_form_has_boundary() {
        let message = OutgoingMessage::new("hello", vec![]);
        let form = HttpTransport::build_form(&message).unwrap();
        assert!(!form.boundary().is_empty());
    }
}
