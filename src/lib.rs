//! Chat Widget
//!
//! Client side of an attachment-aware chat: collect text and files, preview
//! them, post them to the chat server as a multipart form, and render the
//! reply (including server-side files and any text extracted from them) into
//! an append-only log.
//!
//! # Architecture
//!
//! - **Attachment Manager**: ordered list of files selected for the next message
//! - **Submitter**: validates, sends one request, renders the outcome, resets
//! - **Renderer**: append-only transcript with inline image previews
//!
//! # Modules
//!
//! - [`attachments`]: pending files, icon lookup, size formatting
//! - [`protocol`]: wire types and the unified [`protocol::SubmitOutcome`]
//! - [`transport`]: the [`transport::ChatTransport`] seam and its HTTP implementation
//! - [`transcript`]: displayed messages and preview decoding
//! - [`widget`]: the [`ChatWidget`] tying it all together
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use chat_widget::{ChatWidget, HttpTransport, WidgetConfig};
//! use chat_widget::attachments::PendingAttachment;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WidgetConfig::default();
//! let transport = Arc::new(HttpTransport::new(&config)?);
//! let mut widget = ChatWidget::new(&config, transport);
//!
//! widget.select_files(vec![PendingAttachment::from_path("notes.pdf").await?]);
//! widget.set_text("Summarize this, please");
//! widget.submit().await;
//!
//! print!("{}", widget.transcript().render_text());
//! # Ok(())
//! # }
//! ```

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]

pub mod attachments;
pub mod config;
pub mod error;
pub mod protocol;
pub mod transcript;
pub mod transport;
pub mod widget;

pub use config::WidgetConfig;
pub use error::{Result, WidgetError};
pub use transport::{ChatTransport, HttpTransport};
pub use widget::{ChatWidget, SubmitReport, SubmitState};
