//! Inline image previews for locally attached files.
//!
//! Each image attachment of a user message yields a [`PreviewJob`] keyed by
//! message id and attachment index. Decoding produces a `data:` URL; the
//! transcript applies the result to exactly that key, so late or reordered
//! completions can never land on the wrong bubble.

use base64::Engine;
use futures::future::join_all;

use super::MessageId;
use crate::error::{Result, WidgetError};

/// Identity of one attachment inside one displayed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewKey {
    pub message: MessageId,
    pub index: usize,
}

/// State of an inline preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePreview {
    /// The file is not an image.
    None,
    /// Decode requested, not yet applied.
    Pending,
    /// `data:` URL ready for an `<img>`.
    Ready(String),
    Failed(String),
}

/// Pending decode of one image attachment.
#[derive(Clone)]
pub struct PreviewJob {
    pub key: PreviewKey,
    mime_type: String,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for PreviewJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewJob")
            .field("key", &self.key)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Completed decode, ready for [`super::Transcript::resolve_preview`].
#[derive(Debug)]
pub struct PreviewResult {
    pub key: PreviewKey,
    pub data_url: Result<String>,
}

impl PreviewJob {
    pub(crate) fn new(key: PreviewKey, mime_type: String, bytes: Vec<u8>) -> Self {
        Self {
            key,
            mime_type,
            bytes,
        }
    }

    /// Encode the image as a `data:` URL off the async executor.
    pub async fn decode(self) -> PreviewResult {
        let key = self.key;
        let data_url = if self.bytes.is_empty() {
            Err(WidgetError::Preview("image is empty".to_string()))
        } else {
            let mime_type = self.mime_type;
            let bytes = self.bytes;
            tokio::task::spawn_blocking(move || {
                let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
                format!("data:{mime_type};base64,{encoded}")
            })
            .await
            .map_err(|e| WidgetError::Preview(e.to_string()))
        };
        PreviewResult { key, data_url }
    }
}

/// Decode every job concurrently; results come back in job order.
pub async fn decode_all(jobs: Vec<PreviewJob>) -> Vec<PreviewResult> {
    join_all(jobs.into_iter().map(PreviewJob::decode)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(index: usize) -> PreviewKey {
        PreviewKey {
            message: MessageId::new(),
            index,
        }
    }

    #[tokio::test]
    async fn test_decode_produces_data_url() {
        let job = PreviewJob::new(key(0), "image/png".to_string(), b"abc".to_vec());
        let result = job.decode().await;
        assert_eq!(result.data_url.unwrap(), "data:image/png;base64,YWJj");
    }

    #[tokio::test]
    async fn test_empty_image_fails() {
        let job = PreviewJob::new(key(0), "image/gif".to_string(), Vec::new());
        let result = job.decode().await;
        assert!(matches!(result.data_url, Err(WidgetError::Preview(_))));
    }

    #[tokio::test]
    async fn test_decode_all_keeps_job_order() {
        let jobs: Vec<_> = (0..5)
            .map(|i| PreviewJob::new(key(i), "image/png".to_string(), vec![0; 1 + i * 4096]))
            .collect();
        let expected: Vec<_> = jobs.iter().map(|j| j.key).collect();

        let results = decode_all(jobs).await;
        let keys: Vec<_> = results.iter().map(|r| r.key).collect();
        assert_eq!(keys, expected);
    }
}
