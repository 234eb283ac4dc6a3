//! Pending attachments for the next outgoing message.
//!
//! The [`AttachmentManager`] owns the ordered list of files the user has
//! selected. Selecting files replaces the whole list; files leave the list
//! one at a time through [`AttachmentManager::remove_at`] or all at once when
//! a submission finishes.
//!
//! # Example
//!
//! ```rust
//! use chat_widget::attachments::{AttachmentManager, PendingAttachment};
//!
//! let mut manager = AttachmentManager::new();
//! manager.set_files(vec![
//!     PendingAttachment::from_bytes("notes.txt", "text/plain", b"hello".to_vec()),
//!     PendingAttachment::from_bytes("photo.png", "image/png", vec![0; 2048]),
//! ]);
//!
//! assert!(manager.remove_at(0));
//! assert_eq!(manager.previews()[0].size, "2 KB");
//! ```

mod icons;
mod size;

pub use icons::{
    FileIcon, SERVER_IMAGE_EXTENSIONS, extension_of, icon_for, icon_for_extension, icon_for_mime,
    icon_for_server_file,
};
pub use size::format_size;

use std::path::Path;

use html_escape::encode_text;

/// MIME type used when a path's extension is unknown.
const FALLBACK_MIME: &str = "application/octet-stream";

/// A locally selected file waiting to be sent.
#[derive(Clone, PartialEq, Eq)]
pub struct PendingAttachment {
    /// Original filename, sent as the multipart part's filename.
    pub name: String,
    /// MIME type as reported by the picker or guessed from the extension.
    pub mime_type: String,
    /// Size of `bytes`.
    pub size_bytes: u64,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for PendingAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingAttachment")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.size_bytes)
            .finish_non_exhaustive()
    }
}

impl PendingAttachment {
    /// Build an attachment from in-memory content.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes: bytes.len() as u64,
            bytes,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();
        let mime_type = mime_guess::from_path(path)
            .first()
            .map_or_else(|| FALLBACK_MIME.to_string(), |m| m.essence_str().to_string());

        Ok(Self::from_bytes(name, mime_type, bytes))
    }

    /// Whether the file should get an inline image preview.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// MIME type to declare on upload.
    ///
    /// Pickers report an empty type for files they don't recognise; those,
    /// and anything else that is not a valid MIME type, go out as
    /// `application/octet-stream`.
    pub fn upload_mime(&self) -> &str {
        if self.mime_type.parse::<mime_guess::Mime>().is_ok() {
            &self.mime_type
        } else {
            FALLBACK_MIME
        }
    }

    /// Icon for this file.
    pub fn icon(&self) -> FileIcon {
        icon_for(&self.name, &self.mime_type)
    }
}

/// One entry of the preview strip shown above the input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPreview {
    /// Position in the pending list, used for removal.
    pub index: usize,
    pub icon: FileIcon,
    pub name: String,
    /// Human-readable size, see [`format_size`].
    pub size: String,
}

/// Owner of the files selected for the next outgoing message.
#[derive(Debug, Default, Clone)]
pub struct AttachmentManager {
    files: Vec<PendingAttachment>,
}

impl AttachmentManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire pending list with a new selection.
    pub fn set_files(&mut self, selected: impl IntoIterator<Item = PendingAttachment>) {
        self.files = selected.into_iter().collect();
        tracing::debug!(
            name: "attachments.selected",
            count = self.files.len(),
            total_bytes = self.total_bytes(),
            "Attachment selection replaced"
        );
    }

    /// Remove the file at `index`. Out-of-range indexes are ignored.
    ///
    /// Returns `true` if a file was removed.
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.files.len() {
            return false;
        }
        let removed = self.files.remove(index);
        tracing::debug!(name: "attachments.removed", index, file = %removed.name, "Attachment removed");
        true
    }

    /// Drop every pending file.
    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn files(&self) -> &[PendingAttachment] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Combined size of all pending files.
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size_bytes).sum()
    }

    /// Preview entries in list order.
    pub fn previews(&self) -> Vec<AttachmentPreview> {
        self.files
            .iter()
            .enumerate()
            .map(|(index, file)| AttachmentPreview {
                index,
                icon: file.icon(),
                name: file.name.clone(),
                size: format_size(file.size_bytes),
            })
            .collect()
    }

    /// Markup for the preview strip.
    ///
    /// An empty list renders a hidden container so the strip collapses.
    pub fn render_previews_html(&self) -> String {
        if self.files.is_empty() {
            return r#"<div class="uploaded-files" style="display: none"></div>"#.to_string();
        }

        let chips: String = self
            .previews()
            .into_iter()
            .map(|p| {
                format!(
                    r#"<div class="file-preview"><span class="file-icon">{icon}</span><span class="file-name">{name}</span><span class="file-size">{size}</span><span class="remove-file" data-index="{index}" title="Remove"><i class="fas fa-times"></i></span></div>"#,
                    icon = p.icon.html(),
                    name = encode_text(&p.name),
                    size = p.size,
                    index = p.index,
                )
            })
            .collect();

        format!(r#"<div class="uploaded-files" style="display: flex">{chips}</div>"#)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file(name: &str) -> PendingAttachment {
        PendingAttachment::from_bytes(name, "text/plain", name.as_bytes().to_vec())
    }

    fn names(manager: &AttachmentManager) -> Vec<&str> {
        manager.files().iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_set_files_replaces_previous_selection() {
        let mut manager = AttachmentManager::new();
        manager.set_files(vec![file("a.txt"), file("b.txt")]);
        manager.set_files(vec![file("c.txt")]);
        assert_eq!(names(&manager), vec!["c.txt"]);
    }

    #[test]
    fn test_remove_at_preserves_order() {
        let mut manager = AttachmentManager::new();
        manager.set_files(vec![file("a"), file("b"), file("c"), file("d")]);

        assert!(manager.remove_at(1));
        assert_eq!(names(&manager), vec!["a", "c", "d"]);

        assert!(manager.remove_at(2));
        assert_eq!(names(&manager), vec!["a", "c"]);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut manager = AttachmentManager::new();
        manager.set_files(vec![file("a"), file("b")]);

        assert!(!manager.remove_at(2));
        assert!(!manager.remove_at(usize::MAX));
        assert_eq!(names(&manager), vec!["a", "b"]);

        let mut empty = AttachmentManager::new();
        assert!(!empty.remove_at(0));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_previews_carry_icon_and_size() {
        let mut manager = AttachmentManager::new();
        manager.set_files(vec![
            PendingAttachment::from_bytes("script.py", "text/x-python", vec![0; 10]),
            PendingAttachment::from_bytes("scan.pdf", "application/pdf", vec![0; 1536]),
        ]);

        let previews = manager.previews();
        assert_eq!(previews.len(), 2);
        assert_eq!(previews[0].icon, FileIcon::Python);
        assert_eq!(previews[0].size, "10 Bytes");
        assert_eq!(previews[1].index, 1);
        assert_eq!(previews[1].icon, FileIcon::Pdf);
        assert_eq!(previews[1].size, "1.5 KB");
        assert_eq!(manager.total_bytes(), 1546);
    }

    #[test]
    fn test_preview_html_hidden_when_empty() {
        let manager = AttachmentManager::new();
        assert!(manager.render_previews_html().contains("display: none"));
    }

    #[test]
    fn test_preview_html_escapes_names() {
        let mut manager = AttachmentManager::new();
        manager.set_files(vec![file("<b>.txt")]);

        let html = manager.render_previews_html();
        assert!(html.contains("display: flex"));
        assert!(html.contains("&lt;b&gt;.txt"));
        assert!(html.contains(r#"data-index="0""#));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_upload_mime_falls_back_for_empty_or_invalid_types() {
        let makefile = PendingAttachment::from_bytes("Makefile", "", b"all:".to_vec());
        assert_eq!(makefile.upload_mime(), FALLBACK_MIME);
        assert_eq!(makefile.icon(), FileIcon::File);

        let garbled = PendingAttachment::from_bytes("a.bin", "not a mime", vec![1]);
        assert_eq!(garbled.upload_mime(), FALLBACK_MIME);

        let pdf = PendingAttachment::from_bytes("a.pdf", "application/pdf", vec![1]);
        assert_eq!(pdf.upload_mime(), "application/pdf");
    }

    #[tokio::test]
    async fn test_from_path_guesses_mime() {
        let mut temp_file = NamedTempFile::with_suffix(".png").unwrap();
        temp_file.write_all(&[0x89, b'P', b'N', b'G']).unwrap();

        let attachment = PendingAttachment::from_path(temp_file.path()).await.unwrap();
        assert_eq!(attachment.mime_type, "image/png");
        assert_eq!(attachment.size_bytes, 4);
        assert!(attachment.is_image());
        assert!(attachment.name.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_from_path_unknown_extension() {
        let mut temp_file = NamedTempFile::with_suffix(".zzunknown").unwrap();
        writeln!(temp_file, "data").unwrap();

        let attachment = PendingAttachment::from_path(temp_file.path()).await.unwrap();
        assert_eq!(attachment.mime_type, FALLBACK_MIME);
        assert_eq!(attachment.icon(), FileIcon::File);
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let result = PendingAttachment::from_path("/definitely/not/here.txt").await;
        assert!(matches!(result, Err(crate::WidgetError::Io(_))));
    }
}
