//! File icon resolution.
//!
//! Local attachments resolve by extension first, then by MIME category, then
//! fall back to [`FileIcon::File`]. Filenames returned by the server carry no
//! MIME type and resolve by extension only, through a separate, smaller table.

/// Icon shown next to an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileIcon {
    Python,
    JavaScript,
    Java,
    Code,
    Csv,
    Excel,
    Image,
    Pdf,
    Word,
    Archive,
    Text,
    Video,
    Audio,
    /// Generic file.
    File,
}

impl FileIcon {
    /// Font Awesome classes for this icon.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Python => "fab fa-python",
            Self::JavaScript => "fab fa-js-square",
            Self::Java => "fab fa-java",
            Self::Code => "fas fa-file-code",
            Self::Csv => "fas fa-file-csv",
            Self::Excel => "fas fa-file-excel",
            Self::Image => "fas fa-image",
            Self::Pdf => "fas fa-file-pdf",
            Self::Word => "fas fa-file-word",
            Self::Archive => "fas fa-file-archive",
            Self::Text => "fas fa-file-alt",
            Self::Video => "fas fa-file-video",
            Self::Audio => "fas fa-file-audio",
            Self::File => "fas fa-file",
        }
    }

    /// Inline `<i>` element for HTML output.
    pub fn html(self) -> String {
        format!(r#"<i class="{}"></i>"#, self.css_class())
    }

    /// Short label for plain-text output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::Java => "java",
            Self::Code => "code",
            Self::Csv => "csv",
            Self::Excel => "excel",
            Self::Image => "image",
            Self::Pdf => "pdf",
            Self::Word => "word",
            Self::Archive => "archive",
            Self::Text => "text",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::File => "file",
        }
    }
}

/// Lower-cased text after the last `.` of `name`, or the whole name if it
/// has no dot.
pub fn extension_of(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_lowercase()
}

/// Extension table for local attachments.
pub fn icon_for_extension(ext: &str) -> Option<FileIcon> {
    match ext {
        "py" => Some(FileIcon::Python),
        "js" => Some(FileIcon::JavaScript),
        "java" => Some(FileIcon::Java),
        "cpp" => Some(FileIcon::Code),
        "csv" => Some(FileIcon::Csv),
        "xls" | "xlsx" => Some(FileIcon::Excel),
        _ => None,
    }
}

/// MIME-category table for local attachments.
///
/// `application/*` is narrowed by substring; any other application subtype
/// maps to the generic file icon rather than `None`.
pub fn icon_for_mime(mime_type: &str) -> Option<FileIcon> {
    let category = mime_type.split('/').next().unwrap_or_default();
    match category {
        "image" => Some(FileIcon::Image),
        "application" => Some(if mime_type.contains("pdf") {
            FileIcon::Pdf
        } else if mime_type.contains("word") || mime_type.contains("document") {
            FileIcon::Word
        } else if mime_type.contains("zip") || mime_type.contains("compressed") {
            FileIcon::Archive
        } else {
            FileIcon::File
        }),
        "text" => Some(FileIcon::Text),
        "video" => Some(FileIcon::Video),
        "audio" => Some(FileIcon::Audio),
        _ => None,
    }
}

/// Icon for a locally selected file: extension, then MIME category, then generic.
pub fn icon_for(name: &str, mime_type: &str) -> FileIcon {
    icon_for_extension(&extension_of(name))
        .or_else(|| icon_for_mime(mime_type))
        .unwrap_or(FileIcon::File)
}

/// Extensions the renderer treats as viewable images for server filenames.
pub const SERVER_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Icon for a filename returned by the server, by extension only.
pub fn icon_for_server_file(name: &str) -> FileIcon {
    let ext = extension_of(name);
    match ext.as_str() {
        e if SERVER_IMAGE_EXTENSIONS.contains(&e) => FileIcon::Image,
        "pdf" => FileIcon::Pdf,
        "doc" | "docx" => FileIcon::Word,
        _ => FileIcon::File,
    }
}
