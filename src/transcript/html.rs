//! HTML markup for message bubbles.

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::{DisplayedMessage, ImagePreview, MessageFile};

pub(super) fn render_message(message: &DisplayedMessage) -> String {
    let text = encode_text(&message.text).replace('\n', "<br>");

    let files = if message.files.is_empty() {
        String::new()
    } else {
        let items: String = message.files.iter().map(render_file).collect();
        format!(r#"<div class="message-files">{items}</div>"#)
    };

    format!(
        r#"<div class="message {sender}" data-message-id="{id}"><div class="message-content">{text}</div>{files}</div>"#,
        sender = message.sender.as_str(),
        id = message.id,
    )
}

fn render_file(file: &MessageFile) -> String {
    let preview = match file {
        MessageFile::Local {
            preview: ImagePreview::Ready(url),
            file,
            ..
        } => format!(
            r#"<img src="{}" alt="{}">"#,
            encode_double_quoted_attribute(url),
            encode_double_quoted_attribute(&file.name)
        ),
        MessageFile::Local {
            preview: ImagePreview::Pending,
            ..
        } => r#"<span class="file-preview-pending"></span>"#.to_string(),
        MessageFile::Remote {
            image_url: Some(url),
            ..
        } => format!(
            r#"<img src="{}" alt="Image" loading="lazy">"#,
            encode_double_quoted_attribute(url)
        ),
        _ => String::new(),
    };

    format!(
        r#"<div class="message-file"><span class="file-icon">{icon}</span><span class="file-name">{name}</span>{preview}</div>"#,
        icon = file.icon().html(),
        name = encode_text(file.name()),
    )
}
