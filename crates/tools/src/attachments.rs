//! Feed item attachments: upload sources, download rendering and image sniffing.

use crate::error::{Result, ToolError};
use base64::Engine as _;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::{DecodePaddingMode, general_purpose};
use rmcp::model::{Content, JsonObject};
use serde_json::Value;

/// Lenient decoder for uploads: padding optional, whitespace stripped before decoding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &base64::alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Default when the bytes do not match a known signature.
pub const FALLBACK_IMAGE_MIME: &str = "image/jpeg";

/// Guess an image MIME type from magic numbers.
///
/// Anything shorter than four bytes, or not recognised, is reported as JPEG.
#[must_use]
pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    if bytes.len() < 4 {
        return FALLBACK_IMAGE_MIME;
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "image/jpeg";
    }
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return "image/png";
    }
    if bytes.starts_with(b"GIF") {
        return "image/gif";
    }
    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        return "image/webp";
    }
    if bytes.starts_with(b"BM") {
        return "image/bmp";
    }
    if bytes.starts_with(&[0x49, 0x49, 0x2A, 0x00]) || bytes.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
    {
        return "image/tiff";
    }
    FALLBACK_IMAGE_MIME
}

/// Find an attachment's metadata in a `feedItemAttachments` listing.
#[must_use]
pub fn find_attachment<'a>(listing: &'a Value, attachment_uid: &str) -> Option<&'a Value> {
    listing
        .get("feedItemAttachments")
        .and_then(Value::as_array)?
        .iter()
        .find(|a| a.get("feedItemAttachmentUid").and_then(Value::as_str) == Some(attachment_uid))
}

fn is_image(meta: Option<&Value>) -> bool {
    let Some(meta) = meta else {
        return false;
    };
    let attachment_type = meta.get("attachmentType").and_then(Value::as_str);
    let item_type = meta.get("feedItemAttachmentType").and_then(Value::as_str);
    attachment_type == Some("image") || matches!(item_type, Some("IMAGE" | "IMAGE, PDF"))
}

/// Content items for a downloaded attachment.
///
/// Images become a single image item (MIME sniffed from the bytes); everything else is two
/// text items, the type line and the base64 data.
#[must_use]
pub fn download_contents(meta: Option<&Value>, bytes: &[u8]) -> Vec<Content> {
    let data = general_purpose::STANDARD.encode(bytes);
    if is_image(meta) {
        return vec![Content::image(data, detect_image_mime(bytes))];
    }
    let attachment_type = meta
        .and_then(|m| m.get("attachmentType"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("unknown");
    vec![
        Content::text(format!("Attachment type: {attachment_type}")),
        Content::text(data),
    ]
}

/// Bytes to upload: `filePath` wins over `attachmentData`.
///
/// # Errors
///
/// Returns an input error when neither source is given, the file cannot be read, or the base64
/// is malformed.
pub async fn upload_source(args: &JsonObject) -> Result<Vec<u8>> {
    let non_empty = |key: &str| {
        args.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };

    if let Some(path) = non_empty("filePath") {
        return tokio::fs::read(path).await.map_err(|e| {
            ToolError::Input(format!("Failed to read file from path \"{path}\": {e}"))
        });
    }
    if let Some(data) = non_empty("attachmentData") {
        let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        return LENIENT_BASE64.decode(compact).map_err(|e| {
            ToolError::Input(format!("Failed to decode base64 attachment data: {e}"))
        });
    }
    Err(ToolError::Input(
        "Either filePath or attachmentData must be provided".to_string(),
    ))
}
