//! Captured image attachments awaiting submission.

use super::AttachmentId;
use serde::{Deserialize, Serialize};

/// Encoded preview of a captured image, typically a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreviewData(String);

impl PreviewData {
    /// Wraps an encoded preview.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the encoded preview.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if no preview bytes are present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An image reference eligible to be sent with a prompt.
///
/// Identity is the [`AttachmentId`]; the preview is carried along so the
/// renderer can show thumbnails for pending and sent attachments.
///
/// # Examples
///
/// ```
/// use hoverchat::session::domain::{Attachment, AttachmentId, PreviewData};
///
/// let attachment = Attachment::new(
///     AttachmentId::new("/tmp/shot-1.png"),
///     PreviewData::new("data:image/png;base64,AAAA"),
/// );
/// assert_eq!(attachment.id().as_str(), "/tmp/shot-1.png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    id: AttachmentId,
    preview: PreviewData,
}

impl Attachment {
    /// Creates an attachment from its identifier and preview.
    #[must_use]
    pub const fn new(id: AttachmentId, preview: PreviewData) -> Self {
        Self { id, preview }
    }

    /// Returns the attachment identifier.
    #[must_use]
    pub const fn id(&self) -> &AttachmentId {
        &self.id
    }

    /// Returns the encoded preview.
    #[must_use]
    pub const fn preview(&self) -> &PreviewData {
        &self.preview
    }
}
