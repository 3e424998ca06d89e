//! Capture-completion event port.
//!
//! The host announces finished captures asynchronously. Interested parties
//! register a handler with [`CaptureFeed::subscribe`] and keep the returned
//! [`Subscription`] for as long as they want events.

use crate::session::{
    domain::{Attachment, AttachmentId, PreviewData},
    error::AttachmentError,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Payload delivered when a capture settles.
///
/// A successful capture carries both fields; a payload missing either one
/// (or carrying an empty value) signals a failed capture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureEvent {
    /// Host identifier of the captured image.
    #[serde(default, alias = "path")]
    pub id: Option<String>,
    /// Encoded preview of the captured image.
    #[serde(default)]
    pub preview: Option<String>,
}

impl CaptureEvent {
    /// Creates a successful capture payload.
    #[must_use]
    pub fn captured(id: impl Into<String>, preview: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            preview: Some(preview.into()),
        }
    }

    /// Creates a payload signalling a failed capture.
    #[must_use]
    pub fn failed() -> Self {
        Self::default()
    }

    /// Converts the payload into an attachment.
    ///
    /// # Errors
    ///
    /// Returns [`AttachmentError::CaptureFailed`] when the id or preview is
    /// missing or empty.
    pub fn into_attachment(self) -> Result<Attachment, AttachmentError> {
        match (self.id, self.preview) {
            (Some(id), Some(preview)) if !id.is_empty() && !preview.is_empty() => Ok(
                Attachment::new(AttachmentId::new(id), PreviewData::new(preview)),
            ),
            _ => Err(AttachmentError::CaptureFailed),
        }
    }
}

/// Callback invoked for every capture event.
pub type CaptureHandler = Arc<dyn Fn(CaptureEvent) + Send + Sync>;

/// Port for subscribing to capture-completion events.
pub trait CaptureFeed: Send + Sync {
    /// Registers `handler` until the returned subscription is cancelled.
    fn subscribe(&self, handler: CaptureHandler) -> Subscription;
}

/// Handle to a registered capture handler.
///
/// Call [`Subscription::cancel`] on teardown. Dropping the handle cancels it
/// as well.
#[must_use = "dropping a subscription cancels it immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Creates a subscription that runs `release` once when cancelled.
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Releases the registration.
    pub fn cancel(mut self) {
        self.release_now();
    }

    /// Returns `true` until the subscription is cancelled.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.release.is_some()
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
