//! Capability bridge port: the host services the session depends on.
//!
//! The host captures screen images, deletes them, and talks to the
//! text-generation backend. The core only sees this contract, so tests can
//! substitute the in-memory adapter.

use crate::session::{domain::AttachmentId, error::BridgeError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Reason used when the backend fails without describing why.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Port for host capabilities.
///
/// # Implementation Notes
///
/// - `trigger_capture` settles without a payload; the captured image is
///   delivered later through a [`CaptureFeed`](super::CaptureFeed).
/// - Timeouts for `dispatch_prompt` belong to the implementation.
/// - `open_settings` and `notify_layout_change` are fire-and-forget.
#[async_trait]
pub trait CapabilityBridge: Send + Sync {
    /// Asks the host to capture a screenshot.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] when the host cannot start a capture.
    async fn trigger_capture(&self) -> BridgeResult<()>;

    /// Asks the host to delete a captured image.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] when the host could not confirm deletion.
    async fn delete_attachment(&self, id: &AttachmentId) -> BridgeResult<()>;

    /// Sends a prompt with attachment identifiers to the backend.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] when the host raises a fault instead of
    /// producing a structured response.
    async fn dispatch_prompt(
        &self,
        text: &str,
        attachment_ids: &[AttachmentId],
    ) -> BridgeResult<DispatchResponse>;

    /// Opens the host settings surface.
    fn open_settings(&self);

    /// Reports the rendered content size to the host shell.
    ///
    /// Called by the presentation layer; the session core never calls it.
    fn notify_layout_change(&self, size: LayoutSize);
}

/// Structured backend response as produced by the host.
///
/// Mirrors the host JSON shape
/// `{ "success": bool, "data"?: string, "error"?: string }`.
///
/// # Examples
///
/// ```
/// use hoverchat::session::ports::DispatchResponse;
///
/// let response = DispatchResponse::from_json(r#"{"success":true,"data":"hi"}"#)
///     .expect("valid json");
/// assert_eq!(response.into_outcome(), Ok("hi".to_owned()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchResponse {
    /// Whether the backend produced a reply.
    pub success: bool,
    /// The reply text on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// The failure description otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DispatchResponse {
    /// Creates a successful response.
    #[must_use]
    pub fn success(data: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            error: None,
        }
    }

    /// Creates a failed response.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Parses the host JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the payload is malformed.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Converts the response into reply text or a failure reason.
    ///
    /// A success without reply text counts as a failure, as does a failure
    /// without a description; both use [`UNKNOWN_ERROR`].
    ///
    /// # Errors
    ///
    /// Returns the failure reason when the backend produced no reply.
    pub fn into_outcome(self) -> Result<String, String> {
        match self.data {
            Some(data) if self.success && !data.is_empty() => Ok(data),
            _ => Err(self
                .error
                .filter(|error| !error.is_empty())
                .unwrap_or_else(|| UNKNOWN_ERROR.to_owned())),
        }
    }
}

/// Rendered content dimensions in host pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutSize {
    /// Content width.
    pub width: u32,
    /// Content height.
    pub height: u32,
}

impl LayoutSize {
    /// Creates a size from its dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
