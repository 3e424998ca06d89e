//! Session configuration.

use super::domain::MAX_ATTACHMENTS;
use serde::{Deserialize, Serialize};

/// When pending attachments are released after a send.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentClearPolicy {
    /// Release the sent attachments as soon as a send is accepted, before
    /// the backend answers.
    ///
    /// A failed dispatch loses the attachments; the user has to capture
    /// them again.
    #[default]
    OnDispatch,
    /// Release the sent attachments only after the backend succeeds.
    OnSuccess,
}

/// Tunables for a chat session.
///
/// # Examples
///
/// ```
/// use hoverchat::session::config::{AttachmentClearPolicy, SessionConfig};
///
/// let config = SessionConfig::default();
/// assert_eq!(config.attachment_capacity, 5);
/// assert_eq!(config.clear_policy, AttachmentClearPolicy::OnDispatch);
///
/// let clamped = SessionConfig::default().with_attachment_capacity(9);
/// assert_eq!(clamped.attachment_capacity, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum pending attachments; never above [`MAX_ATTACHMENTS`].
    pub attachment_capacity: usize,
    /// When pending attachments are released after a send.
    pub clear_policy: AttachmentClearPolicy,
    /// Prefix of the assistant message recorded for a failed dispatch.
    pub error_prefix: String,
    /// Language reported for code blocks without a tag.
    pub fallback_language: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            attachment_capacity: MAX_ATTACHMENTS,
            clear_policy: AttachmentClearPolicy::default(),
            error_prefix: "Error: ".to_owned(),
            fallback_language: "plaintext".to_owned(),
        }
    }
}

impl SessionConfig {
    /// Sets the attachment capacity, clamped to [`MAX_ATTACHMENTS`].
    #[must_use]
    pub fn with_attachment_capacity(mut self, capacity: usize) -> Self {
        self.attachment_capacity = capacity.min(MAX_ATTACHMENTS);
        self
    }

    /// Sets the attachment clear policy.
    #[must_use]
    pub const fn with_clear_policy(mut self, policy: AttachmentClearPolicy) -> Self {
        self.clear_policy = policy;
        self
    }

    /// Sets the prefix used for failed-dispatch messages.
    #[must_use]
    pub fn with_error_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.error_prefix = prefix.into();
        self
    }

    /// Sets the language reported for untagged code blocks.
    #[must_use]
    pub fn with_fallback_language(mut self, language: impl Into<String>) -> Self {
        self.fallback_language = language.into();
        self
    }

    /// Parses a configuration from JSON, filling gaps with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the payload is malformed.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let parsed: Self = serde_json::from_str(raw)?;
        let capacity = parsed.attachment_capacity;
        Ok(parsed.with_attachment_capacity(capacity))
    }
}
