//! Error types for the chat session core.
//!
//! Uses `thiserror` for typed variants that callers can match on. Every
//! failure here is recoverable: none of them leaves the session stuck in
//! [`SessionState::Sending`](super::domain::SessionState::Sending) or
//! breaks the conversation log or attachment store invariants.

use super::domain::AttachmentId;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while managing pending attachments.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttachmentError {
    /// The store already holds its maximum number of attachments.
    #[error("attachment store is full ({capacity} attachments)")]
    CapacityExceeded {
        /// The capacity that was reached.
        capacity: usize,
    },

    /// An attachment with the same identifier is already pending.
    #[error("attachment {0} is already pending")]
    DuplicateAttachment(AttachmentId),

    /// No pending attachment has the requested identifier.
    #[error("attachment {0} not found")]
    NotFound(AttachmentId),

    /// The host capture did not produce both an identifier and a preview.
    #[error("screenshot capture failed")]
    CaptureFailed,

    /// The host could not start a capture.
    #[error("failed to take screenshot: {0}")]
    TriggerFailed(String),

    /// The host refused to delete the attachment; the entry stays pending.
    #[error("failed to delete attachment {id}: {reason}")]
    DeleteFailed {
        /// The attachment that was kept.
        id: AttachmentId,
        /// The host's description of the failure.
        reason: String,
    },
}

/// Errors signalled by a send request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SendError {
    /// Neither prompt text nor attachments were supplied.
    #[error("nothing to send: prompt is empty and no attachments are pending")]
    EmptyRequest,

    /// Another send has not settled yet.
    #[error("a request is already in flight")]
    AlreadyInFlight,

    /// The backend reported a failure or the bridge raised a fault.
    #[error("dispatch failed: {0}")]
    DispatchFailure(String),
}

/// Errors produced by the pure session state machine.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// A send was requested without content.
    #[error("send request carries no content")]
    EmptyRequest,

    /// A send was requested while another is in flight.
    #[error("session is busy sending")]
    AlreadyInFlight,

    /// A dispatch outcome arrived while no send was in flight.
    #[error("no request is in flight")]
    NotInFlight,
}

impl From<TransitionError> for SendError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::EmptyRequest => Self::EmptyRequest,
            TransitionError::AlreadyInFlight => Self::AlreadyInFlight,
            TransitionError::NotInFlight => Self::DispatchFailure(err.to_string()),
        }
    }
}

/// Faults raised by capability bridge adapters.
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    /// The host raised a fault with a human-readable message.
    #[error("{0}")]
    Fault(String),

    /// The host transport is unavailable.
    #[error("capability bridge unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl BridgeError {
    /// Creates a fault carrying the host's message.
    #[must_use]
    pub fn fault(message: impl Into<String>) -> Self {
        Self::Fault(message.into())
    }

    /// Wraps a transport error from the host adapter.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}

/// Error returned while parsing a message sender from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown message sender: {0}")]
pub struct ParseSenderError(pub String);
