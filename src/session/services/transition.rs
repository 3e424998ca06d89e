//! Pure state transitions for the send lifecycle.
//!
//! Given the current state and an event, [`transition`] returns the next
//! state plus the effects the caller must perform. It performs no I/O.

use crate::session::{
    config::SessionConfig,
    domain::{Attachment, AttachmentId, Message, Sender, SessionState},
    error::TransitionError,
    ports::Notification,
};
use chrono::{DateTime, Utc};

/// Inputs to the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The user asked to send a prompt with an attachment snapshot.
    SendRequested {
        /// Raw prompt text; trimmed before use.
        prompt: String,
        /// Attachments captured at dispatch time.
        attachments: Vec<Attachment>,
        /// When the request was made.
        at: DateTime<Utc>,
    },
    /// The backend settled the in-flight send.
    DispatchSettled {
        /// Reply text, or the failure description.
        outcome: Result<String, String>,
        /// When the outcome arrived.
        at: DateTime<Utc>,
    },
}

/// Prompt and attachment identifiers to hand to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    /// Trimmed prompt text.
    pub prompt: String,
    /// Identifiers of the snapshotted attachments, in order.
    pub attachment_ids: Vec<AttachmentId>,
}

/// Work requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a message to the conversation log.
    AppendMessage(Message),
    /// Send the request to the backend and feed the outcome back.
    Dispatch(DispatchRequest),
    /// Show a notification.
    Notify(Notification),
}

/// Next state plus the effects to perform, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// State after the event.
    pub new_state: SessionState,
    /// Effects to run.
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    /// Creates a result with no effects.
    #[must_use]
    pub const fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: Vec::new(),
        }
    }

    /// Adds an effect.
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Applies `event` to `state`.
///
/// # Errors
///
/// - [`TransitionError::AlreadyInFlight`] for a send while sending.
/// - [`TransitionError::EmptyRequest`] for a send with blank text and no
///   attachments.
/// - [`TransitionError::NotInFlight`] for an outcome while idle.
///
/// A rejected event requests no effects.
pub fn transition(
    state: SessionState,
    event: SessionEvent,
    config: &SessionConfig,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        (SessionState::Sending, SessionEvent::SendRequested { .. }) => {
            Err(TransitionError::AlreadyInFlight)
        }
        (
            SessionState::Idle,
            SessionEvent::SendRequested {
                prompt,
                attachments,
                at,
            },
        ) => {
            let trimmed = prompt.trim();
            if trimmed.is_empty() && attachments.is_empty() {
                return Err(TransitionError::EmptyRequest);
            }
            let request = DispatchRequest {
                prompt: trimmed.to_owned(),
                attachment_ids: attachments.iter().map(|item| item.id().clone()).collect(),
            };
            let user_message = Message::new(Sender::User, trimmed, attachments, at);
            Ok(TransitionResult::new(SessionState::Sending)
                .with_effect(Effect::AppendMessage(user_message))
                .with_effect(Effect::Dispatch(request)))
        }
        (SessionState::Idle, SessionEvent::DispatchSettled { .. }) => {
            Err(TransitionError::NotInFlight)
        }
        (SessionState::Sending, SessionEvent::DispatchSettled { outcome, at }) => match outcome {
            Ok(reply) => Ok(TransitionResult::new(SessionState::Idle).with_effect(
                Effect::AppendMessage(Message::new(Sender::Assistant, reply, Vec::new(), at)),
            )),
            Err(reason) => {
                let text = format!("{}{reason}", config.error_prefix);
                Ok(TransitionResult::new(SessionState::Idle)
                    .with_effect(Effect::AppendMessage(Message::new(
                        Sender::Assistant,
                        text,
                        Vec::new(),
                        at,
                    )))
                    .with_effect(Effect::Notify(Notification::error(reason))))
            }
        },
    }
}
