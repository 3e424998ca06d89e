//! Conversation messages exchanged between the user and the assistant.

use super::Attachment;
use crate::session::error::ParseSenderError;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Originator of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// The person typing prompts.
    User,
    /// The text-generation backend.
    Assistant,
}

impl Sender {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl TryFrom<&str> for Sender {
    type Error = ParseSenderError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "assistant" | "llm" => Ok(Self::Assistant),
            _ => Err(ParseSenderError(value.to_owned())),
        }
    }
}

/// A single entry in the conversation history.
///
/// Messages are immutable after construction. A user message carries the
/// exact attachment snapshot taken when it was dispatched; assistant
/// messages never carry attachments.
///
/// # Examples
///
/// ```
/// use hoverchat::session::domain::{Message, Sender};
/// use mockable::DefaultClock;
///
/// let message = Message::assistant("a cat: :3", &DefaultClock);
/// assert_eq!(message.sender(), Sender::Assistant);
/// assert!(message.attachments().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    sender: Sender,
    text: String,
    attachments: Vec<Attachment>,
    created_at: DateTime<Utc>,
}

impl Message {
    /// Creates a message stamped with an explicit time.
    #[must_use]
    pub fn new(
        sender: Sender,
        text: impl Into<String>,
        attachments: Vec<Attachment>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sender,
            text: text.into(),
            attachments,
            created_at,
        }
    }

    /// Creates a user message stamped with the current time.
    #[must_use]
    pub fn user(
        text: impl Into<String>,
        attachments: Vec<Attachment>,
        clock: &impl Clock,
    ) -> Self {
        Self::new(Sender::User, text, attachments, clock.utc())
    }

    /// Creates an assistant message stamped with the current time.
    #[must_use]
    pub fn assistant(text: impl Into<String>, clock: &impl Clock) -> Self {
        Self::new(Sender::Assistant, text, Vec::new(), clock.utc())
    }

    /// Returns who sent the message.
    #[must_use]
    pub const fn sender(&self) -> Sender {
        self.sender
    }

    /// Returns the message text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the attachments sent with the message.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Returns when the message was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
