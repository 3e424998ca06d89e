//! Append-only conversation history.

use super::Message;

/// Chronologically ordered history of a session's messages.
///
/// There is no removal or edit operation: the log only grows, and an
/// index handed out by [`ConversationLog::append`] refers to the same
/// message for the lifetime of the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Appends a message and returns its zero-based index.
    pub fn append(&mut self, message: Message) -> usize {
        self.messages.push(message);
        self.messages.len().saturating_sub(1)
    }

    /// Iterates over all messages in chronological order.
    ///
    /// The iterator is `Clone`, so a consumer can restart it cheaply.
    pub fn all(&self) -> impl Iterator<Item = &Message> + Clone {
        self.messages.iter()
    }

    /// Returns the message at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    /// Returns the most recent message.
    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Returns the number of messages.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if nothing has been recorded yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
