//! Session lifecycle state.

use serde::{Deserialize, Serialize};

/// Whether a send is currently in flight.
///
/// Starts as [`SessionState::Idle`] and only changes through the session
/// state machine: `Idle --send--> Sending --settle--> Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Ready to accept a send.
    #[default]
    Idle,
    /// Waiting for the backend to settle the current send.
    Sending,
}

impl SessionState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Sending => "sending",
        }
    }

    /// Returns `true` while a send is in flight.
    #[must_use]
    pub const fn is_sending(self) -> bool {
        matches!(self, Self::Sending)
    }
}
