//! Single interactive chat session.
//!
//! Holds the append-only conversation history, the bounded set of pending
//! image attachments, the one-at-a-time exchange with the text-generation
//! backend, and the segmenter that splits message text into prose and
//! fenced code for rendering.
//!
//! # Architecture
//!
//! - **Domain**: pure types ([`domain::AttachmentStore`],
//!   [`domain::ConversationLog`], [`domain::segment`], ...)
//! - **Ports**: host contracts ([`ports::CapabilityBridge`],
//!   [`ports::Notifier`], [`ports::CaptureFeed`])
//! - **Adapters**: in-memory and `tracing`-backed implementations
//! - **Services**: the pure [`services::transition`] state machine and the
//!   [`services::SessionController`] that executes its effects
//!
//! # Example
//!
//! ```
//! use hoverchat::session::domain::{Segment, segment};
//!
//! let segments = segment("see:\n```rust\nfn main() {}\n```");
//! assert_eq!(segments.len(), 2);
//! assert!(matches!(segments.last(), Some(Segment::Code { .. })));
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
