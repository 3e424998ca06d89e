//! In-memory adapter implementations.
//!
//! Deterministic, thread-safe stand-ins for the host used by tests and by
//! local wiring without a real host process.

mod bridge;
mod capture_feed;
mod notifier;

pub use bridge::{InMemoryBridge, RecordedDispatch};
pub use capture_feed::InMemoryCaptureFeed;
pub use notifier::RecordingNotifier;
