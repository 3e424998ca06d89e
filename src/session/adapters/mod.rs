//! Adapters for the session ports.
//!
//! # Available Adapters
//!
//! - [`memory::InMemoryBridge`], [`memory::InMemoryCaptureFeed`] and
//!   [`memory::RecordingNotifier`]: scriptable in-process implementations
//! - [`log_notifier::TracingNotifier`]: routes notifications into `tracing`

pub mod log_notifier;
pub mod memory;
