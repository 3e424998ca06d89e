//! Port trait definitions for the session core.
//!
//! Ports describe what the session needs from its host: image capture,
//! backend dispatch, and user notifications. Adapters implement them.

pub mod bridge;
pub mod capture;
pub mod notifier;

pub use bridge::{BridgeResult, CapabilityBridge, DispatchResponse, LayoutSize, UNKNOWN_ERROR};
pub use capture::{CaptureEvent, CaptureFeed, CaptureHandler, Subscription};
pub use notifier::{Notification, Notifier, Severity};
