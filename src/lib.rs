//! Hoverchat: the state core of a floating chat window.
//!
//! This crate manages one interactive chat session against a remote
//! text-generation backend reached through a host capability bridge. It
//! produces structured data only; drawing pixels is left to the host.
//!
//! # Architecture
//!
//! Hoverchat follows hexagonal architecture principles:
//!
//! - **Domain**: Pure session logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the host bridge and notifications
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`session`]: Conversation log, pending attachments, send lifecycle and
//!   message segmentation

pub mod session;
