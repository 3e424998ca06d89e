//! Service layer for the chat session.
//!
//! - [`transition`]: the pure send state machine
//! - [`SessionController`]: runs the state machine against injected ports

pub mod controller;
pub mod transition;

pub use controller::SessionController;
pub use transition::{
    DispatchRequest, Effect, SessionEvent, TransitionResult, transition,
};
