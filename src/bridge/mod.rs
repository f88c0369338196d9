//! Request/response protocol exposed to the control surface.
//!
//! The control surface is short-lived (it can open and close at any moment),
//! so everything it sends is a structured envelope over the message bus:
//! - `START_RECORDING` with a [`StartRequest`] payload
//! - `STOP_RECORDING` with no payload
//!
//! Replies are deferred: each request is handled on its own task and the
//! reply goes out whenever the handler resolves.

mod listener;
pub mod messages;

pub use listener::{dispatch, ControlListener};
pub use messages::{CommandReply, ControlMessage, StartRequest};
