//! Recording session coordination.
//!
//! The coordinator is the persistent component that owns session state:
//! - receives start/stop requests from the control surface
//! - drives the capture context's lifecycle
//! - resolves the active tab and its media stream token
//! - relays control messages to the capture context
//!
//! Its two logical states, Idle and Recording, are persisted through the
//! durable state store so they survive coordinator restarts.

mod coordinator;
mod error;
mod tabs;

pub use coordinator::SessionCoordinator;
pub use error::SessionError;
pub use tabs::{MintedTokenResolver, StaticTabResolver, StreamTokenResolver, TabInfo, TabResolver};
