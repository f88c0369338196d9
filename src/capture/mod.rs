//! Capture context lifecycle and messaging.
//!
//! The capture context is an isolated execution environment that consumes a
//! live media stream independently of the control surface's lifecycle. This
//! module provides:
//! - the host contract for creating/destroying the single context
//! - the manager that deduplicates concurrent creations
//! - the typed command link into the context
//! - the worker that is the context: token redemption, frame pumping to the
//!   transcription server, and transcript relay back to the control surface

mod host;
mod link;
mod manager;
pub mod messages;
mod source;
mod worker;

pub use host::{CaptureDescriptor, CaptureHost, TaskCaptureHost};
pub use link::{BusCaptureLink, CaptureLink};
pub use manager::CaptureManager;
pub use messages::{CaptureCommand, OffscreenStartCommand};
pub use source::{AudioFrame, TabAudioSource, WavFileSource};
pub use worker::{CaptureWorker, WorkerSettings};
