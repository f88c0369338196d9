use thiserror::Error;

/// Fixed error messages surfaced to the control surface, which displays
/// them verbatim.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Start requested while the session flag is already set.
    #[error("Already recording")]
    AlreadyRecording,

    /// No eligible tab to capture.
    #[error("No active tab found")]
    NoActiveTab,

    /// The capture context's start acknowledgment reported failure without
    /// a message of its own.
    #[error("Failed to start offscreen recording")]
    OffscreenStartFailed,
}
