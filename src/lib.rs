pub mod bridge;
pub mod capture;
pub mod config;
pub mod coordinator;
pub mod platform;
pub mod state;
pub mod stt;

pub use bridge::{CommandReply, ControlListener, ControlMessage, StartRequest};
pub use capture::{
    AudioFrame, BusCaptureLink, CaptureDescriptor, CaptureHost, CaptureLink, CaptureManager,
    OffscreenStartCommand, TabAudioSource, TaskCaptureHost, WavFileSource, WorkerSettings,
};
pub use config::Config;
pub use coordinator::{
    MintedTokenResolver, SessionCoordinator, SessionError, StaticTabResolver, TabInfo, TabResolver,
};
pub use platform::Platform;
pub use state::{FileStateStore, MemoryStateStore, StateStore};
pub use stt::{SttClient, TranscriptMessage};
