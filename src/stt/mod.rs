pub mod client;
pub mod messages;

pub use client::SttClient;
pub use messages::{AudioFrameMessage, SessionEndMessage, SessionStartMessage, TranscriptMessage};
