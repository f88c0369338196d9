use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Audio frame published to the transcription server.
#[derive(Debug, Serialize, Deserialize)]
pub struct AudioFrameMessage {
    pub session_id: String,
    pub sequence: u32,
    pub pcm: String, // Base64-encoded PCM bytes
    pub sample_rate: u32,
    pub channels: u16,
    pub timestamp: String, // RFC3339 timestamp
    #[serde(rename = "final")]
    pub final_frame: bool,
}

/// Transcript event received from the transcription server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub session_id: String,
    pub text: String,
    pub partial: bool,
    pub timestamp: String,
    pub confidence: Option<f32>,
}

/// Opens a transcription session; carries the captured tab's metadata.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionStartMessage {
    pub session_id: String,
    pub meeting_url: String,
    pub platform: Platform,
    pub title: String,
    pub started_at: String,
}

/// Closes a transcription session.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionEndMessage {
    pub session_id: String,
    pub title: String,
    pub ended_at: String,
}
