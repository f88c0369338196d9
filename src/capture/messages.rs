use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Payload of the start command sent into the capture context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffscreenStartCommand {
    /// Single-use handle for the tab's capturable audio, resolved fresh on
    /// every start.
    pub stream_token: String,
    pub credential: String,
    pub meeting_url: String,
    pub platform: Platform,
    pub server_address: String,
    pub title: String,
}

/// Command envelopes understood by the capture context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CaptureCommand {
    #[serde(rename = "START_RECORDING_OFFSCREEN")]
    Start(OffscreenStartCommand),
    #[serde(rename = "STOP_RECORDING_OFFSCREEN")]
    Stop,
}
