use serde::{Deserialize, Serialize};

/// Start request issued by the control surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    /// Bearer credential for the transcription server.
    pub credential: String,
    /// Address of the transcription server the capture context streams to.
    pub server_address: String,
    /// User-supplied meeting title.
    pub title: String,
}

/// Control envelopes accepted from the control surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ControlMessage {
    #[serde(rename = "START_RECORDING")]
    StartRecording(StartRequest),
    #[serde(rename = "STOP_RECORDING")]
    StopRecording,
}

/// Reply to a control or capture command. The control surface displays
/// `error` verbatim, so messages are user-facing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandReply {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}
