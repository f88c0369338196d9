use serde::{Deserialize, Serialize};

/// Meeting platform derived from the captured tab's URL.
///
/// Sent alongside the stream token as contextual metadata; the transcription
/// server uses it to pick platform-specific post-processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    GoogleMeet,
    Zoom,
    Teams,
    Other,
}

impl Platform {
    /// Classify a tab URL. Total and deterministic; substring checks run in
    /// fixed priority order (Meet > Zoom > Teams), anything else is Other.
    pub fn identify(url: &str) -> Self {
        if url.contains("google.com") {
            Platform::GoogleMeet
        } else if url.contains("zoom.us") {
            Platform::Zoom
        } else if url.contains("teams.microsoft.com") {
            Platform::Teams
        } else {
            Platform::Other
        }
    }
}
