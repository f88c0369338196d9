use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub bus: BusConfig,
    pub state: StateConfig,
    pub capture: CaptureConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct BusConfig {
    pub url: String,
    /// Subject the control surface sends start/stop requests to.
    pub control_subject: String,
    /// Subject the capture context listens on.
    pub offscreen_subject: String,
    /// Subject transcript events are relayed to for the control surface.
    pub events_subject: String,
}

#[derive(Debug, Deserialize)]
pub struct StateConfig {
    /// Path of the durable session flag record.
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct CaptureConfig {
    /// Tab the static resolver reports as active, if any.
    pub tab_url: Option<String>,
    /// WAV file streamed as the tab's audio in headless deployments.
    pub wav_path: String,
    pub frame_duration_ms: u64,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
