use anyhow::{Context, Result};
use base64::Engine;
use tracing::{debug, info};

use super::messages::{AudioFrameMessage, SessionEndMessage, SessionStartMessage};
use crate::platform::Platform;

/// Client for the remote transcription server.
///
/// One instance per capture session; authenticates with the credential the
/// control surface supplied in the start request.
pub struct SttClient {
    client: async_nats::Client,
    session_id: String,
}

impl SttClient {
    pub async fn connect(address: &str, credential: &str, session_id: String) -> Result<Self> {
        info!("Connecting to transcription server at {}", address);

        let client = async_nats::ConnectOptions::new()
            .token(credential.to_string())
            .connect(address)
            .await
            .context("Failed to connect to transcription server")?;

        info!("Connected to transcription server");

        Ok(Self { client, session_id })
    }

    /// Announce the session before the first audio frame.
    pub async fn announce_session(
        &self,
        meeting_url: &str,
        platform: Platform,
        title: &str,
    ) -> Result<()> {
        let message = SessionStartMessage {
            session_id: self.session_id.clone(),
            meeting_url: meeting_url.to_string(),
            platform,
            title: title.to_string(),
            started_at: chrono::Utc::now().to_rfc3339(),
        };

        let payload = serde_json::to_vec(&message)?;
        self.client
            .publish("stt.session.start".to_string(), payload.into())
            .await
            .context("Failed to announce session")?;

        info!("Transcription session {} announced", self.session_id);

        Ok(())
    }

    /// Publish one PCM frame. An empty frame with `is_final` marks the end
    /// of the stream.
    pub async fn publish_audio_frame(
        &self,
        pcm_bytes: &[u8],
        sample_rate: u32,
        channels: u16,
        sequence: u32,
        is_final: bool,
    ) -> Result<()> {
        let subject = format!("audio.frame.{}", self.session_id);

        let message = AudioFrameMessage {
            session_id: self.session_id.clone(),
            sequence,
            pcm: base64::engine::general_purpose::STANDARD.encode(pcm_bytes),
            sample_rate,
            channels,
            timestamp: chrono::Utc::now().to_rfc3339(),
            final_frame: is_final,
        };

        let payload = serde_json::to_vec(&message)?;
        self.client
            .publish(subject, payload.into())
            .await
            .context("Failed to publish audio frame")?;

        debug!(
            "Published frame {} ({} bytes, final={})",
            sequence,
            pcm_bytes.len(),
            is_final
        );

        Ok(())
    }

    /// Subscribe to transcript events. The server publishes partial and
    /// final text for every session; callers filter by session id in the
    /// payload.
    pub async fn subscribe_transcripts(&self) -> Result<async_nats::Subscriber> {
        let subject = "stt.text.>";

        let subscriber = self
            .client
            .subscribe(subject)
            .await
            .context("Failed to subscribe to transcripts")?;

        info!("Subscribed to transcripts on {}", subject);

        Ok(subscriber)
    }

    /// Close the session with its final title.
    pub async fn close_session(&self, title: &str) -> Result<()> {
        let message = SessionEndMessage {
            session_id: self.session_id.clone(),
            title: title.to_string(),
            ended_at: chrono::Utc::now().to_rfc3339(),
        };

        let payload = serde_json::to_vec(&message)?;
        self.client
            .publish("stt.session.end".to_string(), payload.into())
            .await
            .context("Failed to close session")?;

        info!("Transcription session {} closed", self.session_id);

        Ok(())
    }
}
