use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::stream::StreamExt;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::messages::{CaptureCommand, OffscreenStartCommand};
use super::source::TabAudioSource;
use crate::bridge::messages::CommandReply;
use crate::stt::{SttClient, TranscriptMessage};

/// Settings the capture context applies to every session it runs.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Local subject transcript events are relayed to for the control
    /// surface.
    pub events_subject: String,
}

/// The capture context: an isolated task that consumes the tab's media
/// stream and bridges it to the transcription server.
///
/// Created lazily by the coordinator on the first start and torn down on
/// stop; it outlives the control surface, which may close at any moment.
pub struct CaptureWorker {
    bus: async_nats::Client,
    source: Arc<dyn TabAudioSource>,
    settings: WorkerSettings,
    active: Option<ActiveSession>,
}

struct ActiveSession {
    title: String,
    stt: Arc<SttClient>,
    streaming: Arc<AtomicBool>,
    pump: JoinHandle<()>,
    relay: JoinHandle<()>,
}

impl Drop for ActiveSession {
    fn drop(&mut self) {
        // The session's tasks must not outlive the worker.
        self.pump.abort();
        self.relay.abort();
    }
}

impl CaptureWorker {
    pub fn new(
        bus: async_nats::Client,
        source: Arc<dyn TabAudioSource>,
        settings: WorkerSettings,
    ) -> Self {
        Self {
            bus,
            source,
            settings,
            active: None,
        }
    }

    /// Command loop. Runs until the subscription closes or the host aborts
    /// the task.
    pub async fn run(mut self, mut commands: async_nats::Subscriber) {
        info!("Capture context listening");

        while let Some(msg) = commands.next().await {
            let reply = match serde_json::from_slice::<CaptureCommand>(&msg.payload) {
                Ok(CaptureCommand::Start(command)) => self.handle_start(command).await,
                Ok(CaptureCommand::Stop) => self.handle_stop().await,
                Err(e) => {
                    warn!("Ignoring malformed capture command: {}", e);
                    continue;
                }
            };

            let Some(reply_to) = msg.reply else { continue };
            match serde_json::to_vec(&reply) {
                Ok(payload) => {
                    if let Err(e) = self.bus.publish(reply_to, payload.into()).await {
                        error!("Failed to acknowledge capture command: {}", e);
                    }
                }
                Err(e) => error!("Failed to encode capture acknowledgment: {}", e),
            }
        }

        info!("Capture context command loop ended");
    }

    async fn handle_start(&mut self, command: OffscreenStartCommand) -> CommandReply {
        if self.active.is_some() {
            return CommandReply::failure("Capture already active");
        }

        match self.begin(command).await {
            Ok(session) => {
                self.active = Some(session);
                CommandReply::ok()
            }
            Err(e) => {
                error!("Failed to start capture: {:#}", e);
                CommandReply::failure(format!("{:#}", e))
            }
        }
    }

    async fn begin(&self, command: OffscreenStartCommand) -> Result<ActiveSession> {
        let session_id = format!("session-{}", Uuid::new_v4());

        // Redeem the stream token first; until it succeeds there is nothing
        // to tear down.
        let mut frames = self
            .source
            .open(&command.stream_token)
            .await
            .context("Failed to open tab audio stream")?;

        let stt = Arc::new(
            SttClient::connect(
                &command.server_address,
                &command.credential,
                session_id.clone(),
            )
            .await
            .context("Failed to reach transcription server")?,
        );

        stt.announce_session(&command.meeting_url, command.platform, &command.title)
            .await
            .context("Failed to open transcription session")?;

        let streaming = Arc::new(AtomicBool::new(true));

        // Pump task: forward PCM frames upstream until stopped or the source
        // runs dry, then send the final-frame marker.
        let pump = {
            let stt = Arc::clone(&stt);
            let streaming = Arc::clone(&streaming);
            let session_id = session_id.clone();
            tokio::spawn(async move {
                info!("Audio pump started for {}", session_id);

                let mut sequence = 0u32;
                let mut sample_rate = 16000;
                let mut channels = 1;

                while let Some(frame) = frames.recv().await {
                    if !streaming.load(Ordering::SeqCst) {
                        break;
                    }

                    sample_rate = frame.sample_rate;
                    channels = frame.channels;

                    let pcm: Vec<u8> = frame
                        .samples
                        .iter()
                        .flat_map(|s| s.to_le_bytes())
                        .collect();

                    if let Err(e) = stt
                        .publish_audio_frame(&pcm, sample_rate, channels, sequence, false)
                        .await
                    {
                        error!("Failed to publish audio frame: {}", e);
                    }

                    sequence += 1;
                }

                if let Err(e) = stt
                    .publish_audio_frame(&[], sample_rate, channels, sequence, true)
                    .await
                {
                    error!("Failed to send final frame: {}", e);
                }

                info!("Audio pump stopped after {} frames", sequence);
            })
        };

        // Relay task: transcript events from the server back onto the local
        // bus for the control surface.
        let mut transcripts = stt
            .subscribe_transcripts()
            .await
            .context("Failed to subscribe to transcripts")?;

        let relay = {
            let bus = self.bus.clone();
            let events_subject = self.settings.events_subject.clone();
            let session_id = session_id.clone();
            let streaming = Arc::clone(&streaming);
            tokio::spawn(async move {
                while let Some(msg) = transcripts.next().await {
                    if !streaming.load(Ordering::SeqCst) {
                        break;
                    }

                    match serde_json::from_slice::<TranscriptMessage>(&msg.payload) {
                        Ok(transcript) => {
                            if transcript.session_id != session_id {
                                continue;
                            }
                            if let Err(e) =
                                bus.publish(events_subject.clone(), msg.payload.clone()).await
                            {
                                error!("Failed to relay transcript event: {}", e);
                            }
                        }
                        Err(e) => warn!("Failed to parse transcript message: {}", e),
                    }
                }
            })
        };

        info!("Capture session {} started", session_id);

        Ok(ActiveSession {
            title: command.title,
            stt,
            streaming,
            pump,
            relay,
        })
    }

    async fn handle_stop(&mut self) -> CommandReply {
        let Some(mut session) = self.active.take() else {
            // Nothing running; stopping still succeeds so the control
            // surface can never get stuck.
            return CommandReply::ok();
        };

        info!("Stopping capture session");
        session.streaming.store(false, Ordering::SeqCst);

        if let Err(e) = (&mut session.pump).await {
            if !e.is_cancelled() {
                error!("Audio pump task failed: {}", e);
            }
        }

        // The relay only notices the flag on its next event, which may never
        // arrive; abort instead of waiting for one.
        session.relay.abort();

        if let Err(e) = session.stt.close_session(&session.title).await {
            warn!("Failed to close transcription session: {}", e);
        }

        CommandReply::ok()
    }
}
