use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::error::SessionError;
use super::tabs::{StreamTokenResolver, TabResolver};
use crate::bridge::messages::{CommandReply, StartRequest};
use crate::capture::{CaptureDescriptor, CaptureLink, CaptureManager, OffscreenStartCommand};
use crate::platform::Platform;
use crate::state::StateStore;

/// The recording session state machine.
///
/// Two logical states, Idle and Recording, persisted through the
/// [`StateStore`]. Process-local memory is not trusted as the source of
/// truth: the coordinator can restart independently of the control surface
/// and of the capture context.
pub struct SessionCoordinator {
    state: Arc<dyn StateStore>,
    capture: CaptureManager,
    descriptor: CaptureDescriptor,
    tabs: Arc<dyn TabResolver>,
    tokens: Arc<dyn StreamTokenResolver>,
    link: Arc<dyn CaptureLink>,
    /// Serializes whole start operations so two racing starts cannot both
    /// observe the idle flag before either writes it.
    starting: Mutex<()>,
}

impl SessionCoordinator {
    pub fn new(
        state: Arc<dyn StateStore>,
        capture: CaptureManager,
        descriptor: CaptureDescriptor,
        tabs: Arc<dyn TabResolver>,
        tokens: Arc<dyn StreamTokenResolver>,
        link: Arc<dyn CaptureLink>,
    ) -> Self {
        Self {
            state,
            capture,
            descriptor,
            tabs,
            tokens,
            link,
            starting: Mutex::new(()),
        }
    }

    /// Start a recording session.
    ///
    /// Never fails across this boundary: every internal error is folded into
    /// the reply for the control surface to display.
    pub async fn start(&self, request: StartRequest) -> CommandReply {
        match self.try_start(request).await {
            Ok(()) => CommandReply::ok(),
            Err(e) => {
                error!("Start recording error: {:#}", e);
                CommandReply::failure(e.to_string())
            }
        }
    }

    async fn try_start(&self, request: StartRequest) -> Result<()> {
        let _starting = self.starting.lock().await;

        if self.state.is_recording().await? {
            bail!(SessionError::AlreadyRecording);
        }

        self.capture.ensure(self.descriptor.clone()).await?;

        let tab = self
            .tabs
            .active_tab()
            .await?
            .ok_or(SessionError::NoActiveTab)?;

        // Resolved fresh on every start; stream tokens are single-use.
        let stream_token = self.tokens.resolve(&tab).await?;
        let platform = Platform::identify(&tab.url);

        info!("Starting recording on {:?} tab: {}", platform, tab.url);

        let ack = self
            .link
            .start(OffscreenStartCommand {
                stream_token,
                credential: request.credential,
                meeting_url: tab.url,
                platform,
                server_address: request.server_address,
                title: request.title,
            })
            .await?;

        if !ack.success {
            bail!(ack
                .error
                .unwrap_or_else(|| SessionError::OffscreenStartFailed.to_string()));
        }

        // The flag goes true only once the capture context has confirmed it
        // is consuming the stream.
        self.state.set_recording(true).await?;
        info!("Recording session active");

        Ok(())
    }

    /// Stop the current recording session.
    ///
    /// Deliberately tolerant: the flag is cleared and teardown attempted
    /// even when no session appears to be active, so a half-started session
    /// can never get stuck.
    pub async fn stop(&self) -> CommandReply {
        match self.try_stop().await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Stop recording error: {:#}", e);
                CommandReply::failure(e.to_string())
            }
        }
    }

    async fn try_stop(&self) -> Result<CommandReply> {
        if !self.state.is_recording().await? {
            info!("Stop requested with no session believed active; cleaning up anyway");
        }

        // The capture context may already be gone; that is not a failure.
        let reply = match self.link.stop().await {
            Ok(ack) => ack,
            Err(e) => {
                warn!("Capture context not listening or already closed: {:#}", e);
                CommandReply::ok()
            }
        };

        self.state.set_recording(false).await?;
        self.capture.destroy_if_exists().await;

        info!("Recording session stopped");

        Ok(reply)
    }
}
