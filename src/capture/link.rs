use anyhow::{Context, Result};
use tracing::debug;

use super::messages::{CaptureCommand, OffscreenStartCommand};
use crate::bridge::messages::CommandReply;

/// Request/response channel into the capture context.
#[async_trait::async_trait]
pub trait CaptureLink: Send + Sync {
    /// Send the start command and wait for the context's acknowledgment.
    async fn start(&self, command: OffscreenStartCommand) -> Result<CommandReply>;

    /// Send the stop command and wait for the acknowledgment. Errors when
    /// the context is gone or not listening.
    async fn stop(&self) -> Result<CommandReply>;
}

/// Capture link over the shared message bus, using request/reply.
pub struct BusCaptureLink {
    client: async_nats::Client,
    subject: String,
}

impl BusCaptureLink {
    pub fn new(client: async_nats::Client, subject: impl Into<String>) -> Self {
        Self {
            client,
            subject: subject.into(),
        }
    }

    async fn request(&self, command: &CaptureCommand) -> Result<CommandReply> {
        let payload = serde_json::to_vec(command)?;
        let response = self
            .client
            .request(self.subject.clone(), payload.into())
            .await
            .context("Capture context did not answer")?;
        let reply: CommandReply = serde_json::from_slice(&response.payload)
            .context("Malformed acknowledgment from capture context")?;
        debug!("Capture context acknowledged: success={}", reply.success);
        Ok(reply)
    }
}

#[async_trait::async_trait]
impl CaptureLink for BusCaptureLink {
    async fn start(&self, command: OffscreenStartCommand) -> Result<CommandReply> {
        self.request(&CaptureCommand::Start(command)).await
    }

    async fn stop(&self) -> Result<CommandReply> {
        self.request(&CaptureCommand::Stop).await
    }
}
