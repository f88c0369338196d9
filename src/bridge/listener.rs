use std::sync::Arc;

use anyhow::{Context, Result};
use futures::stream::StreamExt;
use tracing::{error, info, warn};

use super::messages::{CommandReply, ControlMessage};
use crate::coordinator::SessionCoordinator;

/// Listens for control-surface requests and relays them to the coordinator.
pub struct ControlListener {
    client: async_nats::Client,
    subject: String,
}

impl ControlListener {
    pub fn new(client: async_nats::Client, subject: impl Into<String>) -> Self {
        Self {
            client,
            subject: subject.into(),
        }
    }

    /// Serve requests until the subscription closes.
    ///
    /// Each request runs on its own task so a slow start does not block
    /// later messages; the reply channel stays open until the handler
    /// completes.
    pub async fn serve(&self, coordinator: Arc<SessionCoordinator>) -> Result<()> {
        let mut requests = self
            .client
            .subscribe(self.subject.clone())
            .await
            .context("Failed to subscribe to control subject")?;

        info!("Control listener ready on {}", self.subject);

        while let Some(msg) = requests.next().await {
            let coordinator = Arc::clone(&coordinator);
            let client = self.client.clone();
            tokio::spawn(async move {
                let reply = dispatch(&coordinator, &msg.payload).await;

                let Some(reply_to) = msg.reply else {
                    warn!("Control request arrived without a reply subject");
                    return;
                };
                match serde_json::to_vec(&reply) {
                    Ok(payload) => {
                        if let Err(e) = client.publish(reply_to, payload.into()).await {
                            error!("Failed to send control reply: {}", e);
                        }
                    }
                    Err(e) => error!("Failed to encode control reply: {}", e),
                }
            });
        }

        Ok(())
    }
}

/// Decode one control envelope and run the matching coordinator operation.
pub async fn dispatch(coordinator: &SessionCoordinator, payload: &[u8]) -> CommandReply {
    match serde_json::from_slice::<ControlMessage>(payload) {
        Ok(ControlMessage::StartRecording(request)) => coordinator.start(request).await,
        Ok(ControlMessage::StopRecording) => coordinator.stop().await,
        Err(e) => {
            warn!("Rejecting unrecognized control message: {}", e);
            CommandReply::failure(format!("Unrecognized control message: {}", e))
        }
    }
}
