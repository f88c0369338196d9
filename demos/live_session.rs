// Live session example: drive the coordinator over the message bus.
//
// Sends a START_RECORDING request, prints relayed transcript events for a
// while, then sends STOP_RECORDING — the same traffic the control surface
// produces.
//
// Prerequisites:
// - NATS server running: docker run -p 4222:4222 nats
// - tabscribe running: cargo run
// - a WAV fixture at the path named in config/tabscribe.toml
//
// Usage: cargo run --example live_session

use anyhow::Result;
use futures::stream::StreamExt;
use std::time::Duration;
use tabscribe::bridge::messages::{CommandReply, ControlMessage, StartRequest};
use tabscribe::stt::TranscriptMessage;
use tokio::time::{sleep, timeout};
use tracing::info;

const BUS_URL: &str = "nats://localhost:4222";
const CONTROL_SUBJECT: &str = "tabscribe.control";
const EVENTS_SUBJECT: &str = "tabscribe.events.transcript";

async fn send(client: &async_nats::Client, message: &ControlMessage) -> Result<CommandReply> {
    let payload = serde_json::to_vec(message)?;
    let response = client
        .request(CONTROL_SUBJECT.to_string(), payload.into())
        .await?;
    Ok(serde_json::from_slice(&response.payload)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let client = async_nats::connect(BUS_URL).await?;
    info!("Connected to {}", BUS_URL);

    let mut events = client.subscribe(EVENTS_SUBJECT).await?;

    let reply = send(
        &client,
        &ControlMessage::StartRecording(StartRequest {
            credential: "demo-token".to_string(),
            server_address: BUS_URL.to_string(),
            title: "Demo meeting".to_string(),
        }),
    )
    .await?;
    info!("Start reply: success={} error={:?}", reply.success, reply.error);

    if reply.success {
        // Print transcript events for up to 30 seconds.
        let _ = timeout(Duration::from_secs(30), async {
            while let Some(msg) = events.next().await {
                match serde_json::from_slice::<TranscriptMessage>(&msg.payload) {
                    Ok(t) if t.partial => print!("\r{}", t.text),
                    Ok(t) => println!("{}", t.text),
                    Err(e) => info!("Unparsed event: {}", e),
                }
            }
        })
        .await;
    }

    let reply = send(&client, &ControlMessage::StopRecording).await?;
    info!("Stop reply: success={} error={:?}", reply.success, reply.error);

    sleep(Duration::from_millis(200)).await;
    Ok(())
}
