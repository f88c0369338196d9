use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use tabscribe::bridge::ControlListener;
use tabscribe::capture::{
    BusCaptureLink, CaptureDescriptor, CaptureManager, TaskCaptureHost, WavFileSource,
    WorkerSettings,
};
use tabscribe::coordinator::{MintedTokenResolver, SessionCoordinator, StaticTabResolver};
use tabscribe::state::FileStateStore;
use tabscribe::Config;

#[derive(Debug, Parser)]
#[command(name = "tabscribe", about = "Tab audio recording coordinator")]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/tabscribe")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} starting", cfg.service.name);
    info!("Message bus: {}", cfg.bus.url);
    info!("Session state file: {}", cfg.state.path);

    let bus = async_nats::connect(cfg.bus.url.as_str()).await?;

    let source = Arc::new(WavFileSource::new(
        &cfg.capture.wav_path,
        cfg.capture.frame_duration_ms,
    ));
    let host = Arc::new(TaskCaptureHost::new(
        bus.clone(),
        source,
        WorkerSettings {
            events_subject: cfg.bus.events_subject.clone(),
        },
    ));

    let coordinator = Arc::new(SessionCoordinator::new(
        Arc::new(FileStateStore::new(&cfg.state.path)),
        CaptureManager::new(host),
        CaptureDescriptor {
            subject: cfg.bus.offscreen_subject.clone(),
            justification: "Recording meeting audio for transcription".to_string(),
        },
        Arc::new(StaticTabResolver::new(cfg.capture.tab_url.clone())),
        Arc::new(MintedTokenResolver),
        Arc::new(BusCaptureLink::new(
            bus.clone(),
            cfg.bus.offscreen_subject.clone(),
        )),
    ));

    let listener = ControlListener::new(bus, cfg.bus.control_subject.clone());

    tokio::select! {
        result = listener.serve(coordinator) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
            Ok(())
        }
    }
}
