use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

use super::source::TabAudioSource;
use super::worker::{CaptureWorker, WorkerSettings};

/// Describes the capture context to create.
#[derive(Debug, Clone)]
pub struct CaptureDescriptor {
    /// Control subject the context listens on.
    pub subject: String,
    /// Why the context exists; logged at creation.
    pub justification: String,
}

/// Host capable of creating and destroying the single capture context.
///
/// Callers go through [`CaptureManager`](super::CaptureManager) rather than
/// calling `create` directly, so concurrent creations collapse into one.
#[async_trait::async_trait]
pub trait CaptureHost: Send + Sync {
    async fn create(&self, descriptor: CaptureDescriptor) -> Result<()>;

    /// Whether a live context currently exists.
    async fn exists(&self) -> bool;

    async fn destroy(&self) -> Result<()>;
}

/// Runs the capture context as a background task on the shared message bus.
///
/// The worker is subscribed to its control subject before `create` returns,
/// so a start command sent immediately afterwards always has a listener.
pub struct TaskCaptureHost {
    bus: async_nats::Client,
    source: Arc<dyn TabAudioSource>,
    settings: WorkerSettings,
    running: Mutex<Option<JoinHandle<()>>>,
}

impl TaskCaptureHost {
    pub fn new(
        bus: async_nats::Client,
        source: Arc<dyn TabAudioSource>,
        settings: WorkerSettings,
    ) -> Self {
        Self {
            bus,
            source,
            settings,
            running: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl CaptureHost for TaskCaptureHost {
    async fn create(&self, descriptor: CaptureDescriptor) -> Result<()> {
        let mut running = self.running.lock().await;
        if running.as_ref().is_some_and(|task| !task.is_finished()) {
            return Ok(());
        }

        info!("Creating capture context: {}", descriptor.justification);

        let commands = self
            .bus
            .subscribe(descriptor.subject.clone())
            .await
            .context("Failed to subscribe capture context to its control subject")?;

        let worker = CaptureWorker::new(
            self.bus.clone(),
            Arc::clone(&self.source),
            self.settings.clone(),
        );
        *running = Some(tokio::spawn(worker.run(commands)));

        Ok(())
    }

    async fn exists(&self) -> bool {
        self.running
            .lock()
            .await
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    async fn destroy(&self) -> Result<()> {
        if let Some(task) = self.running.lock().await.take() {
            info!("Destroying capture context");
            task.abort();
        }
        Ok(())
    }
}
