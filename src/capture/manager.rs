use anyhow::{anyhow, Result};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

use super::host::{CaptureDescriptor, CaptureHost};

/// In-flight creation shared between concurrent callers. The error side is a
/// string because every awaiter gets a clone of the outcome.
type CreationGuard = Shared<BoxFuture<'static, Result<(), String>>>;

/// Owns the lifecycle of the single capture context.
///
/// At most one context exists at a time and at most one creation is in
/// flight at any instant: a caller either finds the context, joins the
/// published in-flight creation, or becomes the creator and publishes the
/// guard for the others.
pub struct CaptureManager {
    host: Arc<dyn CaptureHost>,
    creating: Mutex<Option<CreationGuard>>,
}

impl CaptureManager {
    pub fn new(host: Arc<dyn CaptureHost>) -> Self {
        Self {
            host,
            creating: Mutex::new(None),
        }
    }

    /// Make sure a capture context exists. Idempotent; concurrent callers
    /// share one creation instead of issuing duplicates.
    pub async fn ensure(&self, descriptor: CaptureDescriptor) -> Result<()> {
        if self.host.exists().await {
            return Ok(());
        }

        let creation = {
            let mut creating = self.creating.lock().await;
            match creating.as_ref() {
                Some(in_flight) => in_flight.clone(),
                None => {
                    let host = Arc::clone(&self.host);
                    let guard: CreationGuard = async move {
                        host.create(descriptor).await.map_err(|e| format!("{:#}", e))
                    }
                    .boxed()
                    .shared();
                    *creating = Some(guard.clone());
                    guard
                }
            }
        };

        let outcome = creation.clone().await;

        // Clear only the guard that was awaited; a newer creation may have
        // been published in the meantime.
        {
            let mut creating = self.creating.lock().await;
            if creating.as_ref().is_some_and(|g| g.ptr_eq(&creation)) {
                *creating = None;
            }
        }

        outcome.map_err(|e| anyhow!(e))
    }

    /// Best-effort teardown. Failures are logged and swallowed; a context
    /// that refuses to die is left for the host to reclaim.
    pub async fn destroy_if_exists(&self) {
        if self.host.exists().await {
            if let Err(e) = self.host.destroy().await {
                warn!("Failed to destroy capture context: {:#}", e);
            }
        }
    }
}
