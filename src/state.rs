//! Durable session flag storage.
//!
//! One boolean, "a recording session is believed active", persisted so the
//! coordinator can restart without losing track of an in-flight session. The
//! coordinator is the sole owner: the flag is read at the start of every
//! start/stop operation and written at the end of every successful
//! transition. No other component touches it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// On-disk layout of the session record.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    #[serde(default)]
    is_recording: bool,
}

/// Crash-surviving store for the session flag.
#[async_trait::async_trait]
pub trait StateStore: Send + Sync {
    async fn is_recording(&self) -> Result<bool>;
    async fn set_recording(&self, active: bool) -> Result<()>;
}

/// File-backed store; survives coordinator restarts.
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    async fn read_record(&self) -> Result<SessionRecord> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(record) => Ok(record),
                Err(e) => {
                    // A torn or hand-edited record must not wedge the
                    // coordinator; treat it as idle and let the next write
                    // replace it.
                    warn!(
                        "Corrupt session state file {}, treating as idle: {}",
                        self.path.display(),
                        e
                    );
                    Ok(SessionRecord::default())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionRecord::default()),
            Err(e) => Err(e).with_context(|| {
                format!("Failed to read session state file: {}", self.path.display())
            }),
        }
    }
}

#[async_trait::async_trait]
impl StateStore for FileStateStore {
    async fn is_recording(&self) -> Result<bool> {
        Ok(self.read_record().await?.is_recording)
    }

    async fn set_recording(&self, active: bool) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .context("Failed to create session state directory")?;
        }

        let bytes = serde_json::to_vec_pretty(&SessionRecord {
            is_recording: active,
        })?;

        // Write-then-rename: a crash mid-write never leaves a torn record.
        let staged = self.path.with_extension("json.tmp");
        tokio::fs::write(&staged, &bytes)
            .await
            .with_context(|| format!("Failed to stage session state file: {}", staged.display()))?;
        tokio::fs::rename(&staged, &self.path)
            .await
            .context("Failed to replace session state file")?;

        debug!("Session flag persisted: isRecording={}", active);
        Ok(())
    }
}

/// In-memory store for tests and single-process setups.
#[derive(Default)]
pub struct MemoryStateStore {
    is_recording: AtomicBool,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl StateStore for MemoryStateStore {
    async fn is_recording(&self) -> Result<bool> {
        Ok(self.is_recording.load(Ordering::SeqCst))
    }

    async fn set_recording(&self, active: bool) -> Result<()> {
        self.is_recording.store(active, Ordering::SeqCst);
        Ok(())
    }
}
