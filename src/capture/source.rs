use anyhow::{bail, Context, Result};
use hound::WavReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Audio sample data (16-bit PCM, interleaved).
#[derive(Debug, Clone)]
pub struct AudioFrame {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
    /// Milliseconds since capture started.
    pub timestamp_ms: u64,
}

/// Live audio feed redeemed from a stream token.
///
/// Real deployments back this with a platform capture API; the WAV source
/// below exists for headless development and batch processing.
#[async_trait::async_trait]
pub trait TabAudioSource: Send + Sync {
    /// Open the capturable stream the token refers to.
    async fn open(&self, stream_token: &str) -> Result<mpsc::Receiver<AudioFrame>>;
}

/// Streams a WAV file as if it were live tab audio, paced in real time.
pub struct WavFileSource {
    path: PathBuf,
    frame_duration_ms: u64,
}

impl WavFileSource {
    pub fn new(path: impl AsRef<Path>, frame_duration_ms: u64) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            frame_duration_ms,
        }
    }
}

#[async_trait::async_trait]
impl TabAudioSource for WavFileSource {
    async fn open(&self, stream_token: &str) -> Result<mpsc::Receiver<AudioFrame>> {
        info!(
            "Opening WAV source {} for stream token {}",
            self.path.display(),
            stream_token
        );

        let reader = WavReader::open(&self.path)
            .with_context(|| format!("Failed to open WAV file: {}", self.path.display()))?;

        let spec = reader.spec();
        if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
            bail!(
                "Expected 16-bit PCM WAV, got {:?} at {} bits",
                spec.sample_format,
                spec.bits_per_sample
            );
        }

        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read audio samples")?;

        let samples_per_frame = (spec.sample_rate as u64 * self.frame_duration_ms / 1000).max(1)
            as usize
            * spec.channels as usize;
        let frame_duration = Duration::from_millis(self.frame_duration_ms);
        let sample_rate = spec.sample_rate;
        let channels = spec.channels;

        let (tx, rx) = mpsc::channel(16);

        tokio::spawn(async move {
            let mut timestamp_ms = 0u64;
            for chunk in samples.chunks(samples_per_frame) {
                let frame = AudioFrame {
                    samples: chunk.to_vec(),
                    sample_rate,
                    channels,
                    timestamp_ms,
                };
                if tx.send(frame).await.is_err() {
                    // Receiver dropped; capture was stopped.
                    return;
                }
                timestamp_ms += frame_duration.as_millis() as u64;
                tokio::time::sleep(frame_duration).await;
            }
            info!("WAV source drained");
        });

        Ok(rx)
    }
}
