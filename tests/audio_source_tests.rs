// Tests for the WAV-backed tab audio source.

use tabscribe::capture::{TabAudioSource, WavFileSource};

fn write_fixture(path: &std::path::Path, samples: usize, sample_rate: u32, channels: u16) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..samples {
        writer.write_sample((i % 128) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

#[tokio::test]
async fn test_wav_source_streams_every_sample() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.wav");
    write_fixture(&path, 8000, 16000, 1); // half a second of mono audio

    let source = WavFileSource::new(&path, 100);
    let mut frames = source.open("stream-test").await.unwrap();

    let mut total_samples = 0;
    let mut frame_count = 0;
    let mut last_timestamp = None;

    while let Some(frame) = frames.recv().await {
        assert_eq!(frame.sample_rate, 16000);
        assert_eq!(frame.channels, 1);
        if let Some(previous) = last_timestamp {
            assert!(frame.timestamp_ms > previous);
        }
        last_timestamp = Some(frame.timestamp_ms);
        total_samples += frame.samples.len();
        frame_count += 1;
    }

    assert_eq!(total_samples, 8000);
    // 100ms frames at 16kHz mono are 1600 samples each.
    assert_eq!(frame_count, 5);
}

#[tokio::test]
async fn test_wav_source_stops_when_receiver_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.wav");
    write_fixture(&path, 32000, 16000, 1); // two seconds

    let source = WavFileSource::new(&path, 100);
    let mut frames = source.open("stream-test").await.unwrap();

    // Take one frame and walk away; the pacing task must notice and stop.
    let first = frames.recv().await.unwrap();
    assert_eq!(first.timestamp_ms, 0);
    drop(frames);
}

#[tokio::test]
async fn test_wav_source_rejects_non_pcm16_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("float.wav");

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for _ in 0..100 {
        writer.write_sample(0.5f32).unwrap();
    }
    writer.finalize().unwrap();

    let source = WavFileSource::new(&path, 100);
    let err = source.open("stream-test").await.unwrap_err();
    assert!(err.to_string().contains("16-bit PCM"));
}
