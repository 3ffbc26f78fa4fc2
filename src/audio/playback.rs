//! Track playback through the system audio output.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::Arc;

use super::tap::TapSink;
use crate::params::analysis_constants::TAP_FEED_CAP;

/// Decoded audio track, folded to mono.
///
/// Decoding stays outside the render core: `hound` reads PCM WAV only.
pub struct Track {
    pub samples: Vec<f32>,
    pub sample_rate_hz: u32,
}

impl Track {
    /// Load a PCM WAV file, averaging channels to mono
    pub fn load_wav(path: &str) -> Result<Self, String> {
        let mut reader =
            hound::WavReader::open(path).map_err(|e| format!("Failed to open {}: {}", path, e))?;
        let spec = reader.spec();
        let channels = spec.channels as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(|e| format!("Failed to read {}: {}", path, e))?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<_, _>>()
                    .map_err(|e| format!("Failed to read {}: {}", path, e))?
            }
        };

        let samples = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();

        Ok(Self {
            samples,
            sample_rate_hz: spec.sample_rate,
        })
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate_hz as f32
    }
}

/// Plays one track on the default output device and feeds the tap sink.
///
/// The stream callback writes the audible buffer first and copies the same
/// samples into the sink; the tap observes the output, it never gates it.
/// The track plays once; past the end the callback emits silence.
pub struct PlaybackSystem {
    sink: Arc<TapSink>,
    sample_rate_hz: u32,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl PlaybackSystem {
    /// Create and start playback of the given track
    pub fn new(track: Track, gain: f32) -> Result<Self, String> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or("No audio output device found")?;

        let config = device
            .default_output_config()
            .map_err(|e| format!("Failed to get audio config: {}", e))?;
        let device_rate = config.sample_rate().0;
        let channels = config.channels() as usize;

        log::info!(
            "Audio: {} @ {}Hz ({:.1}s track)",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            device_rate,
            track.duration_secs()
        );

        let sink = Arc::new(TapSink::default());
        let sink_tap = Arc::clone(&sink);

        // Fractional cursor into the track, stepped at the track/device
        // rate ratio for linear-interpolation rate conversion
        let step = f64::from(track.sample_rate_hz) / f64::from(device_rate);
        let mut cursor = 0.0f64;
        let samples = track.samples;
        let mut tapped: Vec<f32> = Vec::new();

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    tapped.clear();
                    for frame in data.chunks_mut(channels) {
                        let value = sample_at(&samples, cursor) * gain;
                        cursor += step;
                        for out in frame.iter_mut() {
                            *out = value;
                        }
                        tapped.push(value);
                    }
                    sink_tap.push(&tapped, TAP_FEED_CAP);
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| format!("Failed to build audio stream: {}", e))?;

        stream
            .play()
            .map_err(|e| format!("Failed to start audio stream: {}", e))?;

        Ok(Self {
            sink,
            sample_rate_hz: device_rate,
            _stream: stream,
        })
    }

    /// Tap sink observing the output signal
    pub fn sink(&self) -> &TapSink {
        &self.sink
    }

    /// Output device sample rate (the rate tapped samples arrive at)
    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }
}

/// Linear interpolation between adjacent track samples; silence past the end
fn sample_at(samples: &[f32], cursor: f64) -> f32 {
    let index = cursor as usize;
    if index + 1 >= samples.len() {
        return samples.get(index).copied().unwrap_or(0.0);
    }
    let frac = (cursor - index as f64) as f32;
    samples[index] * (1.0 - frac) + samples[index + 1] * frac
}
