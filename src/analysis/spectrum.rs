//! Spectrum extraction over the tap sample feed.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use super::{AnalysisContext, TapFeed};
use crate::params::AnalyzerConfig;

/// Upper bound of a quantized magnitude sample
pub const MAX_MAGNITUDE: u8 = u8::MAX;

/// Windowed FFT over the most recent tap samples, quantized to one byte
/// per frequency bin.
///
/// `snapshot` never blocks on audio and never fails: before any audio has
/// reached the feed it reports all-zero magnitudes, and with a stalled feed
/// it keeps reporting the last complete window.
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    feed: TapFeed,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    /// Linear magnitudes after temporal smoothing
    smoothed: Vec<f32>,
    /// Quantized magnitudes, one per bin; reused across frames
    snapshot: Vec<u8>,
}

impl SpectrumAnalyzer {
    /// Create an analyzer reading from the context's tap feed
    pub fn new(config: AnalyzerConfig, ctx: &AnalysisContext) -> Result<Self, String> {
        Self::with_feed(config, ctx.feed())
    }

    /// Create an analyzer over an explicit sample feed
    pub fn with_feed(config: AnalyzerConfig, feed: TapFeed) -> Result<Self, String> {
        config
            .validate()
            .map_err(|e| format!("Invalid analyzer config: {}", e))?;

        let fft_size = config.fft_size;
        let bin_count = config.bin_count();
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let window = (0..fft_size).map(|i| hann_window(i, fft_size)).collect();

        Ok(Self {
            config,
            feed,
            fft,
            window,
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; bin_count],
            snapshot: vec![0; bin_count],
        })
    }

    /// Quantized magnitude snapshot of the most recent audio window.
    ///
    /// One byte per frequency bin, `fft_size / 2` bins.
    pub fn snapshot(&mut self) -> &[u8] {
        let fft_size = self.config.fft_size;

        let windowed = {
            let mut feed = self.feed.lock().unwrap();
            if feed.len() < fft_size {
                false
            } else {
                // Window the newest fft_size samples; anything older is
                // dropped, the trailing window stays for the next frame
                let start = feed.len() - fft_size;
                for (i, sample) in feed[start..].iter().enumerate() {
                    self.scratch[i] = Complex::new(sample * self.window[i], 0.0);
                }
                feed.drain(..start);
                true
            }
        };

        if windowed {
            self.fft.process(&mut self.scratch);

            let tau = self.config.smoothing;
            let scale = 2.0 / fft_size as f32;
            for bin in 0..self.config.bin_count() {
                let magnitude = self.scratch[bin].norm() * scale;
                self.smoothed[bin] = tau * self.smoothed[bin] + (1.0 - tau) * magnitude;
                self.snapshot[bin] =
                    quantize(self.smoothed[bin], self.config.min_db, self.config.max_db);
            }
        }

        &self.snapshot
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}

/// Map a linear magnitude into the quantized [0, 255] range via dB scaling
fn quantize(magnitude: f32, min_db: f32, max_db: f32) -> u8 {
    if magnitude <= 0.0 {
        return 0;
    }
    let db = 20.0 * magnitude.log10();
    let normalized = ((db - min_db) / (max_db - min_db)).clamp(0.0, 1.0);
    (normalized * f32::from(MAX_MAGNITUDE)).round() as u8
}

/// Hann window function for FFT analysis
fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn feed_from(samples: &[f32]) -> TapFeed {
        Arc::new(Mutex::new(samples.to_vec()))
    }

    fn unsmoothed_config() -> AnalyzerConfig {
        AnalyzerConfig {
            smoothing: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_hann_window() {
        let size = 256;

        // Hann window should be 0 at edges, 1 at center
        assert!((hann_window(0, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size - 1, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_snapshot_is_zero_before_audio() {
        let config = AnalyzerConfig::default();
        let bins = config.bin_count();
        let mut analyzer = SpectrumAnalyzer::with_feed(config, feed_from(&[])).unwrap();

        let snapshot = analyzer.snapshot();
        assert_eq!(snapshot.len(), bins);
        assert!(snapshot.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_partial_window_keeps_zero_snapshot() {
        let config = AnalyzerConfig::default();
        let short = vec![0.5; config.fft_size - 1];
        let mut analyzer = SpectrumAnalyzer::with_feed(config, feed_from(&short)).unwrap();

        assert!(analyzer.snapshot().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_sine_peaks_at_matching_bin() {
        let config = unsmoothed_config();
        let fft_size = config.fft_size;
        let target_bin = 8;

        let samples: Vec<f32> = (0..fft_size)
            .map(|i| (2.0 * PI * target_bin as f32 * i as f32 / fft_size as f32).sin())
            .collect();
        let mut analyzer = SpectrumAnalyzer::with_feed(config, feed_from(&samples)).unwrap();

        let snapshot = analyzer.snapshot();
        let peak = snapshot
            .iter()
            .enumerate()
            .max_by_key(|(_, &b)| b)
            .map(|(bin, _)| bin)
            .unwrap();

        // Hann windowing spreads the peak by at most a bin
        assert!(
            (peak as i64 - target_bin as i64).abs() <= 1,
            "peak at bin {}, expected near {}",
            peak,
            target_bin
        );
        assert!(snapshot[target_bin] > 0);
    }

    #[test]
    fn test_snapshot_reuses_last_window_when_feed_stalls() {
        let config = unsmoothed_config();
        let fft_size = config.fft_size;
        let samples: Vec<f32> = (0..fft_size)
            .map(|i| (2.0 * PI * 4.0 * i as f32 / fft_size as f32).sin())
            .collect();
        let mut analyzer = SpectrumAnalyzer::with_feed(config, feed_from(&samples)).unwrap();

        let first = analyzer.snapshot().to_vec();
        let second = analyzer.snapshot().to_vec();
        assert_eq!(first, second);
        assert!(first.iter().any(|&b| b > 0));
    }

    #[test]
    fn test_quantize_bounds() {
        assert_eq!(quantize(0.0, -100.0, -30.0), 0);
        assert_eq!(quantize(-1.0, -100.0, -30.0), 0);

        // 0 dB is above max_db, saturates
        assert_eq!(quantize(1.0, -100.0, -30.0), MAX_MAGNITUDE);

        // In-range magnitudes land strictly between the rails
        let mid = quantize(0.001, -100.0, -30.0);
        assert!(mid > 0 && mid < MAX_MAGNITUDE);
    }

    #[test]
    fn test_new_from_context() {
        let (_guard, ctx) = crate::analysis::test_support::exclusive_context();
        let mut analyzer = SpectrumAnalyzer::new(AnalyzerConfig::default(), &ctx).unwrap();
        assert!(analyzer.snapshot().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = AnalyzerConfig {
            fft_size: 300,
            ..Default::default()
        };
        assert!(SpectrumAnalyzer::with_feed(config, feed_from(&[])).is_err());
    }
}
