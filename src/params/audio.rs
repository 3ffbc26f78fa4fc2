//! Audio analysis configuration and constants.

use std::ops::Range;

/// Spectrum analysis configuration with frequency band mappings
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Audio sample rate (Hz)
    pub sample_rate_hz: usize,

    /// FFT window size (must be power of 2)
    /// Default 256 = 128 magnitude bins
    pub fft_size: usize,

    /// Temporal smoothing factor applied to linear magnitudes, in [0, 1)
    /// 0 = no smoothing, higher = slower response
    pub smoothing: f32,

    /// Magnitude (dB) mapped to quantized value 0
    pub min_db: f32,

    /// Magnitude (dB) mapped to quantized value 255
    pub max_db: f32,

    /// Bass frequency range (Hz)
    pub low_range_hz: (f32, f32),

    /// Mid frequency range (Hz)
    pub mid_range_hz: (f32, f32),

    /// High frequency range (Hz)
    pub high_range_hz: (f32, f32),
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_size: 256,
            smoothing: 0.8,
            min_db: -100.0,
            max_db: -30.0,
            low_range_hz: (0.0, 250.0),
            mid_range_hz: (250.0, 2000.0),
            high_range_hz: (2000.0, 8000.0),
        }
    }
}

impl AnalyzerConfig {
    /// Number of magnitude bins per snapshot (half the FFT window)
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Convert frequency (Hz) to FFT bin index
    pub fn hz_to_bin(&self, hz: f32) -> usize {
        ((hz * self.fft_size as f32) / self.sample_rate_hz as f32) as usize
    }

    /// Get bin range for bass frequencies
    pub fn low_bins(&self) -> Range<usize> {
        self.band_bins(self.low_range_hz)
    }

    /// Get bin range for mid frequencies
    pub fn mid_bins(&self) -> Range<usize> {
        self.band_bins(self.mid_range_hz)
    }

    /// Get bin range for high frequencies
    pub fn high_bins(&self) -> Range<usize> {
        self.band_bins(self.high_range_hz)
    }

    fn band_bins(&self, range_hz: (f32, f32)) -> Range<usize> {
        let end = self.hz_to_bin(range_hz.1).min(self.bin_count());
        let start = self.hz_to_bin(range_hz.0).min(end);
        start..end
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() {
            return Err(format!(
                "FFT size must be power of 2, got {}",
                self.fft_size
            ));
        }
        if self.sample_rate_hz == 0 {
            return Err("Sample rate must be > 0".to_string());
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(format!("Smoothing must be in [0, 1), got {}", self.smoothing));
        }
        if self.min_db >= self.max_db {
            return Err(format!(
                "min_db {} must be below max_db {}",
                self.min_db, self.max_db
            ));
        }
        Ok(())
    }
}

/// Audio constants (compile-time)
pub mod analysis_constants {
    /// Maximum mono samples retained in the tap feed before the oldest
    /// are dropped (the analyzer only ever needs the latest window)
    pub const TAP_FEED_CAP: usize = 4096;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hz_to_bin() {
        let config = AnalyzerConfig::default();

        // At 44100 Hz sample rate and 256 FFT size:
        // Bin resolution = 44100 / 256 ≈ 172.3 Hz per bin
        assert_eq!(config.hz_to_bin(0.0), 0);
        assert_eq!(config.hz_to_bin(172.3), 1);
        assert_eq!(config.hz_to_bin(2000.0), 11);
    }

    #[test]
    fn test_band_ranges_ordered_and_in_bounds() {
        let config = AnalyzerConfig::default();

        let low = config.low_bins();
        let mid = config.mid_bins();
        let high = config.high_bins();

        assert!(!low.is_empty());
        assert!(mid.start >= low.end);
        assert!(high.start >= mid.end);
        assert!(high.end <= config.bin_count());
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        let mut config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());

        config.fft_size = 300;
        assert!(config.validate().is_err());

        config = AnalyzerConfig {
            smoothing: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config = AnalyzerConfig {
            min_db: -10.0,
            max_db: -30.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
