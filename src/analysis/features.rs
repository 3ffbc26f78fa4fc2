//! Feature reduction from spectrum snapshots to driving scalars.

use std::ops::Range;

use super::MAX_MAGNITUDE;
use crate::params::AnalyzerConfig;

/// Normalized audio features driving the visuals (all fields in [0, 1])
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DrivingScalars {
    /// Overall spectral energy (snapshot mean)
    pub energy: f32,
    /// Bass band energy
    pub low: f32,
    /// Mid band energy
    pub mid: f32,
    /// High band energy
    pub high: f32,
}

/// Collapse a magnitude snapshot into driving scalars.
///
/// Pure function of the snapshot and band configuration; no hidden state.
/// An empty snapshot or empty band reduces to 0.
pub fn reduce(snapshot: &[u8], config: &AnalyzerConfig) -> DrivingScalars {
    DrivingScalars {
        energy: band_mean(snapshot, 0..snapshot.len()),
        low: band_mean(snapshot, config.low_bins()),
        mid: band_mean(snapshot, config.mid_bins()),
        high: band_mean(snapshot, config.high_bins()),
    }
}

/// Mean of a bin range, normalized by the magnitude ceiling
fn band_mean(snapshot: &[u8], bins: Range<usize>) -> f32 {
    let end = bins.end.min(snapshot.len());
    let start = bins.start.min(end);
    let band = &snapshot[start..end];
    if band.is_empty() {
        return 0.0;
    }

    let sum: u32 = band.iter().map(|&b| u32::from(b)).sum();
    sum as f32 / (band.len() as f32 * f32::from(MAX_MAGNITUDE))
}
