//! Track playback and the playback-to-analysis tap.

mod playback;
mod tap;

// Re-export public types
pub use playback::{PlaybackSystem, Track};
pub use tap::{AudioTap, TapBridge, TapSink, TapState};
