//! Audio analysis: shared tap feed, spectrum extraction, feature reduction.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

mod features;
mod spectrum;

// Re-export public types
pub use features::{reduce, DrivingScalars};
pub use spectrum::{SpectrumAnalyzer, MAX_MAGNITUDE};

/// Mono sample feed shared between the playback tap and the analyzer
pub type TapFeed = Arc<Mutex<Vec<f32>>>;

static CONTEXT_LIVE: AtomicBool = AtomicBool::new(false);

/// Process-wide analysis context owning the tap sample feed.
///
/// At most one context may exist per process; the constructor rejects a
/// second live instance. Dropping the context releases the guard.
pub struct AnalysisContext {
    feed: TapFeed,
}

impl AnalysisContext {
    pub fn new() -> Result<Self, String> {
        if CONTEXT_LIVE.swap(true, Ordering::SeqCst) {
            return Err("Analysis context already exists in this process".to_string());
        }
        Ok(Self {
            feed: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Clone a handle to the tap sample feed
    pub fn feed(&self) -> TapFeed {
        Arc::clone(&self.feed)
    }
}

impl Drop for AnalysisContext {
    fn drop(&mut self) {
        CONTEXT_LIVE.store(false, Ordering::SeqCst);
    }
}
