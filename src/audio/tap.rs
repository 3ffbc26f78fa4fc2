//! Non-destructive tap bridging playback output into the analysis feed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::analysis::{AnalysisContext, TapFeed};

/// Tap connection state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapState {
    Unconnected,
    Connected,
}

/// Live observation point on the playback signal path.
///
/// At most one tap exists per playback source; it lives until teardown and
/// is never rebuilt while the source lives.
pub struct AudioTap {
    state: TapState,
}

impl AudioTap {
    pub fn state(&self) -> TapState {
        self.state
    }
}

/// Receiving side of the tap, owned by the playback system.
///
/// The playback callback copies every rendered mono sample into the
/// connected feed; the audible output itself is never gated or delayed.
#[derive(Default)]
pub struct TapSink {
    slot: Mutex<Option<TapFeed>>,
    connections: AtomicUsize,
}

impl TapSink {
    /// Wire a feed into the sink; a second connection is ignored
    pub fn connect(&self, feed: TapFeed) {
        let mut slot = self.slot.lock().unwrap();
        if slot.is_none() {
            *slot = Some(feed);
            self.connections.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Number of feeds ever wired in (at most 1 per sink)
    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Push a block of mono samples into the connected feed, if any.
    ///
    /// Drops the oldest samples once the feed grows past `cap`, so a
    /// stalled consumer never causes unbounded growth.
    pub fn push(&self, samples: &[f32], cap: usize) {
        let slot = self.slot.lock().unwrap();
        if let Some(feed) = slot.as_ref() {
            let mut buffer = feed.lock().unwrap();
            buffer.extend_from_slice(samples);
            let len = buffer.len();
            if len > cap {
                buffer.drain(..len - cap);
            }
        }
    }
}

/// Bridges a live playback stream into the analysis context.
///
/// Holds the single `AudioTap` for the playback source in an owned slot;
/// attaching twice is a no-op that reports the existing state.
#[derive(Default)]
pub struct TapBridge {
    tap: Option<AudioTap>,
}

impl TapBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the playback sink to the analysis feed.
    ///
    /// Returns `Unconnected` without side effects when the sink is not yet
    /// available; the caller may retry on a later tick.
    pub fn attach(&mut self, ctx: &AnalysisContext, sink: Option<&TapSink>) -> TapState {
        if let Some(tap) = &self.tap {
            return tap.state();
        }

        let Some(sink) = sink else {
            return TapState::Unconnected;
        };

        sink.connect(ctx.feed());
        self.tap = Some(AudioTap {
            state: TapState::Connected,
        });
        TapState::Connected
    }

    pub fn state(&self) -> TapState {
        self.tap
            .as_ref()
            .map_or(TapState::Unconnected, AudioTap::state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::exclusive_context;

    #[test]
    fn test_attach_before_sink_is_ready() {
        let (_guard, ctx) = exclusive_context();
        let mut bridge = TapBridge::new();

        // Source not ready yet: no error, no side effects
        assert_eq!(bridge.attach(&ctx, None), TapState::Unconnected);
        assert_eq!(bridge.state(), TapState::Unconnected);

        // Retry once the sink exists connects exactly once
        let sink = TapSink::default();
        assert_eq!(bridge.attach(&ctx, Some(&sink)), TapState::Connected);
        assert_eq!(sink.connection_count(), 1);
    }

    #[test]
    fn test_attach_is_idempotent() {
        let (_guard, ctx) = exclusive_context();
        let mut bridge = TapBridge::new();
        let sink = TapSink::default();

        assert_eq!(bridge.attach(&ctx, Some(&sink)), TapState::Connected);
        assert_eq!(bridge.attach(&ctx, Some(&sink)), TapState::Connected);
        assert_eq!(bridge.attach(&ctx, None), TapState::Connected);

        // No duplicate graph wiring
        assert_eq!(sink.connection_count(), 1);
    }

    #[test]
    fn test_unconnected_sink_drops_samples() {
        let sink = TapSink::default();

        // Nothing to receive them, nothing to observe, no panic
        sink.push(&[0.1, 0.2, 0.3], 16);
        assert_eq!(sink.connection_count(), 0);
    }

    #[test]
    fn test_connected_sink_feeds_analysis() {
        let (_guard, ctx) = exclusive_context();
        let mut bridge = TapBridge::new();
        let sink = TapSink::default();
        bridge.attach(&ctx, Some(&sink));

        sink.push(&[0.5; 8], 16);
        assert_eq!(ctx.feed().lock().unwrap().len(), 8);
    }

    #[test]
    fn test_feed_is_capacity_capped() {
        let (_guard, ctx) = exclusive_context();
        let mut bridge = TapBridge::new();
        let sink = TapSink::default();
        bridge.attach(&ctx, Some(&sink));

        sink.push(&[1.0; 10], 16);
        sink.push(&[2.0; 10], 16);

        let feed = ctx.feed();
        let buffer = feed.lock().unwrap();
        assert_eq!(buffer.len(), 16);
        // Oldest samples were dropped, newest survive
        assert_eq!(buffer[buffer.len() - 1], 2.0);
        assert_eq!(buffer[0], 1.0);
    }
}
