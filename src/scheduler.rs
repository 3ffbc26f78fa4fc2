//! Tick gating and the per-frame audio-to-visual pipeline.

use crate::analysis::{self, AnalysisContext, DrivingScalars, SpectrumAnalyzer};
use crate::audio::{TapBridge, TapSink, TapState};
use crate::params::AnalyzerConfig;
use crate::viz::VisualSystem;
use glam::Mat4;

/// Runs one visual tick per display refresh while mounted.
///
/// Every tick runs attach, snapshot, reduce, advance in order and yields
/// the frame's model matrix. After `unmount` the pipeline is inert: stray
/// callbacks produce no frame and advance nothing, so a disposed loop can
/// never tick against released resources.
pub struct Scheduler {
    analyzer: Option<SpectrumAnalyzer>,
    analyzer_config: AnalyzerConfig,
    bridge: TapBridge,
    pub visual: VisualSystem,
    mounted: bool,
}

impl Scheduler {
    pub fn new(visual: VisualSystem) -> Self {
        Self {
            analyzer: None,
            analyzer_config: AnalyzerConfig::default(),
            bridge: TapBridge::new(),
            visual,
            mounted: false,
        }
    }

    /// Install the spectrum analyzer once audio is up
    pub fn set_analyzer(&mut self, analyzer: SpectrumAnalyzer, config: AnalyzerConfig) {
        self.analyzer = Some(analyzer);
        self.analyzer_config = config;
    }

    pub fn has_analyzer(&self) -> bool {
        self.analyzer.is_some()
    }

    /// Start accepting ticks
    pub fn mount(&mut self) {
        self.mounted = true;
    }

    /// Stop accepting ticks; later `tick` calls are no-ops until remounted
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Run one pipeline tick, or nothing at all when unmounted
    pub fn tick(&mut self, ctx: &AnalysisContext, sink: Option<&TapSink>) -> Option<Mat4> {
        if !self.mounted {
            return None;
        }

        // Attach the tap (or confirm it absent) before this tick's snapshot
        self.bridge.attach(ctx, sink);

        let scalars = match (&mut self.analyzer, self.bridge.state()) {
            (Some(analyzer), TapState::Connected) => {
                analysis::reduce(analyzer.snapshot(), &self.analyzer_config)
            }
            // No audio yet: the idle animation carries the frame
            _ => DrivingScalars::default(),
        };

        Some(self.visual.advance(scalars))
    }
}
