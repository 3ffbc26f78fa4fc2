//! Soundsphere - an audio-reactive sphere visualizer
//!
//! Plays a single track, folds its spectrum into a handful of normalized
//! driving scalars every frame, and deforms a sphere in time with the music.

use std::sync::Arc;

use clap::Parser;
use glam::Mat4;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use soundsphere::analysis::{AnalysisContext, SpectrumAnalyzer};
use soundsphere::audio::{PlaybackSystem, Track};
use soundsphere::camera::Camera;
use soundsphere::cli::Args;
use soundsphere::params::{AnalyzerConfig, RenderConfig};
use soundsphere::rendering::{RenderSystem, Uniforms};
use soundsphere::scheduler::Scheduler;
use soundsphere::viz::VisualSystem;

/// Main application state: owns the render loop and the lifetimes of the
/// scheduler, playback, and renderer
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Audio side
    playback: Option<PlaybackSystem>,
    context: AnalysisContext,

    // Simulation
    scheduler: Scheduler,
    render_config: RenderConfig,
    /// Sized to the drawable region once, at construction
    view_proj: Mat4,

    // Configuration from the CLI shell
    track_path: Option<String>,
    gain: f32,
}

impl App {
    fn new(args: Args) -> Result<Self, String> {
        let context = AnalysisContext::new()?;
        let visual = VisualSystem::new(args.deformation_params(), args.parse_strategy());
        let render_config = RenderConfig::default();
        let camera = Camera::new(render_config.camera_distance_m);
        let view_proj = camera.view_proj(&render_config);

        Ok(Self {
            window: None,
            render_system: None,
            playback: None,
            context,
            scheduler: Scheduler::new(visual),
            render_config,
            view_proj,
            track_path: args.track,
            gain: args.gain,
        })
    }

    /// Start playback and the analyzer; both failures are non-fatal and
    /// leave the app rendering the idle animation
    fn init_audio(&mut self) {
        if self.playback.is_none() {
            if let Some(path) = &self.track_path {
                match Track::load_wav(path).and_then(|track| PlaybackSystem::new(track, self.gain))
                {
                    Ok(playback) => self.playback = Some(playback),
                    Err(e) => log::error!("Playback unavailable: {}", e),
                }
            }
        }

        if !self.scheduler.has_analyzer() {
            let mut config = AnalyzerConfig::default();
            if let Some(playback) = &self.playback {
                config.sample_rate_hz = playback.sample_rate_hz() as usize;
            }
            match SpectrumAnalyzer::new(config.clone(), &self.context) {
                Ok(analyzer) => self.scheduler.set_analyzer(analyzer, config),
                Err(e) => log::error!("Spectrum analyzer unavailable: {}", e),
            }
        }
    }

    /// Render a single tick
    fn render_frame(&mut self) {
        let Some(render_system) = &self.render_system else {
            return;
        };

        let sink = self.playback.as_ref().map(PlaybackSystem::sink);
        let Some(model) = self.scheduler.tick(&self.context, sink) else {
            return;
        };

        render_system.update_vertices(&self.scheduler.visual.derived);
        render_system.update_uniforms(&Uniforms {
            view_proj: self.view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
        });

        if let Err(e) = render_system.render() {
            log::error!("Render error: {:?}", e);
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        // Re-arm the next tick before any frame work runs
        if self.render_system.is_some() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.render_system.is_some() {
            return; // Already initialized
        }

        let window = match &self.window {
            Some(window) => Arc::clone(window),
            None => {
                let window_attributes = Window::default_attributes()
                    .with_title("Soundsphere - Audio-Reactive Sphere")
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        self.render_config.window_width,
                        self.render_config.window_height,
                    ));

                let window = match event_loop.create_window(window_attributes) {
                    Ok(window) => Arc::new(window),
                    Err(e) => {
                        log::error!("Failed to create window: {}", e);
                        event_loop.exit();
                        return;
                    }
                };
                self.window = Some(Arc::clone(&window));
                window
            }
        };

        match pollster::block_on(RenderSystem::new(window, &self.scheduler.visual.mesh)) {
            Ok(render_system) => self.render_system = Some(render_system),
            Err(e) => {
                log::error!("Failed to initialize renderer: {}", e);
                event_loop.exit();
                return;
            }
        }

        self.init_audio();
        self.scheduler.mount();

        log::info!("Soundsphere is running, press ESC to quit");
    }

    fn suspended(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        // Stop ticking, then release the surface and GPU resources; a later
        // resume rebuilds them without touching playback, tap, or analyzer
        // state
        self.scheduler.unmount();
        if self.render_system.take().is_some() {
            log::info!("Render surface suspended");
        }
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        log::info!("Shutting down");
        // Stop ticking and the output stream (with its tap), then release
        // GPU resources
        self.scheduler.unmount();
        self.playback = None;
        self.render_system = None;
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    let mut app = match App::new(args) {
        Ok(app) => app,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let _ = event_loop.run_app(&mut app);
}
