//! Command-line argument parsing.

use clap::Parser;

use crate::params::DeformationParams;
use crate::viz::DeformStrategy;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Soundsphere")]
#[command(about = "Audio-reactive sphere visualizer", long_about = None)]
pub struct Args {
    /// WAV track to play and analyze (idle animation when omitted)
    #[arg(long, value_name = "PATH")]
    pub track: Option<String>,

    /// Deformation strategy: ripple (default) or pulse
    #[arg(long, value_name = "STRATEGY", default_value = "ripple")]
    pub deform: String,

    /// Peak displacement/scale response to a saturated spectrum
    #[arg(long, value_name = "AMOUNT", default_value = "0.5")]
    pub amplitude: f32,

    /// Playback gain (1.0 = unity)
    #[arg(long, value_name = "GAIN", default_value = "1.0")]
    pub gain: f32,
}

impl Args {
    /// Parse deformation strategy from command-line arguments
    pub fn parse_strategy(&self) -> DeformStrategy {
        match self.deform.to_lowercase().as_str() {
            "ripple" => DeformStrategy::Ripple,
            "pulse" => DeformStrategy::Pulse,
            other => {
                log::warn!("Unknown deform strategy '{}', using ripple", other);
                DeformStrategy::Ripple
            }
        }
    }

    /// Build deformation parameters from defaults plus CLI overrides
    pub fn deformation_params(&self) -> DeformationParams {
        DeformationParams {
            amplitude_scale: self.amplitude,
            ..Default::default()
        }
    }
}
