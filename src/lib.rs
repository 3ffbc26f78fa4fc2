//! Soundsphere library - audio-reactive sphere visualizer

pub mod analysis;
pub mod audio;
pub mod camera;
pub mod cli;
pub mod params;
pub mod rendering;
pub mod scheduler;
pub mod viz;
