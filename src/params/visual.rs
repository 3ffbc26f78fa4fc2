//! Sphere geometry and deformation parameters.

/// Sphere deformation parameters
#[derive(Debug, Clone)]
pub struct DeformationParams {
    /// Sphere radius (world units)
    pub radius_m: f32,

    /// UV sphere subdivisions per axis (rings and segments)
    pub segments: usize,

    /// Peak response to a saturated spectrum: displacement distance for the
    /// ripple strategy, added scale for the pulse strategy
    pub amplitude_scale: f32,

    /// Ripple spatial frequency along the Y axis (radians per world unit)
    pub spatial_frequency: f32,

    /// Ripple temporal frequency (radians per simulated second)
    pub time_frequency: f32,

    /// Simulated-time increment per tick (frame-accumulated, not wall clock)
    pub time_step: f32,

    /// Rotation increment per tick per axis (radians), advanced with or
    /// without audio
    pub rotation_step: f32,
}

impl Default for DeformationParams {
    fn default() -> Self {
        Self {
            radius_m: 2.0,
            segments: 64,
            amplitude_scale: 0.5,
            spatial_frequency: 10.0,
            time_frequency: 5.0,
            time_step: 0.05,
            rotation_step: 0.005,
        }
    }
}
