//! Per-frame sphere deformation driven by simulated time and audio scalars.

use glam::{EulerRot, Mat4, Quat, Vec3};

use super::mesh::{SphereMesh, Vertex};
use crate::analysis::DrivingScalars;
use crate::params::DeformationParams;

/// Deformation strategy selection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeformStrategy {
    /// Per-vertex displacement along the surface normal
    #[default]
    Ripple,
    /// Rigid uniform scale, vertices untouched
    Pulse,
}

/// Per-frame deformation inputs: simulated time plus the current scalars
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeformationState {
    pub time: f32,
    pub scalars: DrivingScalars,
}

/// Sphere deformation system.
///
/// Time accumulates a fixed step per tick and rotation a fixed increment,
/// with or without audio, so the idle animation never stalls and an
/// identical scalar sequence replays to an identical visual sequence.
pub struct VisualSystem {
    /// Base geometry, shared read-only across frames
    pub mesh: SphereMesh,
    /// Derived vertex buffer, recomputed (not patched) every frame
    pub derived: Vec<Vertex>,
    strategy: DeformStrategy,
    params: DeformationParams,
    state: DeformationState,
    rotation: Vec3,
}

impl VisualSystem {
    pub fn new(params: DeformationParams, strategy: DeformStrategy) -> Self {
        let mesh = SphereMesh::new(params.radius_m, params.segments);
        let derived = mesh.vertices.clone();

        Self {
            mesh,
            derived,
            strategy,
            params,
            state: DeformationState::default(),
            rotation: Vec3::ZERO,
        }
    }

    /// Advance one tick, recompute the deformation, and return the frame's
    /// model matrix (rotation folded with the pulse scale)
    pub fn advance(&mut self, scalars: DrivingScalars) -> Mat4 {
        self.state.time += self.params.time_step;
        self.state.scalars = scalars;
        self.rotation.x += self.params.rotation_step;
        self.rotation.y += self.params.rotation_step;

        let mut scale = 1.0;
        match self.strategy {
            DeformStrategy::Ripple => self.displace(),
            DeformStrategy::Pulse => {
                scale = 1.0 + scalars.energy * self.params.amplitude_scale;
            }
        }

        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0);
        Mat4::from_quat(rotation) * Mat4::from_scale(Vec3::splat(scale))
    }

    /// Recompute the derived vertex buffer from the base mesh
    fn displace(&mut self) {
        let k_spatial = self.params.spatial_frequency;
        let k_time = self.params.time_frequency;
        let drive = self.state.scalars.energy * self.params.amplitude_scale;
        let time = self.state.time;

        for (out, base) in self.derived.iter_mut().zip(&self.mesh.vertices) {
            let displacement = (base.position[1] * k_spatial + time * k_time).sin() * drive;
            out.position = [
                base.position[0] + base.normal[0] * displacement,
                base.position[1] + base.normal[1] * displacement,
                base.position[2] + base.normal[2] * displacement,
            ];
            out.normal = base.normal;
        }
    }

    pub fn state(&self) -> DeformationState {
        self.state
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> DeformationParams {
        DeformationParams {
            segments: 32,
            ..Default::default()
        }
    }

    fn scalars(energy: f32) -> DrivingScalars {
        DrivingScalars {
            energy,
            ..Default::default()
        }
    }

    fn max_displacement(system: &VisualSystem) -> f32 {
        system
            .derived
            .iter()
            .zip(&system.mesh.vertices)
            .map(|(derived, base)| {
                let dx = derived.position[0] - base.position[0];
                let dy = derived.position[1] - base.position[1];
                let dz = derived.position[2] - base.position[2];
                (dx * dx + dy * dy + dz * dz).sqrt()
            })
            .fold(0.0f32, f32::max)
    }

    #[test]
    fn test_replay_is_deterministic() {
        let sequence = [0.2, 0.7, 0.0, 1.0, 0.3];
        let mut first = VisualSystem::new(small_params(), DeformStrategy::Ripple);
        let mut second = VisualSystem::new(small_params(), DeformStrategy::Ripple);

        for &energy in &sequence {
            first.advance(scalars(energy));
            second.advance(scalars(energy));
        }

        assert_eq!(first.state(), second.state());
        assert_eq!(first.rotation(), second.rotation());
        for (a, b) in first.derived.iter().zip(&second.derived) {
            assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn test_idle_animation_advances_without_audio() {
        let params = small_params();
        let time_step = params.time_step;
        let rotation_step = params.rotation_step;
        let mut system = VisualSystem::new(params, DeformStrategy::Ripple);

        let ticks = 10;
        for _ in 0..ticks {
            system.advance(DrivingScalars::default());
        }

        let expected_time = ticks as f32 * time_step;
        let expected_rotation = ticks as f32 * rotation_step;
        assert!((system.state().time - expected_time).abs() < 1e-5);
        assert!((system.rotation().x - expected_rotation).abs() < 1e-6);
        assert!((system.rotation().y - expected_rotation).abs() < 1e-6);
    }

    #[test]
    fn test_silence_leaves_ripple_at_base_geometry() {
        let mut system = VisualSystem::new(small_params(), DeformStrategy::Ripple);
        system.advance(DrivingScalars::default());

        // Zero energy means zero displacement, but rotation still moved
        assert_eq!(max_displacement(&system), 0.0);
        assert!(system.rotation().x > 0.0);
    }

    #[test]
    fn test_saturation_drives_ripple_to_full_amplitude() {
        let params = small_params();
        let amplitude = params.amplitude_scale;
        let mut system = VisualSystem::new(params, DeformStrategy::Ripple);
        system.advance(scalars(1.0));

        // The displacement term peaks at the configured amplitude; the
        // sampled maximum sits just below the analytic peak
        let peak = max_displacement(&system);
        assert!(peak <= amplitude + 1e-5);
        assert!(peak > amplitude * 0.9, "peak {} vs amplitude {}", peak, amplitude);
    }

    /// Uniform scale carried by a rotation * scale model matrix
    fn model_scale(model: Mat4) -> f32 {
        model.x_axis.truncate().length()
    }

    #[test]
    fn test_pulse_scales_rigidly() {
        let params = small_params();
        let amplitude = params.amplitude_scale;
        let mut system = VisualSystem::new(params, DeformStrategy::Pulse);

        let idle = system.advance(scalars(0.0));
        assert!((model_scale(idle) - 1.0).abs() < 1e-6);

        let driven = system.advance(scalars(1.0));
        assert!((model_scale(driven) - (1.0 + amplitude)).abs() < 1e-5);

        // Vertices stay untouched under the pulse strategy
        assert_eq!(max_displacement(&system), 0.0);
    }

    #[test]
    fn test_ripple_model_matrix_is_unscaled() {
        let mut system = VisualSystem::new(small_params(), DeformStrategy::Ripple);

        // Ripple deforms vertices, never the model matrix
        let model = system.advance(scalars(1.0));
        assert!((model_scale(model) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_time_is_frame_accumulated_not_wall_clock() {
        let mut system = VisualSystem::new(small_params(), DeformStrategy::Ripple);

        system.advance(scalars(0.5));
        let first = system.state().time;
        system.advance(scalars(0.5));
        assert!((system.state().time - first - system.params.time_step).abs() < 1e-6);
    }
}
