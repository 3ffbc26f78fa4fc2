//! Sphere base mesh shared read-only by every frame's deformation pass.

use bytemuck::{Pod, Zeroable};
use std::f32::consts::PI;

/// Vertex data for the sphere mesh (position + outward unit normal)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Immutable UV sphere geometry, built once at startup
pub struct SphereMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Build a UV sphere with `segments` subdivisions along both axes
    pub fn new(radius: f32, segments: usize) -> Self {
        let mut vertices = Vec::with_capacity((segments + 1).pow(2));
        let mut indices = Vec::with_capacity(segments.pow(2) * 6);

        // Rings sweep pole to pole, segments sweep around the Y axis
        for ring in 0..=segments {
            let theta = PI * ring as f32 / segments as f32;
            for seg in 0..=segments {
                let phi = 2.0 * PI * seg as f32 / segments as f32;

                let normal = [
                    theta.sin() * phi.cos(),
                    theta.cos(),
                    theta.sin() * phi.sin(),
                ];
                vertices.push(Vertex {
                    position: [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                    normal,
                });
            }
        }

        // Counter-clockwise winding viewed from outside the sphere
        for ring in 0..segments {
            for seg in 0..segments {
                let top_left = (ring * (segments + 1) + seg) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((ring + 1) * (segments + 1) + seg) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    top_right,
                    bottom_left,
                    top_right,
                    bottom_right,
                    bottom_left,
                ]);
            }
        }

        Self { vertices, indices }
    }
}
