//! Audio-reactive sphere: base mesh and per-frame deformation.

mod mesh;
mod system;

// Re-export public types
pub use mesh::{SphereMesh, Vertex};
pub use system::{DeformStrategy, DeformationState, VisualSystem};
