//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (meters, seconds, Hz, etc.)
//! - Documented ranges and meanings
//! - Type safety where possible

mod audio;
mod render;
mod visual;

// Re-export all types
pub use audio::{analysis_constants, AnalyzerConfig};
pub use render::RenderConfig;
pub use visual::DeformationParams;
