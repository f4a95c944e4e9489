//! Lumen math - vector types, rays and intervals shared by the loader and the renderer.

// Re-export glam for convenience
pub use glam::*;

mod interval;
mod ray;

pub use interval::Interval;
pub use ray::Ray;

/// RGB color (linear radiance, channels typically 0-1)
pub type Color = Vec3;
