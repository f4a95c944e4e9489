//! Direction sampling for diffuse bounces.
//!
//! Every routine takes its random source explicitly so that each render
//! worker can own a private stream.

use lumen_math::Vec3;
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Solid-angle density of `uniform_hemisphere` samples.
pub const UNIFORM_HEMISPHERE_PDF: f32 = 1.0 / (2.0 * PI);

/// Above this |n.y| the basis is built from +X instead of +Y.
const POLE_THRESHOLD: f32 = 0.999;

/// Uniform random f32 in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Build tangent and bitangent vectors completing a frame around `n`.
///
/// `n` must be unit length. Returns `(T, B)` with `T = normalize(up x n)`
/// and `B = n x T`.
pub fn orthonormal_basis(n: Vec3) -> (Vec3, Vec3) {
    let up = if n.y.abs() < POLE_THRESHOLD { Vec3::Y } else { Vec3::X };
    let tangent = up.cross(n).normalize();
    let bitangent = n.cross(tangent);
    (tangent, bitangent)
}

/// Sample a unit direction uniformly over the hemisphere around `normal`.
///
/// The polar angle is measured from the normal and `cos_theta` is uniform,
/// so the density is `UNIFORM_HEMISPHERE_PDF` everywhere. A zero normal
/// falls back to +Y.
pub fn uniform_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let n = normal.try_normalize().unwrap_or(Vec3::Y);

    let cos_theta = gen_f32(rng);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * PI * gen_f32(rng);
    let (sin_phi, cos_phi) = phi.sin_cos();

    let (tangent, bitangent) = orthonormal_basis(n);
    let sample =
        tangent * (sin_theta * cos_phi) + n * cos_theta + bitangent * (sin_theta * sin_phi);

    sample.try_normalize().unwrap_or(n)
}

/// Clamped cosine between a normal and a direction. Zero-length inputs give 0.
pub fn cosine_falloff(normal: Vec3, direction: Vec3) -> f32 {
    match (normal.try_normalize(), direction.try_normalize()) {
        (Some(n), Some(d)) => n.dot(d).max(0.0),
        _ => 0.0,
    }
}
