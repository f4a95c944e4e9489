//! Lumen Renderer - CPU path tracing.
//!
//! A brute-force Monte Carlo path tracer for scenes made of spheres, diffuse
//! quad patches and quad area lights. Rays are resolved by linear scan,
//! diffuse bounces use uniform hemisphere sampling, and pixel estimates are
//! Reinhard tone mapped and gamma corrected to 8 bits.

mod bucket;
mod camera;
mod config;
mod hittable;
mod patch;
mod renderer;
mod sampling;
mod scene;
mod sphere;

pub use bucket::{
    generate_buckets, pixel_rng, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use camera::PinholeCamera;
pub use config::{ConfigError, RenderConfig};
pub use hittable::{closest_hit, Hit, Intersect};
pub use patch::{Patch, PatchHit, PatchKind, PATCH_EPSILON};
pub use renderer::{
    color_to_rgb, linear_to_gamma, reinhard, render, render_pixel, tone_map, trace, ImageBuffer,
    GAMMA,
};
pub use sampling::{
    cosine_falloff, gen_f32, orthonormal_basis, uniform_hemisphere, UNIFORM_HEMISPHERE_PDF,
};
pub use scene::Scene;
pub use sphere::Sphere;

/// Re-export the scene material and common math types
pub use lumen_core::Material;
pub use lumen_math::{Color, Interval, Ray, Vec3};
