//! Scene description types for Lumen.
//!
//! These are plain data records produced by the scene loader. They carry no
//! behavior beyond simple bookkeeping; the renderer converts them into its
//! own primitives.

use std::f32::consts::FRAC_PI_2;

use lumen_math::{Color, Vec3};

/// Surface material shared by spheres, quads and lights.
///
/// For lights only `rgb` is meaningful and is read as emitted radiance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Albedo (or emission for lights), RGB 0-1
    pub rgb: Color,

    /// Ambient coefficient
    pub ambient: f32,

    /// Diffuse coefficient
    pub diffuse: f32,

    /// Specular coefficient
    pub specular: f32,

    /// Specular exponent
    pub shininess: f32,

    /// Reflection coefficient (carried, not used by the path tracer)
    pub reflection: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            rgb: Color::splat(0.5), // Grey default
            ambient: 0.0,
            diffuse: 1.0,
            specular: 0.0,
            shininess: 1.0,
            reflection: 0.0,
        }
    }
}

impl Material {
    /// Create a material from the eight values of an `M` record:
    /// r g b ambient diffuse specular shininess reflection.
    pub fn from_values(values: [f32; 8]) -> Self {
        let [r, g, b, ambient, diffuse, specular, shininess, reflection] = values;
        Self {
            rgb: Color::new(r, g, b),
            ambient,
            diffuse,
            specular,
            shininess,
            reflection,
        }
    }

    /// Create a purely diffuse material with the given albedo.
    pub fn diffuse(rgb: Color) -> Self {
        Self {
            rgb,
            ..Default::default()
        }
    }

    /// Create a light material emitting the given radiance.
    pub fn emissive(rgb: Color) -> Self {
        Self {
            rgb,
            ambient: 0.0,
            diffuse: 0.0,
            specular: 0.0,
            shininess: 1.0,
            reflection: 0.0,
        }
    }
}

/// Pinhole camera and output resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSettings {
    /// Eye position
    pub eye: Vec3,

    /// Viewing direction (need not be normalized)
    pub view_direction: Vec3,

    /// Up hint
    pub view_up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            eye: Vec3::ZERO,
            view_direction: Vec3::NEG_Z,
            view_up: Vec3::Y,
            fov: FRAC_PI_2,
            width: 256,
            height: 256,
        }
    }
}

impl CameraSettings {
    /// Total number of pixels in the output image.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// A sphere record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereRecord {
    pub center: Vec3,
    pub radius: f32,
    pub material: Material,
}

/// A quadrilateral record, used for both diffuse quads and area lights.
///
/// Only corners 0, 1 and 3 span the patch; corner 2 is kept as declared.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadRecord {
    pub corners: [Vec3; 4],
    pub normal: Vec3,
    pub material: Material,
}

/// A complete parsed scene: camera plus the three primitive collections.
#[derive(Clone, Debug, Default)]
pub struct SceneDescription {
    /// Camera settings and resolution
    pub camera: CameraSettings,

    /// Spheres, in declaration order
    pub spheres: Vec<SphereRecord>,

    /// Diffuse quads, in declaration order
    pub quads: Vec<QuadRecord>,

    /// Area lights, in declaration order
    pub lights: Vec<QuadRecord>,
}

impl SceneDescription {
    /// Create an empty scene with the given camera.
    pub fn new(camera: CameraSettings) -> Self {
        Self {
            camera,
            ..Default::default()
        }
    }

    /// Total primitive count across all three collections.
    pub fn primitive_count(&self) -> usize {
        self.spheres.len() + self.quads.len() + self.lights.len()
    }

    /// Check if the scene has no geometry at all.
    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }
}
