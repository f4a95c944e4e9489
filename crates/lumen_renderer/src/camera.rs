//! Pinhole camera for primary ray generation.

use crate::Ray;
use lumen_core::CameraSettings;
use lumen_math::Vec3;

/// Pinhole camera with the viewport at distance 1 along the view direction.
///
/// The viewport spans `tan(fov / 2)` on each side of its center both
/// horizontally and vertically, independent of the image aspect ratio.
#[derive(Debug, Clone)]
pub struct PinholeCamera {
    pub image_width: u32,
    pub image_height: u32,

    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
}

impl PinholeCamera {
    /// Build the camera from scene settings.
    pub fn new(settings: &CameraSettings) -> Self {
        let center = settings.eye;

        // Calculate camera basis vectors
        let w = (-settings.view_direction).try_normalize().unwrap_or(Vec3::Z);
        let u = settings
            .view_up
            .cross(w)
            .try_normalize()
            .unwrap_or_else(|| w.any_orthonormal_vector());
        let v = w.cross(u);

        // Calculate viewport vectors
        let half_extent = (settings.fov / 2.0).tan();
        let viewport_u = 2.0 * half_extent * u;
        let viewport_v = -2.0 * half_extent * v;

        // Calculate pixel delta vectors
        let width = settings.width.max(1);
        let height = settings.height.max(1);
        let pixel_delta_u = viewport_u / width as f32;
        let pixel_delta_v = viewport_v / height as f32;

        // Calculate upper left pixel location
        let viewport_upper_left = center - w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        Self {
            image_width: settings.width,
            image_height: settings.height,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
        }
    }

    /// Primary ray through the center of pixel (i, j); row 0 is the top.
    pub fn get_ray(&self, i: u32, j: u32) -> Ray {
        let pixel_center =
            self.pixel00_loc + (i as f32) * self.pixel_delta_u + (j as f32) * self.pixel_delta_v;
        Ray::new(self.center, pixel_center - self.center)
    }
}
