//! Sphere primitive for ray tracing.

use crate::{hittable::Intersect, Color, Material, Ray};
use lumen_math::{Interval, Vec3};

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Material,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Local Blinn-Phong shading against a single white point light.
    ///
    /// Returns ambient + diffuse + specular scaled to 0-255 and clamped per
    /// channel. The path tracer never calls this; spheres are light-inert there.
    pub fn shade(&self, position: Vec3, incoming_dir: Vec3, light_pos: Vec3) -> Color {
        let m = &self.material;
        let normal = (position - self.center).try_normalize().unwrap_or(Vec3::Y);
        let light_dir = (light_pos - position).try_normalize().unwrap_or(normal);
        let view_dir = (-incoming_dir).try_normalize().unwrap_or(normal);
        let light_color = Color::ONE;

        let ambient = m.ambient * m.rgb;

        let diffuse = light_dir.dot(normal).max(0.0) * m.diffuse * m.rgb;

        let half = (light_dir + view_dir).try_normalize().unwrap_or(normal);
        let specular = half.dot(normal).max(0.0).powf(m.shininess) * m.specular * light_color;

        let range = Interval::new(0.0, 255.0);
        let color = (ambient + diffuse + specular) * 255.0;
        Color::new(range.clamp(color.x), range.clamp(color.y), range.clamp(color.z))
    }

    /// Flat ambient color used for points in shadow, 0-255.
    pub fn color_in_shadow(&self) -> Color {
        self.material.ambient * self.material.rgb * 255.0
    }
}

impl Intersect for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let oc = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        if a == 0.0 {
            return None;
        }
        let b = 2.0 * oc.dot(ray.direction());
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        // Only the near root is considered. From inside the sphere it is
        // negative, so the sphere is not hit.
        let t = (-b - discriminant.sqrt()) / (2.0 * a);
        Interval::POSITIVE.surrounds(t).then_some(t)
    }
}
