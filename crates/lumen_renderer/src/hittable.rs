//! Intersect trait and the tagged hit result for closest-hit queries.

use crate::{Patch, Ray, Sphere};
use lumen_math::{Interval, Vec3};

/// Trait for primitives that can be hit by rays.
pub trait Intersect: Send + Sync {
    /// Ray parameter of the intersection, or `None` when the ray misses.
    ///
    /// Only positive parameters count as hits.
    fn intersect(&self, ray: &Ray) -> Option<f32>;
}

/// Result of resolving a ray against a scene.
///
/// At most one primitive is ever referenced.
#[derive(Debug, Clone, Copy)]
pub enum Hit<'a> {
    /// Nothing was hit
    None,
    /// A sphere (occluder only in the path tracer)
    Sphere {
        sphere: &'a Sphere,
        t: f32,
        position: Vec3,
    },
    /// A diffuse surface patch
    Patch {
        patch: &'a Patch,
        t: f32,
        position: Vec3,
    },
    /// An area light
    Light {
        light: &'a Patch,
        t: f32,
        position: Vec3,
    },
}

impl<'a> Hit<'a> {
    /// Check if nothing was hit.
    pub fn is_none(&self) -> bool {
        matches!(self, Hit::None)
    }
}

/// Find the closest positive hit in a slice by linear scan.
///
/// On an exact tie the object declared first wins.
pub fn closest_hit<'a, T: Intersect>(objects: &'a [T], ray: &Ray) -> Option<(&'a T, f32)> {
    let mut closest: Option<(&'a T, f32)> = None;

    for object in objects {
        let Some(t) = object.intersect(ray) else {
            continue;
        };
        if !Interval::POSITIVE.surrounds(t) {
            continue;
        }
        if closest.map_or(true, |(_, closest_t)| t < closest_t) {
            closest = Some((object, t));
        }
    }

    closest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Material};

    fn sphere_at(z: f32) -> Sphere {
        Sphere::new(Vec3::new(0.0, 0.0, z), 0.5, Material::diffuse(Color::ONE))
    }

    #[test]
    fn test_closest_hit_picks_nearest() {
        let spheres = vec![sphere_at(-10.0), sphere_at(-3.0), sphere_at(-6.0)];
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let (sphere, t) = closest_hit(&spheres, &ray).unwrap();
        assert!((t - 2.5).abs() < 1e-5);
        assert_eq!(sphere.center().z, -3.0);
    }

    #[test]
    fn test_closest_hit_tie_keeps_first() {
        let spheres = vec![sphere_at(-3.0), sphere_at(-3.0)];
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let (sphere, _) = closest_hit(&spheres, &ray).unwrap();
        assert!(std::ptr::eq(sphere, &spheres[0]));
    }

    #[test]
    fn test_closest_hit_empty_and_miss() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let empty: Vec<Sphere> = Vec::new();
        assert!(closest_hit(&empty, &ray).is_none());

        let behind = vec![sphere_at(5.0)];
        assert!(closest_hit(&behind, &ray).is_none());
    }
}
