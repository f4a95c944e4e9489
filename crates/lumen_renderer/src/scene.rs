//! Immutable render scene and closest-hit resolution.

use crate::hittable::{closest_hit, Hit};
use crate::{Patch, PatchKind, Ray, Sphere};
use lumen_core::SceneDescription;

/// The three primitive collections, built once and shared read-only by all
/// render workers.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    spheres: Vec<Sphere>,
    patches: Vec<Patch>,
    lights: Vec<Patch>,
}

impl Scene {
    /// Create a scene from its primitive collections.
    pub fn new(spheres: Vec<Sphere>, patches: Vec<Patch>, lights: Vec<Patch>) -> Self {
        Self {
            spheres,
            patches,
            lights,
        }
    }

    /// Build a scene from a parsed description.
    pub fn from_description(description: &SceneDescription) -> Self {
        let spheres = description
            .spheres
            .iter()
            .map(|s| Sphere::new(s.center, s.radius, s.material))
            .collect();
        let patches = description
            .quads
            .iter()
            .map(|q| Patch::from_record(q, PatchKind::Surface))
            .collect();
        let lights = description
            .lights
            .iter()
            .map(|l| Patch::from_record(l, PatchKind::Light))
            .collect();

        Self::new(spheres, patches, lights)
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn lights(&self) -> &[Patch] {
        &self.lights
    }

    /// Total number of primitives.
    pub fn len(&self) -> usize {
        self.spheres.len() + self.patches.len() + self.lights.len()
    }

    /// Check if the scene has no primitives.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find the globally closest hit across spheres, patches and lights.
    ///
    /// Each collection is scanned independently; the nearest of the three
    /// category minima wins. Exact ties go to patches, then lights, then
    /// spheres.
    pub fn resolve(&self, ray: &Ray) -> Hit<'_> {
        let mut hit = Hit::None;
        let mut closest = f32::INFINITY;

        if let Some((patch, t)) = closest_hit(&self.patches, ray) {
            closest = t;
            hit = Hit::Patch {
                patch,
                t,
                position: ray.at(t),
            };
        }

        if let Some((light, t)) = closest_hit(&self.lights, ray) {
            if t < closest {
                closest = t;
                hit = Hit::Light {
                    light,
                    t,
                    position: ray.at(t),
                };
            }
        }

        if let Some((sphere, t)) = closest_hit(&self.spheres, ray) {
            if t < closest {
                hit = Hit::Sphere {
                    sphere,
                    t,
                    position: ray.at(t),
                };
            }
        }

        hit
    }
}
