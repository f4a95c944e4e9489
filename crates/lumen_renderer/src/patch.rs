//! Planar quad patch primitive, used for diffuse surfaces and area lights.
//!
//! The patch is the parallelogram spanned by `V1 - V0` and `V3 - V0` from
//! `V0`. The third corner is stored but does not take part in intersection.

use crate::{hittable::Intersect, Color, Material, Ray};
use lumen_core::QuadRecord;
use lumen_math::{Interval, Mat3, Vec3};

/// Minimum ray parameter accepted for a patch hit (avoids self-intersection).
pub const PATCH_EPSILON: f32 = 1e-4;

/// Rays closer to parallel than this (relative determinant) miss the patch.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Whether a patch reflects light or emits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchKind {
    Surface,
    Light,
}

/// Solution of the patch intersection system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchHit {
    /// Coordinate along `V1 - V0`, in [0, 1]
    pub s1: f32,
    /// Coordinate along `V3 - V0`, in [0, 1]
    pub s2: f32,
    /// Ray parameter, greater than `PATCH_EPSILON`
    pub t: f32,
}

/// A planar quadrilateral.
#[derive(Debug, Clone)]
pub struct Patch {
    corners: [Vec3; 4],
    /// Unit normal
    normal: Vec3,
    material: Material,
    kind: PatchKind,
}

impl Patch {
    /// Create a patch. A zero-length normal falls back to the geometric one.
    pub fn new(corners: [Vec3; 4], normal: Vec3, material: Material, kind: PatchKind) -> Self {
        let normal = normal.try_normalize().unwrap_or_else(|| {
            (corners[1] - corners[0])
                .cross(corners[3] - corners[0])
                .try_normalize()
                .unwrap_or(Vec3::Y)
        });

        Self {
            corners,
            normal,
            material,
            kind,
        }
    }

    /// Create a diffuse surface patch.
    pub fn surface(corners: [Vec3; 4], normal: Vec3, material: Material) -> Self {
        Self::new(corners, normal, material, PatchKind::Surface)
    }

    /// Create an area light patch.
    pub fn light(corners: [Vec3; 4], normal: Vec3, material: Material) -> Self {
        Self::new(corners, normal, material, PatchKind::Light)
    }

    /// Create a patch from a parsed quad record.
    pub fn from_record(record: &QuadRecord, kind: PatchKind) -> Self {
        Self::new(record.corners, record.normal, record.material, kind)
    }

    pub fn corners(&self) -> &[Vec3; 4] {
        &self.corners
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn kind(&self) -> PatchKind {
        self.kind
    }

    /// Solve `[e1, e2, -d] (s1, s2, t) = o - V0` and test the patch bounds.
    pub fn intersect_params(&self, ray: &Ray) -> Option<PatchHit> {
        let v0 = self.corners[0];
        let edge1 = self.corners[1] - v0;
        let edge2 = self.corners[3] - v0;
        let neg_dir = -ray.direction();

        let coefficients = Mat3::from_cols(edge1, edge2, neg_dir);
        let det = coefficients.determinant();
        let scale = edge1.length() * edge2.length() * neg_dir.length();

        // Ray parallel to the plane, or degenerate patch
        if !det.is_finite() || det.abs() <= PARALLEL_EPSILON * scale {
            return None;
        }

        let solution = coefficients.inverse() * (ray.origin() - v0);
        let (s1, s2, t) = (solution.x, solution.y, solution.z);

        if Interval::UNIT.contains(s1) && Interval::UNIT.contains(s2) && t > PATCH_EPSILON {
            Some(PatchHit { s1, s2, t })
        } else {
            None
        }
    }

    /// Emitted radiance for a light, `Diffuse * RGB` albedo for a surface.
    pub fn color(&self) -> Color {
        match self.kind {
            PatchKind::Light => self.material.rgb,
            PatchKind::Surface => self.material.diffuse * self.material.rgb,
        }
    }

    /// Flat ambient color used for points in shadow, 0-255.
    pub fn color_in_shadow(&self) -> Color {
        self.material.ambient * self.material.rgb * 255.0
    }
}

impl Intersect for Patch {
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        self.intersect_params(ray).map(|hit| hit.t)
    }
}
