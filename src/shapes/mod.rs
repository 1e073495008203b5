// Copyright @yucwang 2026

pub mod rectangle;
pub mod sphere;

use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

/// Raw intersection output from a shape, before the hit state is built.
#[derive(Debug, Clone)]
pub struct LocalHit {
    pub t: Float,
    pub pos: Vector3f,
    pub geo_normal: Vector3f,
    pub sh_normal: Vector3f,
    pub uv: Vector2f,
}

pub trait Shape: Send + Sync {
    /// Closest intersection with `t` in (t_min, t_max), if any.
    fn intersect(&self, ray: &Ray3f, t_min: Float, t_max: Float) -> Option<LocalHit>;
}
