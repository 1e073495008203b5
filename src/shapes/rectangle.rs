// Copyright @yucwang 2026

use super::{LocalHit, Shape};
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

/// Planar quad spanned by two edge vectors from a corner point.
pub struct Rectangle {
    corner: Vector3f,
    edge_u: Vector3f,
    edge_v: Vector3f,
    normal: Vector3f,
    inv_len2_u: Float,
    inv_len2_v: Float,
}

impl Rectangle {
    pub fn new(corner: Vector3f, edge_u: Vector3f, edge_v: Vector3f) -> Self {
        let normal = edge_u.cross(&edge_v).normalize();
        Self {
            corner,
            edge_u,
            edge_v,
            normal,
            inv_len2_u: 1.0 / edge_u.norm_squared(),
            inv_len2_v: 1.0 / edge_v.norm_squared(),
        }
    }
}

impl Shape for Rectangle {
    fn intersect(&self, ray: &Ray3f, t_min: Float, t_max: Float) -> Option<LocalHit> {
        let denom = ray.dir().dot(&self.normal);
        if denom.abs() < 1e-8 {
            return None;
        }
        let t = (self.corner - ray.origin()).dot(&self.normal) / denom;
        if t <= t_min || t >= t_max {
            return None;
        }

        let p = ray.at(t);
        let rel = p - self.corner;
        let u = rel.dot(&self.edge_u) * self.inv_len2_u;
        let v = rel.dot(&self.edge_v) * self.inv_len2_v;
        if u < 0.0 || u > 1.0 || v < 0.0 || v > 1.0 {
            return None;
        }

        Some(LocalHit {
            t,
            pos: p,
            geo_normal: self.normal,
            sh_normal: self.normal,
            uv: Vector2f::new(u, v),
        })
    }
}
