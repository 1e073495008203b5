// Copyright @yucwang 2026

use super::{LocalHit, Shape};
use crate::math::constants::{Float, PI, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

pub struct Sphere {
    pub center: Vector3f,
    pub radius: Float,
}

impl Sphere {
    pub fn new(center: Vector3f, radius: Float) -> Self {
        Self { center, radius }
    }

    fn uv_at(&self, n: &Vector3f) -> Vector2f {
        let phi = n.z.atan2(n.x);
        let theta = n.y.clamp(-1.0, 1.0).acos();
        Vector2f::new((phi + PI) / (2.0 * PI), theta / PI)
    }
}

impl Shape for Sphere {
    fn intersect(&self, ray: &Ray3f, t_min: Float, t_max: Float) -> Option<LocalHit> {
        let oc = ray.origin() - self.center;
        let d = ray.dir();
        let a = d.dot(&d);
        if a <= 0.0 {
            return None;
        }
        let half_b = oc.dot(&d);
        let c = oc.dot(&oc) - self.radius * self.radius;
        let disc = half_b * half_b - a * c;
        if disc < 0.0 {
            return None;
        }

        let sqrt_disc = disc.sqrt();
        let mut t = (-half_b - sqrt_disc) / a;
        if t <= t_min || t >= t_max {
            t = (-half_b + sqrt_disc) / a;
            if t <= t_min || t >= t_max {
                return None;
            }
        }

        let pos = ray.at(t);
        let n = (pos - self.center) / self.radius;
        Some(LocalHit {
            t,
            pos,
            geo_normal: n,
            sh_normal: n,
            uv: self.uv_at(&n),
        })
    }
}
