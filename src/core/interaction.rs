// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f, Vector3f, Vector4f};

/// Geometric state at a surface hit, produced by the intersection
/// collaborator and read-only to the integrator. The shading frame is
/// built later, when the material is evaluated.
#[derive(Debug, Clone)]
pub struct SurfaceHit {
    pub pos: Vector3f,
    pub sh_normal: Vector3f,
    pub geo_normal: Vector3f,
    pub uv: Vector2f,
    pub color: Vector4f,
}

impl SurfaceHit {
    /// Build the hit state from raw shape output: flips the geometric
    /// normal toward the ray origin and keeps the shading normal on the
    /// same side.
    pub fn new(
        pos: Vector3f,
        geo_normal: Vector3f,
        sh_normal: Vector3f,
        uv: Vector2f,
        ray_origin: &Vector3f,
    ) -> Self {
        let v = ray_origin - pos;
        let mut geo_normal = geo_normal;
        if geo_normal.dot(&v) < 0.0 {
            geo_normal = -geo_normal;
        }

        let mut sh_normal = sh_normal;
        if geo_normal.dot(&sh_normal) < 0.0 {
            sh_normal = -sh_normal;
        }

        Self {
            pos,
            sh_normal,
            geo_normal,
            uv,
            color: Vector4f::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    /// Interpolated vertex or instance color, multiplied into the base
    /// color during material evaluation.
    pub fn with_color(mut self, color: Vector4f) -> Self {
        self.color = color;
        self
    }
}

/// What the closest-hit query hands back to the integrator loop.
#[derive(Debug, Clone)]
pub struct HitPayload {
    pub t: Float,
    pub material_id: usize,
    pub hit: SurfaceHit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_normal_faces_ray_origin() {
        let origin = Vector3f::new(0.0, 5.0, 0.0);
        let hit = SurfaceHit::new(
            Vector3f::zeros(),
            Vector3f::new(0.0, -1.0, 0.0),
            Vector3f::new(0.0, -1.0, 0.0),
            Vector2f::zeros(),
            &origin,
        );
        assert!(hit.geo_normal.y > 0.0);
        // Shading normal flipped to the geometric side too.
        assert!(hit.sh_normal.y > 0.0);
    }

    #[test]
    fn test_color_defaults_to_white() {
        let hit = SurfaceHit::new(
            Vector3f::zeros(),
            Vector3f::new(0.0, 1.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Vector2f::zeros(),
            &Vector3f::new(0.0, 1.0, 0.0),
        );
        assert_eq!(hit.color, Vector4f::new(1.0, 1.0, 1.0, 1.0));
        let tinted = hit.with_color(Vector4f::new(0.5, 0.25, 1.0, 1.0));
        assert_eq!(tinted.color.y, 0.25);
    }
}
