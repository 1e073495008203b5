// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f};

/// Analytic gradient sky with a sun disk, used for miss rays when the
/// scene runs in sun/sky mode.
pub struct SkyDescriptor {
    pub zenith_color: Vector3f,
    pub horizon_color: Vector3f,
    pub ground_color: Vector3f,
    /// Direction the sun light travels (toward the scene).
    pub sun_direction: Vector3f,
    pub sun_color: Vector3f,
    pub sun_intensity: Float,
    /// Cosine of the sun disk half-angle.
    pub sun_cos_angle: Float,
}

impl Default for SkyDescriptor {
    fn default() -> Self {
        Self {
            zenith_color: Vector3f::new(0.17, 0.37, 0.65),
            horizon_color: Vector3f::new(0.50, 0.70, 0.92),
            ground_color: Vector3f::new(0.62, 0.59, 0.55),
            sun_direction: Vector3f::new(0.33, -0.81, 0.48),
            sun_color: Vector3f::new(1.0, 0.96, 0.90),
            sun_intensity: 10.0,
            sun_cos_angle: 0.9999891,
        }
    }
}

impl SkyDescriptor {
    pub fn eval(&self, dir: &Vector3f) -> Vector3f {
        let len = dir.norm();
        if len <= 0.0 {
            return Vector3f::zeros();
        }
        let d = dir / len;

        let sky = if d.y >= 0.0 {
            let t = d.y.min(1.0).powf(0.5);
            self.horizon_color * (1.0 - t) + self.zenith_color * t
        } else {
            let t = (-d.y).min(1.0).powf(0.5);
            self.horizon_color * (1.0 - t) + self.ground_color * t
        };

        let sun_len = self.sun_direction.norm();
        if sun_len > 0.0 && d.dot(&(-self.sun_direction / sun_len)) >= self.sun_cos_angle {
            return sky + self.sun_color * self.sun_intensity;
        }
        sky
    }
}
