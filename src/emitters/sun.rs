// Copyright @yucwang 2026

use super::LightSample;
use crate::core::frame::Frame;
use crate::core::rng::SampleRng;
use crate::math::constants::{DIRAC, Float, Vector2f, Vector3f};
use crate::math::warp::sample_uniform_cone;

/// Analytic directional sun. It has zero angular measure as far as MIS
/// is concerned; the cone jitter only softens shadow edges.
pub struct SunLight {
    /// Direction the light travels, from the sun toward the scene.
    pub direction: Vector3f,
    pub color: Vector3f,
    pub intensity: Float,
    /// Half-angle of the sun disk in radians; 0 gives hard shadows.
    pub angular_radius: Float,
}

impl SunLight {
    pub fn new(direction: Vector3f, color: Vector3f, intensity: Float) -> Self {
        Self {
            direction,
            color,
            intensity,
            angular_radius: 0.00465,
        }
    }

    pub fn sample(&self, rng: &mut SampleRng) -> LightSample {
        let u = Vector2f::new(rng.next_f32(), rng.next_f32());

        let len = self.direction.norm();
        if len <= 0.0 {
            return LightSample::invalid();
        }
        let to_light = -self.direction / len;

        let dir = if self.angular_radius > 0.0 {
            let frame = Frame::from_normal(&to_light);
            let local = sample_uniform_cone(&u, self.angular_radius.cos());
            frame.to_world(&local).normalize()
        } else {
            to_light
        };

        // Raw radiance; DIRAC marks that no division took place.
        LightSample {
            radiance_over_pdf: self.color * self.intensity,
            dir_to_light: dir,
            pdf: DIRAC,
        }
    }
}
