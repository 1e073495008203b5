// Copyright @yucwang 2026

use crate::core::rng::SampleRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::constants::{Vector2f, Vector3f};

pub trait Integrator: Sync {
    /// Estimate the radiance for one (pixel, sample) pair. The rng is
    /// the instance's exclusive sample stream.
    fn trace_ray_forward(
        &self,
        scene: &Scene,
        sensor: &dyn Sensor,
        pixel: Vector2f,
        rng: &mut SampleRng,
    ) -> Vector3f;

    fn samples_per_pixel(&self) -> u32;
}
