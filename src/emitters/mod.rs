// Copyright @yucwang 2026

pub mod envmap;
pub mod sky;
pub mod sun;

use crate::core::rng::SampleRng;
use crate::math::constants::{DIRAC, Float, Vector3f};

pub use envmap::EnvMap;
pub use sky::SkyDescriptor;
pub use sun::SunLight;

/// One light-sampling draw. `radiance_over_pdf` is already divided by
/// the pdf for finite lights; for a delta light the raw radiance is
/// returned and `pdf` carries the `DIRAC` sentinel (MIS weight collapses
/// to 1). `pdf == 0` marks a degenerate sample the caller must discard.
#[derive(Debug, Clone, Copy)]
pub struct LightSample {
    pub radiance_over_pdf: Vector3f,
    pub dir_to_light: Vector3f,
    pub pdf: Float,
}

impl LightSample {
    pub fn invalid() -> Self {
        Self {
            radiance_over_pdf: Vector3f::zeros(),
            dir_to_light: Vector3f::new(0.0, 1.0, 0.0),
            pdf: 0.0,
        }
    }

    pub fn is_delta(&self) -> bool {
        self.pdf == DIRAC
    }
}

/// The scene-wide light representation: either the analytic sun with its
/// procedural sky, or an importance-sampled HDR environment. Dispatch
/// happens once per sampler call instead of branching through the
/// integrator.
pub enum LightSource {
    Sun { sun: SunLight, sky: SkyDescriptor },
    Environment(EnvMap),
}

impl LightSource {
    /// Draw a light direction for next-event estimation. The RNG
    /// consumption is fixed per variant (sun: 2 draws, environment: 3)
    /// so the sample sequence stays reproducible.
    pub fn sample(&self, rng: &mut SampleRng) -> LightSample {
        match self {
            LightSource::Sun { sun, .. } => sun.sample(rng),
            LightSource::Environment(env) => env.sample(rng),
        }
    }

    /// Radiance for a ray that escaped the scene.
    pub fn miss_radiance(&self, dir: &Vector3f) -> Vector3f {
        match self {
            LightSource::Sun { sky, .. } => sky.eval(dir),
            LightSource::Environment(env) => env.eval_direction(dir),
        }
    }
}
